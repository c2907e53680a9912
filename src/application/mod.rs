//! Application layer: use cases on top of the domain

pub mod services;

pub use services::{
    CartDeliveryQuote, DeliveryChargeService, ParcelLine, SellerDeliveryQuote,
};
