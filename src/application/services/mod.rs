//! Application services

mod delivery;

pub use delivery::{CartDeliveryQuote, DeliveryChargeService, ParcelLine, SellerDeliveryQuote};
