//! Delivery aggregate
//!
//! Tariff settings, tier selection and the weight-based delivery charge.

pub mod model;
pub mod repository;
pub mod settings;

pub use model::{
    calculate_delivery_breakdown, calculate_delivery_charge, example_calculations,
    DeliveryChargeBreakdown, DeliveryTier, ExampleCalculation, PackageWeight,
};
pub use repository::{DeliverySettingsRepository, StoredDeliverySettings};
pub use settings::{DefaultRates, DeliverySettings, TierRate};
