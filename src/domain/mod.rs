//! Domain layer
//!
//! Pure business types and rules. Nothing here performs I/O.

pub mod delivery;
pub mod error;
pub mod location;

pub use delivery::{
    calculate_delivery_breakdown, calculate_delivery_charge, DefaultRates,
    DeliveryChargeBreakdown, DeliverySettings, DeliverySettingsRepository, DeliveryTier,
    ExampleCalculation, PackageWeight, StoredDeliverySettings,
};
pub use error::{DomainError, DomainResult};
pub use location::{Address, Locality};
