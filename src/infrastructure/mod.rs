//! Infrastructure layer
//!
//! Concrete adapters behind the domain repository traits.

pub mod storage;

pub use storage::InMemoryDeliverySettingsRepository;
