//! Location aggregate
//!
//! Addresses and the locality normalization used for delivery tiering.

pub mod model;

pub use model::{Address, Locality};
