//! Feature modules of the REST API

pub mod delivery;
pub mod health;
