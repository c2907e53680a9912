//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `modules`: delivery pricing and health endpoints
//! - `router`: API router

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
