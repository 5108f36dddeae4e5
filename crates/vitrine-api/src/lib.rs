//! Storefront REST API client for the Vitrine client core.
//!
//! This crate provides:
//! - `StorefrontClient`: catalog, daily specials, and favorites endpoints
//! - Bearer-credential attachment per call
//! - A per-request timeout so a dead network reads as a failed call

mod client;
mod error;

pub use client::StorefrontClient;
pub use error::{ApiError, ApiResult};
