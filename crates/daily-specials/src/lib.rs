//! Deterministic daily specials.
//!
//! The selection for a given calendar date is a pure function of the
//! catalog and the date, so every client renders the same specials all
//! day without coordination. [`DailySpecialsService`] wraps the remote
//! specials endpoint and recomputes locally when it is unreachable.

pub mod selector;
pub mod service;

pub use selector::{select_daily_specials, MAX_DAILY_SPECIALS, MIN_ELIGIBLE_PRICE};
pub use service::{CatalogSource, DailySpecialsService};
