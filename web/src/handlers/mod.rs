//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod race;

pub use race::{get_race_id, missing_operation, operate_race, set_race_id, RaceIdBody};
