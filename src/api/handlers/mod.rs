//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod postcodes;

pub use health::health_handler;
pub use postcodes::{check_code_handler, list_codes_handler};
