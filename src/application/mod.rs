//! Application layer services implementing business logic.
//!
//! Services sit between HTTP handlers and the infrastructure layer, turning
//! raw request values into domain types and infrastructure failures into
//! [`crate::error::AppError`]s.
//!
//! # Available Services
//!
//! - [`services::postcode_service::PostcodeService`] - Postal code listing and membership checks

pub mod services;
