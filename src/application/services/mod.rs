//! Business logic services for the application layer.

pub mod postcode_service;

pub use postcode_service::PostcodeService;
