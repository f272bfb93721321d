//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! the postal code source and the in-memory cache in front of it.
//!
//! # Modules
//!
//! - [`cache`] - Single-flight in-memory cache
//! - [`source`] - [`crate::domain::CodeSource`] implementations

pub mod cache;
pub mod source;
