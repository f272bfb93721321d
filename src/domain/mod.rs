//! Domain layer: the postal code value type and the source contract.
//!
//! # Modules
//!
//! - [`postcode`] - Canonical code input and its normalisation rules
//! - [`source`] - [`CodeSource`] trait implemented by the infrastructure layer

pub mod postcode;
pub mod source;

pub use postcode::{InvalidInput, Postcode};
pub use source::{CodeSource, SourceError};

#[cfg(test)]
pub use source::MockCodeSource;
