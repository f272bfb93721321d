//! [`crate::domain::CodeSource`] implementations.

mod tsv_source;

pub use tsv_source::{SourceLocation, TsvCodeSource, parse_codes};
