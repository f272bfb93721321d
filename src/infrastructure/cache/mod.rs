//! In-memory postal code cache.
//!
//! - [`CodeCache`] - Single-flight cache over a [`crate::domain::CodeSource`]
//! - [`PendingFetch`] - Shared handle for the fetch currently in flight

mod code_cache;
mod error;
mod pending;

pub use code_cache::{CacheState, CacheStatus, CodeCache, CodeList};
pub use error::{CacheError, CacheResult};
pub use pending::PendingFetch;
