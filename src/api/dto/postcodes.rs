//! DTOs for postcode endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::infrastructure::cache::CodeList;

/// Response listing every known postal code.
#[derive(Debug, Serialize)]
pub struct CodesResponse {
    pub codes: CodeList,
}

/// Membership check request.
///
/// `code` is kept as a raw JSON value: clients send both `"3000"` and `3000`,
/// and normalisation happens in [`crate::domain::Postcode`].
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub code: Option<Value>,
}

/// Membership check response.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub exists: bool,
}
