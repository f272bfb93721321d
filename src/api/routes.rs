//! API route configuration.

use crate::api::handlers::{check_code_handler, list_codes_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Postcode API routes.
///
/// # Endpoints
///
/// - `GET  /postcodes` - List every postal code
/// - `POST /postcodes` - Check whether a postal code exists
pub fn postcode_routes() -> Router<AppState> {
    Router::new().route(
        "/postcodes",
        get(list_codes_handler).post(check_code_handler),
    )
}
