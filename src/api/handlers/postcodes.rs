//! Handlers for postcode endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};

use crate::api::dto::postcodes::{CheckRequest, CheckResponse, CodesResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns every known postal code.
///
/// # Endpoint
///
/// `GET /api/postcodes`
///
/// The first request after startup triggers the upstream fetch; concurrent
/// requests wait on that same fetch.
///
/// # Response
///
/// ```json
/// { "codes": ["0800", "2000", "3000"] }
/// ```
///
/// Sent with `Cache-Control: max-age=<CACHE_MAX_AGE_SECONDS>`.
///
/// # Errors
///
/// Returns 503 Service Unavailable if the code list cannot be loaded.
pub async fn list_codes_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let codes = state.postcode_service.list_codes().await?;

    Ok((
        [(header::CACHE_CONTROL, state.cache_control())],
        Json(CodesResponse { codes }),
    ))
}

/// Checks whether a postal code exists.
///
/// # Endpoint
///
/// `POST /api/postcodes`
///
/// # Request Body
///
/// ```json
/// { "code": "3000" }
/// ```
///
/// Numbers and booleans are accepted and compared by their string form, so
/// `{ "code": 3000 }` is equivalent to the example above.
///
/// # Response
///
/// ```json
/// { "exists": true }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the body is not JSON or `code` is missing, `null`,
///   an array or an object
/// - 503 Service Unavailable if the code list cannot be loaded
pub async fn check_code_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let exists = state
        .postcode_service
        .code_exists(payload.code.as_ref())
        .await?;

    Ok((
        [(header::CACHE_CONTROL, state.cache_control())],
        Json(CheckResponse { exists }),
    ))
}
