//! Response mapping.
//!
//! # Responsibilities
//! - Turn orchestration results into HTTP responses
//! - Map every failure to an empty 500
//!
//! # Design Decisions
//! - No diagnostic detail in failure bodies; it lives in the operator log

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Empty 500 response.
pub fn internal_error() -> Response {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

/// 200 with a JSON body.
pub fn ok_json<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

/// 200 with a JSON body on success, empty 500 otherwise.
pub fn json_or_internal_error<T: Serialize, E>(result: Result<T, E>) -> Response {
    match result {
        Ok(body) => ok_json(body),
        Err(_) => internal_error(),
    }
}
