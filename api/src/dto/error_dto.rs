//! HTTP error body helpers.

use actix_web::{http::StatusCode, HttpResponse};

pub use quill_shared::types::response::ErrorResponse as ErrorBody;

/// Build an HTTP response carrying a machine-readable error body
pub fn error_response(
    status: StatusCode,
    code: impl Into<String>,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody::new(code, message))
}
