//! Maps domain errors to stable error codes and HTTP statuses.
//!
//! No internal detail crosses this boundary: storage and internal failures
//! collapse into a generic 500, and the login path's deliberately
//! indistinguishable failures stay indistinguishable here.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use tracing::{error, warn};

use quill_core::errors::{AuthError, DomainError, TokenError};

use crate::dto::error_dto::error_response;

/// Convert a domain error into an HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials",
            ),
            AuthError::InvalidClientSecret => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_client_secret",
                "Invalid client secret",
            ),
            AuthError::InvalidTokens => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_tokens",
                "Invalid tokens",
            ),
            AuthError::InvalidVerificationCode => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_verification_code",
                "Invalid verification code",
            ),
            AuthError::UserAlreadyExists => error_response(
                StatusCode::CONFLICT,
                "user_already_exists",
                "A user with this email already exists",
            ),
            AuthError::UserNotFound => error_response(
                StatusCode::NOT_FOUND,
                "user_not_found",
                "User not found",
            ),
            AuthError::InsufficientPermissions => error_response(
                StatusCode::FORBIDDEN,
                "insufficient_permissions",
                "You don't have permission for this",
            ),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidOrExpiredCode => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_or_expired_code",
                "Invalid or expired code. Please log in again",
            ),
            TokenError::TokenReuseDetected => {
                warn!("token reuse surfaced to client");
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "token_reuse_detected",
                    "Token reuse detected. Please log in again",
                )
            }
            TokenError::InvalidOrExpiredToken
            | TokenError::TokenExpired
            | TokenError::InvalidTokenFormat => error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_or_expired_token",
                "Invalid or expired token",
            ),
            TokenError::TokenGenerationFailed => {
                error!("token generation failed");
                internal_error()
            }
        },
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_data",
            "Invalid data",
        ),
        DomainError::NotFound { resource } => {
            warn!(resource, "resource not found");
            error_response(StatusCode::NOT_FOUND, "not_found", "Resource not found")
        }
        DomainError::Database { message } => {
            error!(message, "database error");
            internal_error()
        }
        DomainError::Internal { message } => {
            error!(message, "internal error");
            internal_error()
        }
    }
}

/// Convert request-body validation failures into a generic 400
pub fn handle_validation_errors(errors: validator::ValidationErrors) -> HttpResponse {
    warn!(error = %errors, "request validation failed");
    error_response(StatusCode::BAD_REQUEST, "invalid_data", "Invalid data")
}

fn internal_error() -> HttpResponse {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An internal error occurred",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse_detection_maps_to_401() {
        let response = handle_domain_error(TokenError::TokenReuseDetected.into());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let response = handle_domain_error(AuthError::InvalidCredentials.into());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_code_maps_to_400() {
        let response = handle_domain_error(TokenError::InvalidOrExpiredCode.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let response = handle_domain_error(DomainError::Database {
            message: "connection refused to db-host:3306".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
