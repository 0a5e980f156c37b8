use actix_web::{web, HttpResponse};

use crate::dto::auth_dto::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error_handler::handle_domain_error;

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token: the presented token is invalidated and a new
/// access/refresh pair is returned. Presenting an already-rotated token
/// revokes the whole session lineage and reports reuse.
///
/// # Request Body
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 180,
///     "refresh_expires_in": 36000
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: invalid or expired refresh token
/// - 401 Unauthorized (`token_reuse_detected`): reuse of a rotated token;
///   the session has been revoked and the user must log in again
pub async fn refresh_token<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: ClientRepository + 'static,
    R: TokenRepository + 'static,
    E: EmailService + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::auth_dto::RefreshTokenRequest;

    #[test]
    fn test_refresh_token_request_structure() {
        let request = RefreshTokenRequest {
            refresh_token: "test_token_123".to_string(),
        };
        assert_eq!(request.refresh_token, "test_token_123");
    }
}
