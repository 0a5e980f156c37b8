use actix_web::{web, HttpResponse};

use crate::dto::auth_dto::{LogoutRequest, StatusResponse};
use crate::handlers::error_handler::handle_domain_error;

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Ends the session behind a currently valid refresh token by deleting its
/// entire token family. A second logout with the same token fails with
/// `invalid_tokens`.
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
/// { "status": "success" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing, malformed, or already-invalidated token
pub async fn logout<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: ClientRepository + 'static,
    R: TokenRepository + 'static,
    E: EmailService + 'static,
{
    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::success()),
        Err(error) => handle_domain_error(error),
    }
}
