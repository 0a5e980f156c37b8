use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, ExchangeCodeRequest};
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/token
///
/// Second step of login: redeems a single-use exchange code, together with
/// the client secret, for the initial access/refresh pair. A code redeems
/// exactly once; a wrong client secret leaves it redeemable until expiry.
///
/// # Request Body
///
/// ```json
/// {
///     "code": "eyJ...",
///     "client_secret": "hex string"
/// }
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
/// - 400 Bad Request: invalid or expired code, or invalid client secret
pub async fn exchange_code<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<ExchangeCodeRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: ClientRepository + 'static,
    R: TokenRepository + 'static,
    E: EmailService + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .exchange_code(&request.code, &request.client_secret)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
