use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{RegisterRequest, RegisterResponse};
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates a new user account.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "password": "at least 8 characters"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "id": "uuid", "email": "a@x.com" }
/// ```
///
/// ## Errors
/// - 409 Conflict: a user with this email already exists
/// - 400 Bad Request: malformed email or password too short
pub async fn register<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.email, &request.password)
        .await
    {
        Ok(user) => HttpResponse::Created().json(RegisterResponse {
            id: user.id.to_string(),
            email: user.email,
        }),
        Err(error) => handle_domain_error(error),
    }
}
