use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// First step of login: verifies the client id, email, and password, and
/// returns a short-lived single-use exchange code. Access and refresh
/// tokens are never issued from this endpoint.
///
/// # Request Body
///
/// ```json
/// {
///     "client_id": "hex string",
///     "email": "a@x.com",
///     "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "code": "eyJ..." }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: invalid credentials (cause deliberately unspecified)
/// - 400 Bad Request: malformed request body
pub async fn login<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<LoginRequest>,
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
        .login(&request.client_id, &request.email, &request.password)
        .await
    {
        Ok(code) => HttpResponse::Ok().json(LoginResponse { code }),
        Err(error) => handle_domain_error(error),
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::auth_dto::LoginRequest;

    #[test]
    fn test_login_request_structure() {
        let request = LoginRequest {
            client_id: "client".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(request.email, "a@x.com");
    }
}
