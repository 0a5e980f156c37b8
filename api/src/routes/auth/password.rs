//! Password lifecycle endpoints: forgot, OTP verification, reset, and
//! authenticated change.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth_dto::{
    ChangePasswordRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
    StatusResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/password/forgot
///
/// Emails the account's one-time passcode. Always answers success, whether
/// or not the email is registered, and never waits for delivery.
pub async fn forgot_password<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<ForgotPasswordRequest>,
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

    match state.auth_service.forgot_password(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "An OTP has been sent to your email. Please check your inbox.".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/auth/password/verify-otp
///
/// Verifies the emailed passcode and returns a short-lived password-reset
/// token.
pub async fn verify_otp<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<VerifyOtpRequest>,
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
        .verify_otp(&request.email, &request.otp)
        .await
    {
        Ok(reset_password_token) => HttpResponse::Ok().json(VerifyOtpResponse {
            reset_password_token,
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/auth/password/reset
///
/// Sets a new password using a reset token. Every open session of the user
/// is revoked.
pub async fn reset_password<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    request: web::Json<ResetPasswordRequest>,
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
        .reset_password(&request.reset_password_token, &request.password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::success()),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/auth/password/change
///
/// Authenticated password change for the calling user. Requires a bearer
/// access token; every open session is revoked afterwards.
pub async fn change_password<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    auth: AuthContext,
    request: web::Json<ChangePasswordRequest>,
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
        .change_password(auth.user_id, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::success()),
        Err(error) => handle_domain_error(error),
    }
}
