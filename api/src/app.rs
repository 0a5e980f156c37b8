//! Application route wiring.

use actix_web::{web, HttpResponse};

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use crate::middleware::auth::JwtAuth;
use crate::routes;

/// Register every route of the API.
///
/// The four protocol endpoints and the password-recovery flow are public;
/// `password/change` and `clients/provision` sit behind the JWT middleware
/// and receive the caller as an explicit `AuthContext`.
pub fn configure_routes<U, C, R, E>(cfg: &mut web::ServiceConfig, jwt: JwtAuth)
where
    U: UserRepository + 'static,
    C: ClientRepository + 'static,
    R: TokenRepository + 'static,
    E: EmailService + 'static,
{
    cfg.route("/health", web::get().to(routes::health::health_check))
        .service(
            web::scope("/api/v1/auth")
                .route(
                    "/register",
                    web::post().to(routes::auth::register::register::<U, C, R, E>),
                )
                .route(
                    "/login",
                    web::post().to(routes::auth::login::login::<U, C, R, E>),
                )
                .route(
                    "/token",
                    web::post().to(routes::auth::token::exchange_code::<U, C, R, E>),
                )
                .route(
                    "/refresh",
                    web::post().to(routes::auth::refresh::refresh_token::<U, C, R, E>),
                )
                .route(
                    "/logout",
                    web::post().to(routes::auth::logout::logout::<U, C, R, E>),
                )
                .route(
                    "/password/forgot",
                    web::post().to(routes::auth::password::forgot_password::<U, C, R, E>),
                )
                .route(
                    "/password/verify-otp",
                    web::post().to(routes::auth::password::verify_otp::<U, C, R, E>),
                )
                .route(
                    "/password/reset",
                    web::post().to(routes::auth::password::reset_password::<U, C, R, E>),
                )
                .service(
                    web::scope("/password/change")
                        .wrap(jwt.clone())
                        .route(
                            "",
                            web::post().to(routes::auth::password::change_password::<U, C, R, E>),
                        ),
                )
                .service(
                    web::scope("/clients")
                        .wrap(jwt)
                        .route(
                            "/provision",
                            web::post().to(routes::auth::clients::provision_clients::<U, C, R, E>),
                        ),
                ),
        )
        .default_service(web::route().to(not_found));
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
