//! CORS middleware configuration.
//!
//! Permissive in development; in production only the origins listed in the
//! configuration are allowed.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use quill_shared::config::CorsConfig;

/// Creates a CORS middleware instance from the application configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    let permissive = config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(config.max_age as usize);

    if permissive {
        info!("CORS: allowing any origin (development)");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            info!(origin, "CORS: allowing origin");
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials && !permissive {
        cors = cors.supports_credentials();
    }

    cors
}
