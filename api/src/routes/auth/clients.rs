use actix_web::{web, HttpResponse};

use crate::dto::auth_dto::ProvisionedClient;
use crate::handlers::error_handler::handle_domain_error;
use crate::middleware::auth::AuthContext;

use quill_core::domain::entities::role::Role;
use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::email::EmailService;

use super::AppState;

/// Handler for POST /api/v1/auth/clients/provision
///
/// Provisions any missing authorization clients from the configured
/// allow-list. Admin-only. The response is the one moment the generated
/// client secrets are visible.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// [
///     { "name": "Application", "client_id": "...", "client_secret": "..." }
/// ]
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or invalid access token
/// - 403 Forbidden: caller lacks the admin role
pub async fn provision_clients<U, C, R, E>(
    state: web::Data<AppState<U, C, R, E>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: ClientRepository + 'static,
    R: TokenRepository + 'static,
    E: EmailService + 'static,
{
    // Capability check: decided once, right here
    if let Err(error) = auth.require_all(&[Role::Admin]) {
        return handle_domain_error(error);
    }

    match state.auth_service.provision_clients().await {
        Ok(created) => {
            let body: Vec<ProvisionedClient> = created
                .into_iter()
                .map(|client| ProvisionedClient {
                    name: client.name,
                    client_id: client.client_id,
                    client_secret: client.client_secret,
                })
                .collect();
            HttpResponse::Ok().json(body)
        }
        Err(error) => handle_domain_error(error),
    }
}
