use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use quill_core::services::auth::{AuthService, AuthServiceConfig};
use quill_core::services::email::EmailService;
use quill_core::services::token::{
    RotationEngine, TokenCleanupConfig, TokenCleanupService, TokenCodec, TokenService,
    TokenServiceConfig,
};
use quill_infra::database::{create_pool, MySqlClientRepository, MySqlTokenRepository, MySqlUserRepository};
use quill_infra::email::{MockEmailService, SmtpEmailService};
use quill_shared::config::{AppConfig, LoggingConfig};

mod app;
mod dto;
mod handlers;
mod middleware;
mod routes;

use app::configure_routes;
use middleware::auth::JwtAuth;
use middleware::cors::create_cors;
use routes::auth::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    info!(environment = %config.environment, "starting Quill API server");

    if config.environment.is_production() && config.auth.tokens.is_using_default_secrets() {
        anyhow::bail!("refusing to start in production with development signing secrets");
    }

    let pool = create_pool(&config.database).await?;
    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let clients = Arc::new(MySqlClientRepository::new(pool.clone()));
    let tokens = Arc::new(MySqlTokenRepository::new(pool));

    if config.email.username.is_empty() {
        info!("no SMTP credentials configured, using mock email delivery");
        run_server(config, users, clients, tokens, Arc::new(MockEmailService::new())).await
    } else {
        let smtp = SmtpEmailService::new(&config.email)
            .map_err(|e| anyhow::anyhow!("failed to set up SMTP transport: {e}"))?;
        run_server(config, users, clients, tokens, Arc::new(smtp)).await
    }
}

async fn run_server<E: EmailService + 'static>(
    config: AppConfig,
    users: Arc<MySqlUserRepository>,
    clients: Arc<MySqlClientRepository>,
    tokens: Arc<MySqlTokenRepository>,
    email: Arc<E>,
) -> anyhow::Result<()> {
    let token_config = TokenServiceConfig::from(&config.auth.tokens);
    let token_service = Arc::new(TokenService::new(Arc::clone(&tokens), token_config.clone()));
    let rotation_engine = Arc::new(RotationEngine::new(
        Arc::clone(&token_service),
        Arc::clone(&users),
    ));
    let auth_service = Arc::new(AuthService::new(
        users,
        clients,
        Arc::clone(&token_service),
        rotation_engine,
        email,
        AuthServiceConfig::from(&config.auth),
    ));

    // Allow-list clients; the generated credentials are only ever visible at
    // this moment, so surface them in the startup log
    let created = auth_service
        .provision_clients()
        .await
        .map_err(|e| anyhow::anyhow!("client provisioning failed: {e}"))?;
    for client in &created {
        info!(
            name = %client.name,
            client_id = %client.client_id,
            client_secret = %client.client_secret,
            "authorization client provisioned"
        );
    }

    let cleanup = Arc::new(TokenCleanupService::new(
        Arc::clone(&token_service),
        TokenCleanupConfig::default(),
    ));
    let _cleanup_handle = cleanup.start();

    let state = web::Data::new(AppState {
        auth_service: Arc::clone(&auth_service),
    });
    let jwt = JwtAuth::new(Arc::new(TokenCodec::new(&token_config)));
    let cors_config = config.cors.clone();
    let bind_address = config.server.bind_address();
    info!(%bind_address, "binding HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(create_cors(&cors_config))
            .app_data(state.clone())
            .configure(|cfg| {
                configure_routes::<MySqlUserRepository, MySqlClientRepository, MySqlTokenRepository, E>(
                    cfg,
                    jwt.clone(),
                )
            })
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .init();
}
