//! Ledgerly API Server
//!
//! Main entry point for the Ledgerly backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerly_api::{AppState, JwtAuthenticator, create_router};
use ledgerly_core::ServiceContext;
use ledgerly_core::auth::VerificationService;
use ledgerly_core::store::EntityStore;
use ledgerly_db::{SeaOrmStore, connect};
use ledgerly_shared::AppConfig;
use ledgerly_shared::email::SmtpEmailSender;
use ledgerly_shared::jwt::JwtService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerly=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database).await?;
    let store: Arc<dyn EntityStore> = Arc::new(SeaOrmStore::new(db));
    let ctx = ServiceContext::system(store.clone());

    let jwt = Arc::new(JwtService::new(&config.jwt));

    let email = Arc::new(SmtpEmailSender::new(config.email.clone()));
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email sender configured"
    );

    let state = AppState {
        authenticator: Arc::new(JwtAuthenticator::new(jwt, store)),
        verification: VerificationService::new(
            ctx.clone(),
            email,
            config.verification,
            config.email.app_name.clone(),
        ),
        ctx,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
