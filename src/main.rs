mod model;
mod server;

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    config::Config, error::AppError, router, scheduler::invitation_cleanup,
    service::admin::code::AdminCodeService, service::mail::MailService, startup, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scholarly=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;
    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config)?;
    let mail_service = MailService::new(http_client.clone(), config.mail.clone());

    let admin_code_service = AdminCodeService::new();

    // Check for admin users and generate login link if none exist
    startup::check_for_admin(&db, &config, &admin_code_service).await?;

    invitation_cleanup::start_scheduler(db.clone(), &config.invitation_cleanup_cron).await?;

    let state = AppState::new(
        db,
        http_client,
        oauth_client,
        admin_code_service,
        mail_service,
        config.clone(),
    );

    let app = router::router(state)?.layer(session);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
