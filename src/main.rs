use biodash_api::api::{self, AppState};
use biodash_api::config::Config;
use biodash_api::db;
use biodash_api::repositories::PgIndicatorStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting biodash-api");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!(
        "Configuration loaded (owner scope: {:?}, refresh every {}s)",
        cfg.reports.owner_scope, cfg.dashboard.refresh_interval_secs
    );

    let pool = db::connect(&cfg.database).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("Connected to database");

    let state = AppState::new(
        Arc::new(PgIndicatorStore::new(pool, cfg.database.owner_id_type)),
        &cfg,
    );
    let router = api::create_router(state);
    let addr = format!("{}:{}", cfg.api.host, cfg.api.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);

    let serve = axum::serve(listener, router);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = serve.with_graceful_shutdown(shutdown).await {
        tracing::error!(error = %e, "API server error");
    }

    info!("Application shutdown complete");
    Ok(())
}
