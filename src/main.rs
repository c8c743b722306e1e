use landing_checkout_rust::config::AppConfig;
use landing_checkout_rust::router::create_app_router;
use landing_checkout_rust::state::{spawn_session_sweeper, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment and defaults still apply.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env()?;

    // Initialize application state
    let state = Arc::new(AppState::from_config(&config)?);
    spawn_session_sweeper(state.clone(), config.session_idle);

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server running");

    axum::serve(listener, app).await?;
    Ok(())
}
