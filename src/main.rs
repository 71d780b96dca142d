use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_admin::{
    app,
    config::{Config, LogFormat},
    session, AppState,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!(
        "Starting Cinema Admin API ({}), backend at {}",
        config.app.environment, config.backend.base_url
    );

    // Create the shared application state
    let app_state = AppState::new(config.clone())?;

    // --- Start background tasks ---

    // Заброшенные черновики броней чистим по таймеру
    session::spawn_sweeper(
        app_state.drafts.clone(),
        config.drafts.idle_ttl(),
        config.drafts.sweep_interval(),
    );

    // --- Start the web server ---

    let router = app(app_state)?;

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
