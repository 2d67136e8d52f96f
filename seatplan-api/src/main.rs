use anyhow::Context;
use seatplan_api::{app, AppState};
use seatplan_store::{Config, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatplan_api=debug,seatplan_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting seat allocation service on port {}", config.server.port);

    let store = SessionStore::from_settings(config.session.settings()).context("Failed to build allocation session")?;

    // SSE Broadcast Channel
    let (events_tx, _) = tokio::sync::broadcast::channel(100);

    let app = app(AppState::new(store, events_tx));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
