use std::sync::Arc;

use shared::repositories::in_memory::InMemoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use websocket_api::config::{Config, PersistenceBackend};
use websocket_api::routes;
use websocket_api::state::{AppState, Repositories};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = Config::from_env()?;
    info!(
        "Starting websocket API on {} (backend: {:?})",
        config.bind_address, config.backend
    );

    // Set up persistence
    let repositories = match &config.backend {
        PersistenceBackend::Memory => Repositories::in_memory(Arc::new(InMemoryStore::new())),
        PersistenceBackend::DynamoDb {
            presence_table,
            messages_table,
            reports_table,
        } => {
            let aws_config = aws_config::load_from_env().await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            Repositories::dynamodb(client, presence_table, messages_table, reports_table)
        }
    };

    let app_state = AppState::new(&config, repositories);
    let app = routes::router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Websocket API stopped");
    Ok(())
}

/// `RUST_LOG` controls the filter (default `info`); `LOG_FORMAT=json` switches
/// to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
