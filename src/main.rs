use rusty_library_circulation::{
    adapters::{FlatFileStore, MemoryStore, SqliteStore},
    api::{AppState, create_router},
    application::ServiceDependencies,
    config::{AppConfig, StorageBackend},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rusty_library_circulation=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize storage
    let service_deps = match config.storage {
        StorageBackend::FlatFile => {
            tracing::info!("Using flat-file storage in {}", config.data_dir.display());
            let store = FlatFileStore::open(config.data_dir.clone()).await?;
            ServiceDependencies::from_store(Arc::new(store))
        }
        StorageBackend::Sqlite => {
            tracing::info!("Using SQLite storage at {}", config.database_url);
            let store = SqliteStore::connect(&config.database_url).await?;
            ServiceDependencies::from_store(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            ServiceDependencies::from_store(Arc::new(MemoryStore::new()))
        }
    };

    if config.admin_token.is_none() {
        tracing::warn!("LIBRARY_ADMIN_TOKEN is not set; admin endpoints are open");
    }

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps,
        admin_token: config.admin_token.clone(),
    });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
