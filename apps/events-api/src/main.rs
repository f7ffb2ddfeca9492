use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{EventRepository, InMemoryEventRepository, MongoEventRepository};
use events_api::api;
use events_api::config::{Config, StorageBackend};
use events_api::state::AppState;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(eyre::eyre!("Failed to load .env: {}", e));
        }
    }

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    match (config.storage, config.mongodb.clone()) {
        (StorageBackend::MongoDb, Some(mongodb)) => {
            info!("Connecting to MongoDB at {}", mongodb.url());

            let mongo_client =
                database::mongodb::connect_from_config_with_retry(&mongodb, None).await?;
            let db = mongo_client.database(mongodb.database());

            info!(
                "Successfully connected to MongoDB database: {}",
                mongodb.database()
            );

            api::events::init_indexes(&db).await?;

            let repository = MongoEventRepository::new(&db);
            serve(config, repository, async move {
                info!("Shutting down: closing MongoDB connections");
                mongo_client.shutdown().await;
                info!("MongoDB connection closed successfully");
            })
            .await
        }
        (StorageBackend::MongoDb, None) => {
            Err(eyre::eyre!("MongoDB storage selected without MongoDB settings"))
        }
        (StorageBackend::Memory, _) => {
            warn!("Using in-memory storage; events are lost on restart");
            serve(config, InMemoryEventRepository::new(), async {}).await
        }
    }
}

async fn serve<R, F>(config: Config, repository: R, cleanup: F) -> eyre::Result<()>
where
    R: EventRepository + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let server = config.server.clone();
    let state = AppState::new(config, repository);
    let app = events_api::build_router(&state).await?;

    info!(
        backend = state.events.backend(),
        "Starting Events API with production-ready shutdown (30s timeout)"
    );

    axum_helpers::create_production_app(app, &server, Duration::from_secs(30), cleanup)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}
