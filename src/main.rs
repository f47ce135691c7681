//! Pongal Games Back binary entrypoint wiring REST, SSE, and the record store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pongal_games_back::{
    config::AppConfig,
    dao::record_store::{InMemoryRecordStore, RecordStore},
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());
    start_storage(app_state.clone()).await;

    let app = routes::router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the record store: MongoDB under supervision when `MONGO_URI` is set,
/// the in-memory store otherwise.
async fn start_storage(state: SharedState) {
    if env::var_os("MONGO_URI").is_some() && spawn_mongo_supervisor(&state) {
        return;
    }

    info!("using in-memory record store");
    state
        .install_record_store(Arc::new(InMemoryRecordStore::new()))
        .await;
}

#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: &SharedState) -> bool {
    use pongal_games_back::{
        dao::{
            record_store::mongodb::{MongoConfig, MongoRecordStore},
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    info!("using MongoDB record store");
    tokio::spawn(storage_supervisor::run(state.clone(), || async {
        let config = MongoConfig::from_env().await.map_err(StorageError::from)?;
        let store = MongoRecordStore::connect(config)
            .await
            .map_err(StorageError::from)?;
        Ok(Arc::new(store) as Arc<dyn RecordStore>)
    }));
    true
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_mongo_supervisor(_state: &SharedState) -> bool {
    tracing::warn!("MONGO_URI set but the mongo-store feature is disabled");
    false
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
