use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the record store, then report the degraded flag.
///
/// A failed ping is only logged here; the storage supervisor owns the switch
/// into degraded mode.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.record_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "record store ping failed");
            }
        }
        None => warn!("healthcheck without record store"),
    }

    state.is_degraded().into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::record_store::InMemoryRecordStore,
        dto::health::HealthStatus,
        state::AppState,
    };

    #[tokio::test]
    async fn reports_degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn reports_ok_with_memory_store() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(InMemoryRecordStore::new())).await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Ok);
    }
}
