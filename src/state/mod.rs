pub mod live_state;
mod sse;

use std::{future::Future, sync::Arc};

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::timeout;
use tracing::warn;
use uuid::Uuid;

use crate::{config::AppConfig, dao::record_store::RecordStore, error::ServiceError};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const LIVE_SSE_CAPACITY: usize = 64;

/// Central application state storing the record store handle, the live event
/// hub and the per-game mutation locks.
pub struct AppState {
    record_store: RwLock<Option<Arc<dyn RecordStore>>>,
    live_sse: SseHub,
    game_locks: DashMap<Uuid, Arc<Mutex<()>>>,
    degraded: watch::Sender<bool>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            record_store: RwLock::new(None),
            live_sse: SseHub::new(LIVE_SSE_CAPACITY),
            game_locks: DashMap::new(),
            degraded: degraded_tx,
            config: Arc::new(config),
        })
    }

    /// Construct a state with an already installed record store.
    pub async fn with_store(config: AppConfig, store: Arc<dyn RecordStore>) -> SharedState {
        let state = Self::new(config);
        state.install_record_store(store).await;
        state
    }

    /// Obtain a handle to the current record store, if one is installed.
    pub async fn record_store(&self) -> Option<Arc<dyn RecordStore>> {
        let guard = self.record_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the record store or fail with [`ServiceError::Degraded`].
    pub async fn require_record_store(&self) -> Result<Arc<dyn RecordStore>, ServiceError> {
        self.record_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new record store implementation and leave degraded mode.
    pub async fn install_record_store(&self, store: Arc<dyn RecordStore>) {
        {
            let mut guard = self.record_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current record store and enter degraded mode.
    pub async fn clear_record_store(&self) {
        {
            let mut guard = self.record_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag, notifying watchers only when the value changes.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Broadcast hub used for the live scoreboard SSE stream.
    pub fn live_sse(&self) -> &SseHub {
        &self.live_sse
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run `work` while holding the mutation lock of one scheduled game.
    ///
    /// Waiting for the lock is bounded by the configured timeout; the work itself
    /// is never interrupted once the lock is held. The lock entry is dropped
    /// again once no caller holds or waits for it.
    pub async fn with_game_lock<F, Fut, T>(
        &self,
        scheduled_game_id: Uuid,
        work: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let lease = LockLease {
            locks: &self.game_locks,
            scheduled_game_id,
            gate: self
                .game_locks
                .entry(scheduled_game_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        };

        let _guard = match self.config.lock_timeout {
            Some(limit) => match timeout(limit, lease.gate.lock()).await {
                Ok(guard) => guard,
                Err(_) => {
                    warn!(
                        scheduled_game_id = %scheduled_game_id,
                        timeout_ms = limit.as_millis() as u64,
                        "timed out waiting for game lock"
                    );
                    return Err(ServiceError::Timeout);
                }
            },
            None => lease.gate.lock().await,
        };

        work().await
    }

    /// Number of scheduled games with a mutation lock allocated.
    pub fn game_lock_count(&self) -> usize {
        self.game_locks.len()
    }
}

/// Holder of one game lock entry. The last holder removes the entry from the map.
struct LockLease<'a> {
    locks: &'a DashMap<Uuid, Arc<Mutex<()>>>,
    scheduled_game_id: Uuid,
    gate: Arc<Mutex<()>>,
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        // The map and this lease are the only owners left: nobody holds or waits.
        self.locks.remove_if(&self.scheduled_game_id, |_, gate| {
            Arc::ptr_eq(gate, &self.gate) && Arc::strong_count(gate) == 2
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dao::record_store::InMemoryRecordStore;

    fn config_with_timeout(ms: u64) -> AppConfig {
        AppConfig {
            lock_timeout: Some(Duration::from_millis(ms)),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_record_store().await,
            Err(ServiceError::Degraded)
        ));

        state
            .install_record_store(Arc::new(InMemoryRecordStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(state.require_record_store().await.is_ok());

        state.clear_record_store().await;
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn degraded_updates_only_notify_on_change() {
        let state = AppState::new(AppConfig::default());
        assert!(!state.update_degraded(true));
        assert!(state.update_degraded(false));
        assert!(!state.update_degraded(false));
    }

    #[tokio::test]
    async fn lock_wait_times_out() {
        let state = AppState::new(config_with_timeout(20));
        let id = Uuid::new_v4();
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let holder = {
            let state = state.clone();
            tokio::spawn(async move {
                state
                    .with_game_lock(id, || async move {
                        let _ = entered_tx.send(());
                        let _ = release_rx.await;
                        Ok(())
                    })
                    .await
            })
        };

        entered_rx.await.unwrap();
        let outcome = state.with_game_lock(id, || async { Ok(()) }).await;
        assert!(matches!(outcome, Err(ServiceError::Timeout)));

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
        assert!(state.with_game_lock(id, || async { Ok(()) }).await.is_ok());
    }

    #[tokio::test]
    async fn locks_are_per_game() {
        let state = AppState::new(config_with_timeout(20));
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let nested = state
            .with_game_lock(first, || async {
                state
                    .with_game_lock(second, || async { Ok(state.game_lock_count()) })
                    .await
            })
            .await
            .unwrap();
        assert_eq!(nested, 2);
        assert_eq!(state.game_lock_count(), 0);
    }

    #[tokio::test]
    async fn lock_entries_are_released_after_failures() {
        let state = AppState::new(config_with_timeout(20));
        for _ in 0..100 {
            let outcome: Result<(), _> = state
                .with_game_lock(Uuid::new_v4(), || async {
                    Err(ServiceError::NotFound("missing".into()))
                })
                .await;
            assert!(outcome.is_err());
        }
        assert_eq!(state.game_lock_count(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_is_queued() {
        let state = AppState::new(config_with_timeout(1_000));
        let id = Uuid::new_v4();
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let holder = {
            let state = state.clone();
            tokio::spawn(async move {
                state
                    .with_game_lock(id, || async move {
                        let _ = entered_tx.send(());
                        let _ = release_rx.await;
                        Ok(())
                    })
                    .await
            })
        };
        entered_rx.await.unwrap();

        let waiter = {
            let state = state.clone();
            tokio::spawn(async move { state.with_game_lock(id, || async { Ok(()) }).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(state.game_lock_count(), 1);

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
        waiter.await.unwrap().unwrap();
        assert_eq!(state.game_lock_count(), 0);
    }
}
