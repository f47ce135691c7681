use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RecordStore;
use crate::dao::{
    models::{
        GameEntity, IndividualRegistrationEntity, LiveStateEntity, LiveStatus,
        ScheduledGameEntity, TeamRegistrationEntity,
    },
    storage::{StorageError, StorageResult},
};

/// Process-local record store. Insertion order doubles as registration order.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<Tables>,
}

#[derive(Default)]
struct Tables {
    games: RwLock<IndexMap<Uuid, GameEntity>>,
    scheduled_games: RwLock<IndexMap<Uuid, ScheduledGameEntity>>,
    team_registrations: RwLock<IndexMap<Uuid, TeamRegistrationEntity>>,
    individual_registrations: RwLock<IndexMap<Uuid, IndividualRegistrationEntity>>,
    // keyed by scheduled game id
    live_states: RwLock<IndexMap<Uuid, LiveStateEntity>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.read().await.values().cloned().collect()) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.read().await.get(&id).cloned()) })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.games.write().await.insert(game.id, game);
            Ok(())
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.write().await.shift_remove(&id).is_some()) })
    }

    fn list_scheduled_games(&self) -> BoxFuture<'static, StorageResult<Vec<ScheduledGameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .scheduled_games
                .read()
                .await
                .values()
                .cloned()
                .collect())
        })
    }

    fn find_scheduled_game(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ScheduledGameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.scheduled_games.read().await.get(&id).cloned()) })
    }

    fn save_scheduled_game(
        &self,
        scheduled_game: ScheduledGameEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .inner
                .scheduled_games
                .write()
                .await
                .insert(scheduled_game.id, scheduled_game);
            Ok(())
        })
    }

    fn delete_scheduled_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .scheduled_games
                .write()
                .await
                .shift_remove(&id)
                .is_some())
        })
    }

    fn list_team_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let registrations = store.inner.team_registrations.read().await;
            Ok(registrations
                .values()
                .filter(|reg| scheduled_game_id.is_none_or(|id| reg.scheduled_game_id == id))
                .cloned()
                .collect())
        })
    }

    fn find_team_registration(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.team_registrations.read().await.get(&id).cloned()) })
    }

    fn insert_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut registrations = store.inner.team_registrations.write().await;
            let duplicate = registrations.values().any(|existing| {
                existing.scheduled_game_id == registration.scheduled_game_id
                    && existing.team_name == registration.team_name
            });
            if duplicate || registrations.contains_key(&registration.id) {
                return Err(StorageError::conflict(format!(
                    "team `{}` is already registered for scheduled game {}",
                    registration.team_name, registration.scheduled_game_id
                )));
            }
            registrations.insert(registration.id, registration);
            Ok(())
        })
    }

    fn save_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .inner
                .team_registrations
                .write()
                .await
                .insert(registration.id, registration);
            Ok(())
        })
    }

    fn delete_team_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .team_registrations
                .write()
                .await
                .shift_remove(&id)
                .is_some())
        })
    }

    fn list_individual_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<IndividualRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let registrations = store.inner.individual_registrations.read().await;
            Ok(registrations
                .values()
                .filter(|reg| scheduled_game_id.is_none_or(|id| reg.scheduled_game_id == id))
                .cloned()
                .collect())
        })
    }

    fn insert_individual_registration(
        &self,
        registration: IndividualRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut registrations = store.inner.individual_registrations.write().await;
            let duplicate = registrations.values().any(|existing| {
                existing.scheduled_game_id == registration.scheduled_game_id
                    && existing.player_name == registration.player_name
            });
            if duplicate || registrations.contains_key(&registration.id) {
                return Err(StorageError::conflict(format!(
                    "player `{}` is already registered for scheduled game {}",
                    registration.player_name, registration.scheduled_game_id
                )));
            }
            registrations.insert(registration.id, registration);
            Ok(())
        })
    }

    fn delete_individual_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .individual_registrations
                .write()
                .await
                .shift_remove(&id)
                .is_some())
        })
    }

    fn find_live_state(
        &self,
        scheduled_game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LiveStateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .live_states
                .read()
                .await
                .get(&scheduled_game_id)
                .cloned())
        })
    }

    fn insert_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut states = store.inner.live_states.write().await;
            if states.contains_key(&state.scheduled_game_id) {
                return Err(StorageError::conflict(format!(
                    "a live state already exists for scheduled game {}",
                    state.scheduled_game_id
                )));
            }
            states.insert(state.scheduled_game_id, state);
            Ok(())
        })
    }

    fn save_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .inner
                .live_states
                .write()
                .await
                .insert(state.scheduled_game_id, state);
            Ok(())
        })
    }

    fn list_live_states(
        &self,
        status: Option<LiveStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<LiveStateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let states = store.inner.live_states.read().await;
            Ok(states
                .values()
                .filter(|state| status.is_none_or(|wanted| state.status == wanted))
                .cloned()
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
