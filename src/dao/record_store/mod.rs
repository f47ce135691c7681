pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    GameEntity, IndividualRegistrationEntity, LiveStateEntity, LiveStatus, ScheduledGameEntity,
    TeamRegistrationEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

pub use memory::InMemoryRecordStore;

/// Abstraction over the persistence layer holding every tournament record.
///
/// Registration listings are returned in registration order. Inserts that
/// violate a uniqueness rule (live state per scheduled game, team name or
/// player name per scheduled game) fail with [`StorageError::Conflict`].
///
/// [`StorageError::Conflict`]: crate::dao::storage::StorageError::Conflict
pub trait RecordStore: Send + Sync {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_scheduled_games(&self) -> BoxFuture<'static, StorageResult<Vec<ScheduledGameEntity>>>;
    fn find_scheduled_game(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ScheduledGameEntity>>>;
    fn save_scheduled_game(
        &self,
        scheduled_game: ScheduledGameEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_scheduled_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_team_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamRegistrationEntity>>>;
    fn find_team_registration(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamRegistrationEntity>>>;
    fn insert_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn save_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_team_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_individual_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<IndividualRegistrationEntity>>>;
    fn insert_individual_registration(
        &self,
        registration: IndividualRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_individual_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn find_live_state(
        &self,
        scheduled_game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LiveStateEntity>>>;
    fn insert_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn save_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn list_live_states(
        &self,
        status: Option<LiveStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<LiveStateEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
