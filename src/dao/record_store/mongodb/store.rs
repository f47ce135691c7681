use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        GAMES, INDIVIDUAL_REGISTRATIONS, LIVE_STATES, MongoGameDocument,
        MongoIndividualRegistrationDocument, MongoLiveStateDocument, MongoScheduledGameDocument,
        MongoTeamRegistrationDocument, SCHEDULED_GAMES, TEAM_REGISTRATIONS, doc_id,
    },
};
use crate::dao::{
    models::{
        GameEntity, IndividualRegistrationEntity, LiveStateEntity, LiveStatus,
        ScheduledGameEntity, TeamRegistrationEntity,
    },
    record_store::RecordStore,
    storage::StorageResult,
};

/// MongoDB-backed record store. Uniqueness rules are enforced with unique indexes.
#[derive(Clone)]
pub struct MongoRecordStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (_client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        self.state.write().await.database = database;
        Ok(())
    }
}

impl MongoRecordStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        self.ensure_index(
            LIVE_STATES,
            "scheduled_game_id",
            doc! {"scheduled_game_id": 1},
            true,
        )
        .await?;
        self.ensure_index(
            TEAM_REGISTRATIONS,
            "scheduled_game_id,team_name",
            doc! {"scheduled_game_id": 1, "team_name": 1},
            true,
        )
        .await?;
        self.ensure_index(
            INDIVIDUAL_REGISTRATIONS,
            "scheduled_game_id,player_name",
            doc! {"scheduled_game_id": 1, "player_name": 1},
            true,
        )
        .await?;
        self.ensure_index(
            TEAM_REGISTRATIONS,
            "registered_at",
            doc! {"registered_at": 1},
            false,
        )
        .await?;
        self.ensure_index(
            INDIVIDUAL_REGISTRATIONS,
            "registered_at",
            doc! {"registered_at": 1},
            false,
        )
        .await
    }

    async fn ensure_index(
        &self,
        collection: &'static str,
        index: &'static str,
        keys: Document,
        unique: bool,
    ) -> MongoResult<()> {
        let model = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(Some(format!("{collection}_{}_idx", index.replace(',', "_"))))
                    .unique(Some(unique))
                    .build(),
            )
            .build();

        self.collection::<Document>(collection)
            .await
            .create_index(model)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection,
                index,
                source,
            })?;
        Ok(())
    }

    async fn collection<D: Send + Sync>(&self, name: &'static str) -> Collection<D> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<D>(name)
    }

    async fn find_one<D, E>(&self, name: &'static str, filter: Document) -> MongoResult<Option<E>>
    where
        D: DeserializeOwned + Unpin + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let key = filter.to_string();
        self.collection::<D>(name)
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Load {
                collection: name,
                id: key,
                source,
            })?
            .map(E::try_from)
            .transpose()
    }

    async fn find_many<D, E>(
        &self,
        name: &'static str,
        filter: Document,
        sort: Document,
    ) -> MongoResult<Vec<E>>
    where
        D: DeserializeOwned + Unpin + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let documents: Vec<D> = self
            .collection::<D>(name)
            .await
            .find(filter)
            .sort(sort)
            .await
            .map_err(|source| MongoDaoError::List {
                collection: name,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::List {
                collection: name,
                source,
            })?;

        documents.into_iter().map(E::try_from).collect()
    }

    async fn upsert<D>(&self, name: &'static str, id: Uuid, document: D) -> MongoResult<()>
    where
        D: Serialize + Send + Sync,
    {
        self.collection::<D>(name)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::from_insert(name, id.to_string(), source))?;
        Ok(())
    }

    async fn insert<D>(&self, name: &'static str, id: Uuid, document: D) -> MongoResult<()>
    where
        D: Serialize + Send + Sync,
    {
        self.collection::<D>(name)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::from_insert(name, id.to_string(), source))?;
        Ok(())
    }

    async fn delete(&self, name: &'static str, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection::<Document>(name)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: name,
                id: id.to_string(),
                source,
            })?;
        Ok(result.deleted_count > 0)
    }
}

fn by_scheduled_game(scheduled_game_id: Option<Uuid>) -> Document {
    match scheduled_game_id {
        Some(id) => doc! {"scheduled_game_id": id.to_string()},
        None => doc! {},
    }
}

impl RecordStore for MongoRecordStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoGameDocument, _>(GAMES, doc! {}, doc! {"created_at": 1})
                .await
                .map_err(Into::into)
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoGameDocument, _>(GAMES, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = game.id;
            store
                .upsert(GAMES, id, MongoGameDocument::from(game))
                .await
                .map_err(Into::into)
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete(GAMES, id).await.map_err(Into::into) })
    }

    fn list_scheduled_games(&self) -> BoxFuture<'static, StorageResult<Vec<ScheduledGameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoScheduledGameDocument, _>(
                    SCHEDULED_GAMES,
                    doc! {},
                    doc! {"created_at": 1},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn find_scheduled_game(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ScheduledGameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoScheduledGameDocument, _>(SCHEDULED_GAMES, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn save_scheduled_game(
        &self,
        scheduled_game: ScheduledGameEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = scheduled_game.id;
            store
                .upsert(
                    SCHEDULED_GAMES,
                    id,
                    MongoScheduledGameDocument::from(scheduled_game),
                )
                .await
                .map_err(Into::into)
        })
    }

    fn delete_scheduled_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete(SCHEDULED_GAMES, id).await.map_err(Into::into) })
    }

    fn list_team_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoTeamRegistrationDocument, _>(
                    TEAM_REGISTRATIONS,
                    by_scheduled_game(scheduled_game_id),
                    doc! {"registered_at": 1},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn find_team_registration(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoTeamRegistrationDocument, _>(TEAM_REGISTRATIONS, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn insert_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = registration.id;
            store
                .insert(
                    TEAM_REGISTRATIONS,
                    id,
                    MongoTeamRegistrationDocument::from(registration),
                )
                .await
                .map_err(Into::into)
        })
    }

    fn save_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = registration.id;
            store
                .upsert(
                    TEAM_REGISTRATIONS,
                    id,
                    MongoTeamRegistrationDocument::from(registration),
                )
                .await
                .map_err(Into::into)
        })
    }

    fn delete_team_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete(TEAM_REGISTRATIONS, id).await.map_err(Into::into) })
    }

    fn list_individual_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<IndividualRegistrationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoIndividualRegistrationDocument, _>(
                    INDIVIDUAL_REGISTRATIONS,
                    by_scheduled_game(scheduled_game_id),
                    doc! {"registered_at": 1},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_individual_registration(
        &self,
        registration: IndividualRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = registration.id;
            store
                .insert(
                    INDIVIDUAL_REGISTRATIONS,
                    id,
                    MongoIndividualRegistrationDocument::from(registration),
                )
                .await
                .map_err(Into::into)
        })
    }

    fn delete_individual_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete(INDIVIDUAL_REGISTRATIONS, id)
                .await
                .map_err(Into::into)
        })
    }

    fn find_live_state(
        &self,
        scheduled_game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LiveStateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoLiveStateDocument, _>(
                    LIVE_STATES,
                    doc! {"scheduled_game_id": scheduled_game_id.to_string()},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = state.id;
            store
                .insert(LIVE_STATES, id, MongoLiveStateDocument::from(state))
                .await
                .map_err(Into::into)
        })
    }

    fn save_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = state.id;
            store
                .upsert(LIVE_STATES, id, MongoLiveStateDocument::from(state))
                .await
                .map_err(Into::into)
        })
    }

    fn list_live_states(
        &self,
        status: Option<LiveStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<LiveStateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let filter = match status {
                Some(status) => doc! {"status": status.as_str()},
                None => doc! {},
            };
            store
                .find_many::<MongoLiveStateDocument, _>(
                    LIVE_STATES,
                    filter,
                    doc! {"created_at": 1},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
