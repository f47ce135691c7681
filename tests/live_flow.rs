use std::sync::Arc;

use futures::future::BoxFuture;
use pongal_games_back::{
    config::AppConfig,
    dao::{
        models::{
            GameEntity, GameType, IndividualRegistrationEntity, LiveStateEntity, LiveStatus,
            ScheduledGameEntity, TeamRegistrationEntity,
        },
        record_store::{InMemoryRecordStore, RecordStore},
        storage::StorageResult,
    },
    dto::{
        catalog::GameInput,
        registration::{CreateIndividualRegistrationRequest, CreateTeamRegistrationRequest},
        results::ResultRanking,
        schedule::CreateScheduledGameRequest,
    },
    error::ServiceError,
    services::{
        catalog_service, live_state_service, registration_service, results_service,
        schedule_service,
    },
    state::{AppState, SharedState, live_state::Scoreboard},
};
use uuid::Uuid;

/// In-memory store that hands control back to the scheduler after every
/// single-record read, so concurrent read-modify-write cycles interleave.
#[derive(Default)]
struct YieldingStore {
    inner: InMemoryRecordStore,
}

fn yield_after<T: Send + 'static>(read: BoxFuture<'static, T>) -> BoxFuture<'static, T> {
    Box::pin(async move {
        let value = read.await;
        tokio::task::yield_now().await;
        value
    })
}

impl RecordStore for YieldingStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        self.inner.list_games()
    }
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        self.inner.find_game(id)
    }
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.save_game(game)
    }
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_game(id)
    }

    fn list_scheduled_games(&self) -> BoxFuture<'static, StorageResult<Vec<ScheduledGameEntity>>> {
        self.inner.list_scheduled_games()
    }
    fn find_scheduled_game(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ScheduledGameEntity>>> {
        yield_after(self.inner.find_scheduled_game(id))
    }
    fn save_scheduled_game(
        &self,
        scheduled_game: ScheduledGameEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.save_scheduled_game(scheduled_game)
    }
    fn delete_scheduled_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_scheduled_game(id)
    }

    fn list_team_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamRegistrationEntity>>> {
        yield_after(self.inner.list_team_registrations(scheduled_game_id))
    }
    fn find_team_registration(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamRegistrationEntity>>> {
        yield_after(self.inner.find_team_registration(id))
    }
    fn insert_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.insert_team_registration(registration)
    }
    fn save_team_registration(
        &self,
        registration: TeamRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.save_team_registration(registration)
    }
    fn delete_team_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_team_registration(id)
    }

    fn list_individual_registrations(
        &self,
        scheduled_game_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<IndividualRegistrationEntity>>> {
        self.inner.list_individual_registrations(scheduled_game_id)
    }
    fn insert_individual_registration(
        &self,
        registration: IndividualRegistrationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.insert_individual_registration(registration)
    }
    fn delete_individual_registration(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_individual_registration(id)
    }

    fn find_live_state(
        &self,
        scheduled_game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LiveStateEntity>>> {
        yield_after(self.inner.find_live_state(scheduled_game_id))
    }
    fn insert_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.insert_live_state(state)
    }
    fn save_live_state(&self, state: LiveStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.save_live_state(state)
    }
    fn list_live_states(
        &self,
        status: Option<LiveStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<LiveStateEntity>>> {
        self.inner.list_live_states(status)
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.health_check()
    }
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.try_reconnect()
    }
}

async fn memory_state() -> SharedState {
    AppState::with_store(AppConfig::default(), Arc::new(YieldingStore::default())).await
}

async fn schedule(state: &SharedState, category: &str, game_type: GameType) -> Uuid {
    let game = catalog_service::create_game(
        state,
        GameInput {
            icon: "*".into(),
            tamil: "உறியடி".into(),
            english: "Uriyadi".into(),
            category: category.into(),
        },
    )
    .await
    .unwrap();

    schedule_service::create_scheduled_game(
        state,
        CreateScheduledGameRequest {
            game_id: game.id,
            scheduled_time: "10:00".into(),
            date: "2025-01-15".into(),
            venue: "Main Ground".into(),
            participants: Vec::new(),
            game_type,
            max_teams: None,
            max_players_per_team: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn register_team(state: &SharedState, scheduled_game_id: Uuid, name: &str) {
    registration_service::create_team_registration(
        state,
        CreateTeamRegistrationRequest {
            scheduled_game_id,
            team_name: name.into(),
            captain_name: format!("{name} captain"),
            captain_phone: None,
            captain_email: None,
            players: vec![format!("{name} player")],
        },
    )
    .await
    .unwrap();
}

async fn register_player(state: &SharedState, scheduled_game_id: Uuid, name: &str) {
    registration_service::create_individual_registration(
        state,
        CreateIndividualRegistrationRequest {
            scheduled_game_id,
            player_name: name.into(),
            phone: None,
            email: None,
            age: None,
        },
    )
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_score_updates_are_not_lost() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    register_team(&state, id, "A").await;
    register_team(&state, id, "B").await;
    live_state_service::init_or_get_state(&state, id)
        .await
        .unwrap();

    let tasks: Vec<_> = (0..40)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(
                async move { live_state_service::apply_score_delta(&state, id, 0, 1).await },
            )
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let live_state = live_state_service::get_state(&state, id).await.unwrap();
    let scores = live_state.scoreboard.team_scores();
    assert_eq!(scores[0].name, "A");
    assert_eq!(scores[0].score, 40);
    assert_eq!(scores[1].score, 0);
    assert_eq!(state.game_lock_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_mutations_create_one_state() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    register_team(&state, id, "A").await;
    register_team(&state, id, "B").await;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(
                async move { live_state_service::apply_score_delta(&state, id, 1, 1).await },
            )
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let store = state.require_record_store().await.unwrap();
    let states = store.list_live_states(None).await.unwrap();
    assert_eq!(states.len(), 1);
    let live_state = live_state_service::get_state(&state, id).await.unwrap();
    assert_eq!(live_state.scoreboard.team_scores()[1].score, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_player_additions_are_all_kept() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    let team = registration_service::create_team_registration(
        &state,
        CreateTeamRegistrationRequest {
            scheduled_game_id: id,
            team_name: "Lions".into(),
            captain_name: "Captain".into(),
            captain_phone: None,
            captain_email: None,
            players: vec!["captain".into()],
        },
    )
    .await
    .unwrap();
    let team_id = team.id;

    let tasks: Vec<_> = (0..20)
        .map(|idx| {
            let state = state.clone();
            tokio::spawn(async move {
                registration_service::add_player(&state, team_id, format!("player {idx}")).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let teams = registration_service::list_team_registrations(&state, id)
        .await
        .unwrap();
    assert_eq!(teams[0].players.len(), 21);
}

#[tokio::test]
async fn unknown_games_leave_no_lock_behind() {
    let state = memory_state().await;
    for _ in 0..50 {
        let outcome = live_state_service::apply_score_delta(&state, Uuid::new_v4(), 0, 1).await;
        assert!(matches!(outcome, Err(ServiceError::NotFound(_))));
    }
    assert_eq!(state.game_lock_count(), 0);
}

#[tokio::test]
async fn rejected_update_leaves_state_untouched() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    register_team(&state, id, "A").await;
    register_team(&state, id, "B").await;

    live_state_service::apply_score_delta(&state, id, 1, 3)
        .await
        .unwrap();
    let before = live_state_service::get_state(&state, id).await.unwrap();

    let outcome = live_state_service::apply_score_delta(&state, id, 2, 5).await;
    assert!(matches!(outcome, Err(ServiceError::OutOfRange(_))));

    let after = live_state_service::get_state(&state, id).await.unwrap();
    assert_eq!(after.scoreboard, before.scoreboard);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn failed_first_update_does_not_create_state() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    register_team(&state, id, "A").await;

    let outcome = live_state_service::apply_score_delta(&state, id, 7, 1).await;
    assert!(matches!(outcome, Err(ServiceError::OutOfRange(_))));
    assert!(matches!(
        live_state_service::get_state(&state, id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn winner_declaration_completes_and_deactivates() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Team).await;
    register_team(&state, id, "A").await;
    register_team(&state, id, "B").await;
    schedule_service::toggle_activation(&state, id).await.unwrap();
    assert!(schedule_service::get_scheduled_game(&state, id).await.unwrap().is_active);

    live_state_service::apply_score_delta(&state, id, 0, 3)
        .await
        .unwrap();
    live_state_service::apply_score_delta(&state, id, 1, 5)
        .await
        .unwrap();
    let winner =
        live_state_service::declare_winner(&state, id, "B".into(), Some(5), None)
            .await
            .unwrap();
    assert_eq!(winner.name, "B");

    let schedule = schedule_service::get_scheduled_game(&state, id).await.unwrap();
    assert!(!schedule.is_active);

    let result = results_service::get_result(&state, id).await.unwrap();
    match result.ranking {
        ResultRanking::Team {
            winner,
            runner_up,
            all_participants,
        } => {
            assert_eq!((winner.name.as_str(), winner.score), ("B", 5));
            assert_eq!((runner_up.name.as_str(), runner_up.score), ("A", 3));
            assert_eq!(all_participants.map(|all| all.len()), Some(2));
        }
        other => panic!("expected team ranking, got {other:?}"),
    }
}

#[tokio::test]
async fn individual_results_rank_by_time_and_feed_stats() {
    let state = memory_state().await;
    let race = schedule(&state, "kids", GameType::Individual).await;
    for name in ["Anbu", "Bala", "Chitra"] {
        register_player(&state, race, name).await;
    }
    live_state_service::apply_time_update(&state, race, 0, "12.50".into())
        .await
        .unwrap();
    live_state_service::apply_time_update(&state, race, 1, "11.20".into())
        .await
        .unwrap();
    live_state_service::declare_winner(&state, race, "Bala".into(), None, Some("11.20".into()))
        .await
        .unwrap();

    let match_id = schedule(&state, "sports", GameType::Team).await;
    live_state_service::declare_winner(&state, match_id, "Nobody".into(), None, None)
        .await
        .unwrap();

    let results = results_service::list_results_by_category(&state, "kids")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    match &results[0].ranking {
        ResultRanking::Individual { results } => {
            let names: Vec<_> = results.iter().map(|entry| entry.name.as_str()).collect();
            assert_eq!(names, ["Bala", "Anbu"]);
        }
        other => panic!("expected individual ranking, got {other:?}"),
    }

    let stats = results_service::results_stats(&state, None).await.unwrap();
    assert_eq!(stats.total_games, 2);
    assert_eq!(stats.individual_events, 1);
    assert_eq!(stats.team_events, 1);
    assert_eq!(stats.total_participants, 3);

    let kids = results_service::results_stats(&state, Some("kids")).await.unwrap();
    assert_eq!(kids.total_games, 1);
    let all = results_service::results_stats(&state, Some("all")).await.unwrap();
    assert_eq!(all.total_games, 2);
}

#[tokio::test]
async fn winner_without_live_state_uses_empty_scoreboard() {
    let state = memory_state().await;
    let id = schedule(&state, "sports", GameType::Individual).await;

    live_state_service::declare_winner(&state, id, "Walkover".into(), None, None)
        .await
        .unwrap();
    let live_state = live_state_service::get_state(&state, id).await.unwrap();
    assert!(live_state.is_completed());
    assert_eq!(live_state.scoreboard, Scoreboard::empty(GameType::Individual));
}

#[tokio::test]
async fn degraded_mode_rejects_operations() {
    let state = AppState::new(AppConfig::default());
    assert!(matches!(
        live_state_service::apply_score_delta(&state, Uuid::new_v4(), 0, 1).await,
        Err(ServiceError::Degraded)
    ));
    assert!(matches!(
        results_service::list_results(&state).await,
        Err(ServiceError::Degraded)
    ));
}
