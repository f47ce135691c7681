//! Live scoreboard lifecycle: lazy initialization from the registrations,
//! score and time mutations, and winner declaration.
//!
//! Every mutation of a scheduled game runs under that game's lock, so
//! concurrent updates are applied one after the other and at most one live
//! state is ever created per scheduled game.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::{
        models::{GameType, ScheduledGameEntity},
        record_store::RecordStore,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        live_state::{LiveState, Scoreboard, Winner},
    },
};

fn scheduled_game_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("scheduled game `{id}` not found"))
}

/// Scoreboard listing the registered participants of a scheduled game, in
/// registration order, with zero scores or no times.
pub async fn registry_scoreboard(
    store: &Arc<dyn RecordStore>,
    schedule: &ScheduledGameEntity,
) -> Result<Scoreboard, ServiceError> {
    let scoreboard = match schedule.game_type {
        GameType::Team => Scoreboard::from_team_names(
            store
                .list_team_registrations(Some(schedule.id))
                .await?
                .into_iter()
                .map(|registration| registration.team_name),
        ),
        GameType::Individual => Scoreboard::from_player_names(
            store
                .list_individual_registrations(Some(schedule.id))
                .await?
                .into_iter()
                .map(|registration| registration.player_name),
        ),
    };
    Ok(scoreboard)
}

/// Load the stored state, or build a fresh one from the registrations.
///
/// The boolean is `true` when the state is new and still has to be inserted.
async fn load_or_build(
    store: &Arc<dyn RecordStore>,
    scheduled_game_id: Uuid,
) -> Result<(LiveState, bool), ServiceError> {
    if let Some(entity) = store.find_live_state(scheduled_game_id).await? {
        return Ok((entity.into(), false));
    }

    let schedule = store
        .find_scheduled_game(scheduled_game_id)
        .await?
        .ok_or_else(|| scheduled_game_not_found(scheduled_game_id))?;
    let scoreboard = registry_scoreboard(store, &schedule).await?;
    debug!(
        scheduled_game_id = %scheduled_game_id,
        participants = scoreboard.len(),
        "building live state from registrations"
    );
    Ok((LiveState::initialize(scheduled_game_id, scoreboard), true))
}

async fn persist(
    store: &Arc<dyn RecordStore>,
    live_state: &LiveState,
    fresh: bool,
) -> Result<(), ServiceError> {
    if fresh {
        store.insert_live_state(live_state.clone().into()).await?;
    } else {
        store.save_live_state(live_state.clone().into()).await?;
    }
    Ok(())
}

/// Return the live state of a scheduled game, creating it from the
/// registrations on first access.
pub async fn init_or_get_state(
    state: &SharedState,
    scheduled_game_id: Uuid,
) -> Result<LiveState, ServiceError> {
    let store = state.require_record_store().await?;
    state
        .with_game_lock(scheduled_game_id, || async {
            let (live_state, fresh) = load_or_build(&store, scheduled_game_id).await?;
            if fresh {
                persist(&store, &live_state, true).await?;
                info!(scheduled_game_id = %scheduled_game_id, "live state initialized");
            }
            Ok(live_state)
        })
        .await
}

/// Add `delta` to the score of the team at `participant_index`, clamping at zero.
pub async fn apply_score_delta(
    state: &SharedState,
    scheduled_game_id: Uuid,
    participant_index: i64,
    delta: i64,
) -> Result<LiveState, ServiceError> {
    let store = state.require_record_store().await?;
    let live_state = state
        .with_game_lock(scheduled_game_id, || async {
            let (mut live_state, fresh) = load_or_build(&store, scheduled_game_id).await?;
            let score = live_state.apply_score_delta(participant_index, delta)?;
            persist(&store, &live_state, fresh).await?;
            debug!(
                scheduled_game_id = %scheduled_game_id,
                participant_index,
                delta,
                score,
                "score updated"
            );
            Ok(live_state)
        })
        .await?;

    sse_events::broadcast_live_state_updated(state, &live_state);
    Ok(live_state)
}

/// Record the time of the player at `participant_index`. The time is stored
/// verbatim and only parsed when ranking.
pub async fn apply_time_update(
    state: &SharedState,
    scheduled_game_id: Uuid,
    participant_index: i64,
    time: String,
) -> Result<LiveState, ServiceError> {
    let store = state.require_record_store().await?;
    let live_state = state
        .with_game_lock(scheduled_game_id, || async {
            let (mut live_state, fresh) = load_or_build(&store, scheduled_game_id).await?;
            live_state.apply_time(participant_index, time)?;
            persist(&store, &live_state, fresh).await?;
            debug!(
                scheduled_game_id = %scheduled_game_id,
                participant_index,
                "time updated"
            );
            Ok(live_state)
        })
        .await?;

    sse_events::broadcast_live_state_updated(state, &live_state);
    Ok(live_state)
}

/// Complete a game with the given winner and deactivate its schedule.
///
/// Without an existing state, the completed state starts from an empty
/// scoreboard. Declaring again overwrites the previous winner.
pub async fn declare_winner(
    state: &SharedState,
    scheduled_game_id: Uuid,
    winner_name: String,
    winner_score: Option<i64>,
    winner_time: Option<String>,
) -> Result<Winner, ServiceError> {
    let store = state.require_record_store().await?;
    let winner = state
        .with_game_lock(scheduled_game_id, || async {
            let mut schedule = store
                .find_scheduled_game(scheduled_game_id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(scheduled_game_id))?;

            let (mut live_state, fresh) = match store.find_live_state(scheduled_game_id).await? {
                Some(entity) => (LiveState::from(entity), false),
                None => (
                    LiveState::initialize(
                        scheduled_game_id,
                        Scoreboard::empty(schedule.game_type),
                    ),
                    true,
                ),
            };

            let winner = Winner::declared_now(winner_name, winner_score, winner_time);
            live_state.complete(winner.clone());
            persist(&store, &live_state, fresh).await?;

            schedule.is_active = false;
            store.save_scheduled_game(schedule).await?;

            info!(
                scheduled_game_id = %scheduled_game_id,
                winner = %winner.name,
                "winner declared"
            );
            Ok(winner)
        })
        .await?;

    sse_events::broadcast_live_state_completed(state, scheduled_game_id, &winner);
    Ok(winner)
}

/// Return the stored live state of a scheduled game without creating it.
pub async fn get_state(
    state: &SharedState,
    scheduled_game_id: Uuid,
) -> Result<LiveState, ServiceError> {
    let store = state.require_record_store().await?;
    store
        .find_live_state(scheduled_game_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "live state of scheduled game `{scheduled_game_id}` not found"
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{IndividualRegistrationEntity, LiveStatus, TeamRegistrationEntity},
            record_store::InMemoryRecordStore,
        },
        state::AppState,
    };

    fn schedule(game_type: GameType) -> ScheduledGameEntity {
        ScheduledGameEntity {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            scheduled_time: "10:00".into(),
            date: "2025-01-15".into(),
            venue: "Ground".into(),
            participants: Vec::new(),
            game_type,
            is_active: true,
            registration_open: false,
            max_teams: None,
            max_players_per_team: None,
            is_league: false,
            league_stage: None,
            team1_id: None,
            team2_id: None,
            parent_game_id: None,
            created_at: SystemTime::now(),
        }
    }

    fn team(scheduled_game_id: Uuid, name: &str) -> TeamRegistrationEntity {
        TeamRegistrationEntity {
            id: Uuid::new_v4(),
            scheduled_game_id,
            team_name: name.into(),
            captain_name: "Captain".into(),
            captain_phone: None,
            captain_email: None,
            players: vec!["P1".into()],
            registered_at: SystemTime::now(),
        }
    }

    fn player(scheduled_game_id: Uuid, name: &str) -> IndividualRegistrationEntity {
        IndividualRegistrationEntity {
            id: Uuid::new_v4(),
            scheduled_game_id,
            player_name: name.into(),
            phone: None,
            email: None,
            age: None,
            registered_at: SystemTime::now(),
        }
    }

    async fn setup(game_type: GameType, names: &[&str]) -> (SharedState, Uuid) {
        let store = InMemoryRecordStore::new();
        let scheduled = schedule(game_type);
        let id = scheduled.id;
        store.save_scheduled_game(scheduled).await.unwrap();
        for name in names {
            match game_type {
                GameType::Team => store.insert_team_registration(team(id, name)).await.unwrap(),
                GameType::Individual => store
                    .insert_individual_registration(player(id, name))
                    .await
                    .unwrap(),
            }
        }
        let state = AppState::with_store(AppConfig::default(), Arc::new(store)).await;
        (state, id)
    }

    #[tokio::test]
    async fn first_score_update_creates_state_from_registrations() {
        let (state, id) = setup(GameType::Team, &["Lions", "Tigers"]).await;

        let live = apply_score_delta(&state, id, 1, 3).await.unwrap();
        assert_eq!(live.status, LiveStatus::Playing);
        assert_eq!(live.scoreboard.names(), ["Lions", "Tigers"]);
        assert_eq!(live.scoreboard.team_scores()[1].score, 3);

        let stored = get_state(&state, id).await.unwrap();
        assert_eq!(stored, live);
    }

    #[tokio::test]
    async fn score_is_clamped_at_zero() {
        let (state, id) = setup(GameType::Team, &["Lions"]).await;
        apply_score_delta(&state, id, 0, 2).await.unwrap();
        let live = apply_score_delta(&state, id, 0, -5).await.unwrap();
        assert_eq!(live.scoreboard.team_scores()[0].score, 0);
    }

    #[tokio::test]
    async fn out_of_range_on_lazy_init_persists_nothing() {
        let (state, id) = setup(GameType::Team, &["Lions"]).await;

        let err = apply_score_delta(&state, id, 5, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::OutOfRange(_)));
        assert!(matches!(
            get_state(&state, id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn out_of_range_leaves_existing_state_unchanged() {
        let (state, id) = setup(GameType::Individual, &["Anu", "Bala"]).await;
        let before = apply_time_update(&state, id, 0, "12.5s".into()).await.unwrap();

        let err = apply_time_update(&state, id, -1, "9.0".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::OutOfRange(_)));
        assert_eq!(get_state(&state, id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn score_update_on_individual_game_is_invalid() {
        let (state, id) = setup(GameType::Individual, &["Anu"]).await;
        let err = apply_score_delta(&state, id, 0, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_schedule_is_not_found() {
        let (state, _) = setup(GameType::Team, &[]).await;
        let err = init_or_get_state(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let (state, id) = setup(GameType::Team, &["Lions"]).await;
        let first = init_or_get_state(&state, id).await.unwrap();
        let second = init_or_get_state(&state, id).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn declare_winner_completes_and_deactivates() {
        let (state, id) = setup(GameType::Team, &["Lions", "Tigers"]).await;
        apply_score_delta(&state, id, 0, 4).await.unwrap();

        let winner = declare_winner(&state, id, "Lions".into(), Some(4), None)
            .await
            .unwrap();
        assert_eq!(winner.name, "Lions");

        let live = get_state(&state, id).await.unwrap();
        assert!(live.is_completed());
        assert_eq!(live.scoreboard.len(), 2);
        assert_eq!(live.winner.as_ref().map(|w| w.score), Some(Some(4)));

        let store = state.require_record_store().await.unwrap();
        let schedule = store.find_scheduled_game(id).await.unwrap().unwrap();
        assert!(!schedule.is_active);
    }

    #[tokio::test]
    async fn declare_winner_without_state_uses_empty_scoreboard() {
        let (state, id) = setup(GameType::Individual, &["Anu", "Bala"]).await;

        declare_winner(&state, id, "Anu".into(), None, Some("10.2s".into()))
            .await
            .unwrap();
        let live = get_state(&state, id).await.unwrap();
        assert!(live.is_completed());
        assert!(live.scoreboard.is_empty());

        declare_winner(&state, id, "Bala".into(), None, Some("9.8s".into()))
            .await
            .unwrap();
        let live = get_state(&state, id).await.unwrap();
        assert_eq!(live.winner.map(|w| w.name), Some("Bala".to_owned()));
    }

    #[tokio::test]
    async fn mutations_broadcast_live_events() {
        let (state, id) = setup(GameType::Team, &["Lions"]).await;
        let mut receiver = state.live_sse().subscribe();

        apply_score_delta(&state, id, 0, 1).await.unwrap();
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("live_state.updated"));

        declare_winner(&state, id, "Lions".into(), Some(1), None)
            .await
            .unwrap();
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("live_state.completed"));
    }
}
