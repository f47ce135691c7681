//! Scheduled game instances and league matches.

use std::{collections::HashMap, sync::Arc, time::SystemTime};

use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{GameEntity, GameType, ScheduledGameEntity, TeamRegistrationEntity},
        record_store::RecordStore,
    },
    dto::{
        registration::TeamRegistrationSummary,
        schedule::{
            ActivationResponse, CreateLeagueMatchRequest, CreateScheduledGameRequest,
            LeagueMatchSummary, NextStageQuery, RegistrationToggleResponse, ScheduledGameSummary,
            UpdateScheduledGameRequest,
        },
    },
    error::ServiceError,
    state::SharedState,
};

const LEAGUE_MATCH_TEAMS: u32 = 2;

pub(crate) fn scheduled_game_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("scheduled game `{id}` not found"))
}

/// Catalog games indexed by id.
pub(crate) async fn games_by_id(
    store: &Arc<dyn RecordStore>,
) -> Result<HashMap<Uuid, GameEntity>, ServiceError> {
    Ok(store
        .list_games()
        .await?
        .into_iter()
        .map(|game| (game.id, game))
        .collect())
}

fn summarize(
    games: &HashMap<Uuid, GameEntity>,
    schedule: ScheduledGameEntity,
) -> ScheduledGameSummary {
    let game = games.get(&schedule.game_id).cloned();
    (schedule, game).into()
}

async fn summarize_one(
    store: &Arc<dyn RecordStore>,
    schedule: ScheduledGameEntity,
) -> Result<ScheduledGameSummary, ServiceError> {
    let game = store.find_game(schedule.game_id).await?;
    Ok((schedule, game).into())
}

async fn list_filtered<P>(
    state: &SharedState,
    predicate: P,
) -> Result<Vec<ScheduledGameSummary>, ServiceError>
where
    P: Fn(&ScheduledGameEntity) -> bool,
{
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;
    Ok(store
        .list_scheduled_games()
        .await?
        .into_iter()
        .filter(|schedule| predicate(schedule))
        .map(|schedule| summarize(&games, schedule))
        .collect())
}

pub async fn list_scheduled_games(
    state: &SharedState,
) -> Result<Vec<ScheduledGameSummary>, ServiceError> {
    list_filtered(state, |_| true).await
}

pub async fn list_active_games(
    state: &SharedState,
) -> Result<Vec<ScheduledGameSummary>, ServiceError> {
    list_filtered(state, |schedule| schedule.is_active).await
}

pub async fn list_open_registration_games(
    state: &SharedState,
) -> Result<Vec<ScheduledGameSummary>, ServiceError> {
    list_filtered(state, |schedule| schedule.registration_open).await
}

pub async fn get_scheduled_game(
    state: &SharedState,
    id: Uuid,
) -> Result<ScheduledGameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let schedule = store
        .find_scheduled_game(id)
        .await?
        .ok_or_else(|| scheduled_game_not_found(id))?;
    summarize_one(&store, schedule).await
}

/// Schedule a catalog game. New schedules are inactive and open for registration.
pub async fn create_scheduled_game(
    state: &SharedState,
    input: CreateScheduledGameRequest,
) -> Result<ScheduledGameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let game = store
        .find_game(input.game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{}` not found", input.game_id)))?;

    let schedule = ScheduledGameEntity {
        id: Uuid::new_v4(),
        game_id: game.id,
        scheduled_time: input.scheduled_time,
        date: input.date,
        venue: input.venue,
        participants: input.participants,
        game_type: input.game_type,
        is_active: false,
        registration_open: true,
        max_teams: input.max_teams,
        max_players_per_team: input.max_players_per_team,
        is_league: false,
        league_stage: None,
        team1_id: None,
        team2_id: None,
        parent_game_id: None,
        created_at: SystemTime::now(),
    };
    store.save_scheduled_game(schedule.clone()).await?;
    info!(
        scheduled_game_id = %schedule.id,
        game_id = %game.id,
        game_type = %schedule.game_type,
        "game scheduled"
    );
    Ok((schedule, Some(game)).into())
}

/// League matches stay two-team events with registration closed.
///
/// Explicit requests that contradict this are rejected; the remaining fields
/// are forced.
fn enforce_league_rules(
    schedule: &mut ScheduledGameEntity,
    requested_open: Option<bool>,
    requested_max_teams: Option<u32>,
) -> Result<(), ServiceError> {
    if !schedule.is_league {
        return Ok(());
    }
    if schedule.game_type != GameType::Team {
        return Err(ServiceError::InvalidInput(
            "league matches must be team games".into(),
        ));
    }
    if requested_open == Some(true) {
        return Err(ServiceError::InvalidInput(
            "registration cannot be opened on a league match".into(),
        ));
    }
    if requested_max_teams.is_some_and(|max| max != LEAGUE_MATCH_TEAMS) {
        return Err(ServiceError::InvalidInput(format!(
            "league matches take exactly {LEAGUE_MATCH_TEAMS} teams"
        )));
    }
    schedule.registration_open = false;
    schedule.max_teams = Some(LEAGUE_MATCH_TEAMS);
    Ok(())
}

/// Apply the fields present in `patch`. An empty patch is rejected.
pub async fn update_scheduled_game(
    state: &SharedState,
    id: Uuid,
    patch: UpdateScheduledGameRequest,
) -> Result<ScheduledGameSummary, ServiceError> {
    if patch.is_empty() {
        return Err(ServiceError::InvalidInput("no fields to update".into()));
    }

    let store = state.require_record_store().await?;
    let schedule = state
        .with_game_lock(id, || async {
            let mut schedule = store
                .find_scheduled_game(id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(id))?;

            let UpdateScheduledGameRequest {
                scheduled_time,
                date,
                venue,
                participants,
                is_active,
                registration_open,
                max_teams,
                max_players_per_team,
                is_league,
                league_stage,
                team1_id,
                team2_id,
            } = patch;

            if let Some(value) = scheduled_time {
                schedule.scheduled_time = value;
            }
            if let Some(value) = date {
                schedule.date = value;
            }
            if let Some(value) = venue {
                schedule.venue = value;
            }
            if let Some(value) = participants {
                schedule.participants = value;
            }
            if let Some(value) = is_active {
                schedule.is_active = value;
            }
            if let Some(value) = registration_open {
                schedule.registration_open = value;
            }
            if let Some(value) = is_league {
                schedule.is_league = value;
            }
            schedule.max_teams = max_teams.or(schedule.max_teams);
            schedule.max_players_per_team = max_players_per_team.or(schedule.max_players_per_team);
            schedule.league_stage = league_stage.or(schedule.league_stage);
            schedule.team1_id = team1_id.or(schedule.team1_id);
            schedule.team2_id = team2_id.or(schedule.team2_id);
            enforce_league_rules(&mut schedule, registration_open, max_teams)?;

            store.save_scheduled_game(schedule.clone()).await?;
            Ok(schedule)
        })
        .await?;

    info!(scheduled_game_id = %id, "scheduled game updated");
    summarize_one(&store, schedule).await
}

/// Flip the activation flag of a scheduled game.
pub async fn toggle_activation(
    state: &SharedState,
    id: Uuid,
) -> Result<ActivationResponse, ServiceError> {
    let store = state.require_record_store().await?;
    let is_active = state
        .with_game_lock(id, || async {
            let mut schedule = store
                .find_scheduled_game(id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(id))?;
            schedule.is_active = !schedule.is_active;
            let is_active = schedule.is_active;
            store.save_scheduled_game(schedule).await?;
            Ok(is_active)
        })
        .await?;
    info!(scheduled_game_id = %id, is_active, "activation toggled");
    Ok(ActivationResponse { id, is_active })
}

/// Flip the registration flag of a scheduled game. League matches never open.
pub async fn toggle_registration(
    state: &SharedState,
    id: Uuid,
) -> Result<RegistrationToggleResponse, ServiceError> {
    let store = state.require_record_store().await?;
    let registration_open = state
        .with_game_lock(id, || async {
            let mut schedule = store
                .find_scheduled_game(id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(id))?;
            if schedule.is_league {
                return Err(ServiceError::InvalidInput(
                    "registration cannot be opened on a league match".into(),
                ));
            }
            schedule.registration_open = !schedule.registration_open;
            let registration_open = schedule.registration_open;
            store.save_scheduled_game(schedule).await?;
            Ok(registration_open)
        })
        .await?;
    info!(scheduled_game_id = %id, registration_open, "registration toggled");
    Ok(RegistrationToggleResponse {
        id,
        registration_open,
    })
}

/// Delete a scheduled game. Registrations and live state are kept.
pub async fn delete_scheduled_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    state
        .with_game_lock(id, || async {
            if !store.delete_scheduled_game(id).await? {
                return Err(scheduled_game_not_found(id));
            }
            Ok(())
        })
        .await?;
    info!(scheduled_game_id = %id, "scheduled game deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// League matches
// ---------------------------------------------------------------------------

async fn ensure_team_exists(
    store: &Arc<dyn RecordStore>,
    id: Option<Uuid>,
    label: &str,
) -> Result<(), ServiceError> {
    if let Some(id) = id {
        if store.find_team_registration(id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("{label} `{id}` not found")));
        }
    }
    Ok(())
}

/// League schedule between two teams: always a two-team event without open registration.
fn league_schedule(
    game_id: Uuid,
    scheduled_time: String,
    date: String,
    venue: String,
) -> ScheduledGameEntity {
    ScheduledGameEntity {
        id: Uuid::new_v4(),
        game_id,
        scheduled_time,
        date,
        venue,
        participants: Vec::new(),
        game_type: GameType::Team,
        is_active: false,
        registration_open: false,
        max_teams: Some(LEAGUE_MATCH_TEAMS),
        max_players_per_team: None,
        is_league: true,
        league_stage: None,
        team1_id: None,
        team2_id: None,
        parent_game_id: None,
        created_at: SystemTime::now(),
    }
}

pub async fn create_league_match(
    state: &SharedState,
    input: CreateLeagueMatchRequest,
) -> Result<ScheduledGameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let game = store
        .find_game(input.game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{}` not found", input.game_id)))?;
    ensure_team_exists(&store, input.team1_id, "team 1").await?;
    ensure_team_exists(&store, input.team2_id, "team 2").await?;

    let schedule = ScheduledGameEntity {
        participants: input.participants,
        max_players_per_team: input.max_players_per_team,
        league_stage: input.league_stage,
        team1_id: input.team1_id,
        team2_id: input.team2_id,
        parent_game_id: input.parent_game_id,
        ..league_schedule(game.id, input.scheduled_time, input.date, input.venue)
    };
    store.save_scheduled_game(schedule.clone()).await?;
    info!(
        scheduled_game_id = %schedule.id,
        stage = schedule.league_stage.as_deref().unwrap_or("-"),
        "league match scheduled"
    );
    Ok((schedule, Some(game)).into())
}

/// Schedule the match following `parent_id`, for the same catalog game.
pub async fn create_next_stage(
    state: &SharedState,
    parent_id: Uuid,
    query: NextStageQuery,
) -> Result<ScheduledGameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let parent = store
        .find_scheduled_game(parent_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("parent game `{parent_id}` not found")))?;
    ensure_team_exists(&store, query.team1_id, "team 1").await?;
    ensure_team_exists(&store, query.team2_id, "team 2").await?;

    let schedule = ScheduledGameEntity {
        max_players_per_team: parent.max_players_per_team,
        league_stage: Some(query.next_stage),
        team1_id: query.team1_id,
        team2_id: query.team2_id,
        parent_game_id: Some(parent_id),
        ..league_schedule(parent.game_id, query.scheduled_time, query.date, query.venue)
    };
    store.save_scheduled_game(schedule.clone()).await?;
    info!(
        scheduled_game_id = %schedule.id,
        parent_game_id = %parent_id,
        "next stage scheduled"
    );
    summarize_one(&store, schedule).await
}

fn by_date_then_time(a: &ScheduledGameEntity, b: &ScheduledGameEntity) -> std::cmp::Ordering {
    a.schedule_key().cmp(&b.schedule_key())
}

async fn league_matches<P>(
    state: &SharedState,
    predicate: P,
) -> Result<Vec<LeagueMatchSummary>, ServiceError>
where
    P: Fn(&ScheduledGameEntity) -> bool,
{
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;
    let teams: HashMap<Uuid, TeamRegistrationEntity> = store
        .list_team_registrations(None)
        .await?
        .into_iter()
        .map(|team| (team.id, team))
        .collect();

    let mut matches: Vec<ScheduledGameEntity> = store
        .list_scheduled_games()
        .await?
        .into_iter()
        .filter(|schedule| predicate(schedule))
        .collect();
    matches.sort_by(by_date_then_time);

    let resolve = |id: Option<Uuid>| {
        id.and_then(|id| teams.get(&id))
            .cloned()
            .map(TeamRegistrationSummary::from)
    };

    Ok(matches
        .into_iter()
        .map(|schedule| {
            let team1 = resolve(schedule.team1_id);
            let team2 = resolve(schedule.team2_id);
            LeagueMatchSummary {
                schedule: summarize(&games, schedule),
                team1,
                team2,
            }
        })
        .collect())
}

/// League matches of a catalog game, ordered by date then time.
pub async fn list_league_matches(
    state: &SharedState,
    game_id: Uuid,
) -> Result<Vec<LeagueMatchSummary>, ServiceError> {
    league_matches(state, |schedule| {
        schedule.is_league && schedule.game_id == game_id
    })
    .await
}

/// Matches of a league stage, ordered by date then time.
pub async fn list_matches_by_stage(
    state: &SharedState,
    stage: &str,
) -> Result<Vec<LeagueMatchSummary>, ServiceError> {
    league_matches(state, |schedule| {
        schedule.league_stage.as_deref() == Some(stage)
    })
    .await
}

/// Teams registered on any non-league instance of a catalog game,
/// deduplicated by team name with the latest registration kept.
pub async fn list_teams_for_game(
    state: &SharedState,
    game_id: Uuid,
) -> Result<Vec<TeamRegistrationSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    let instances: Vec<Uuid> = store
        .list_scheduled_games()
        .await?
        .into_iter()
        .filter(|schedule| schedule.game_id == game_id && !schedule.is_league)
        .map(|schedule| schedule.id)
        .collect();

    let mut unique: IndexMap<String, TeamRegistrationEntity> = IndexMap::new();
    for instance in instances {
        for team in store.list_team_registrations(Some(instance)).await? {
            unique.insert(team.team_name.clone(), team);
        }
    }
    Ok(unique.into_values().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::record_store::InMemoryRecordStore, state::AppState};

    async fn state_with_game() -> (SharedState, Uuid) {
        state_with_game_and_config(AppConfig::default()).await
    }

    async fn state_with_game_and_config(config: AppConfig) -> (SharedState, Uuid) {
        let store = InMemoryRecordStore::new();
        let game = GameEntity {
            id: Uuid::new_v4(),
            icon: "*".into(),
            tamil: "kabaddi".into(),
            english: "Kabaddi".into(),
            category: "sports".into(),
            created_at: SystemTime::now(),
        };
        let game_id = game.id;
        store.save_game(game).await.unwrap();
        let state = AppState::with_store(config, Arc::new(store)).await;
        (state, game_id)
    }

    fn request(game_id: Uuid, date: &str, time: &str) -> CreateScheduledGameRequest {
        CreateScheduledGameRequest {
            game_id,
            scheduled_time: time.into(),
            date: date.into(),
            venue: "Ground".into(),
            participants: Vec::new(),
            game_type: GameType::Team,
            max_teams: None,
            max_players_per_team: None,
        }
    }

    #[tokio::test]
    async fn new_schedule_is_inactive_and_open() {
        let (state, game_id) = state_with_game().await;
        let created = create_scheduled_game(&state, request(game_id, "2025-01-15", "10:00"))
            .await
            .unwrap();
        assert!(!created.is_active);
        assert!(created.registration_open);
        assert_eq!(created.game.map(|game| game.id), Some(game_id));
    }

    #[tokio::test]
    async fn scheduling_unknown_game_is_not_found() {
        let (state, _) = state_with_game().await;
        let err = create_scheduled_game(&state, request(Uuid::new_v4(), "2025-01-15", "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let (state, game_id) = state_with_game().await;
        let created = create_scheduled_game(&state, request(game_id, "2025-01-15", "10:00"))
            .await
            .unwrap();
        let err = update_scheduled_game(&state, created.id, UpdateScheduledGameRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let patch = UpdateScheduledGameRequest {
            venue: Some("Hall".into()),
            ..UpdateScheduledGameRequest::default()
        };
        let updated = update_scheduled_game(&state, created.id, patch).await.unwrap();
        assert_eq!(updated.venue, "Hall");
        assert_eq!(updated.date, "2025-01-15");
    }

    #[tokio::test]
    async fn toggles_flip_flags() {
        let (state, game_id) = state_with_game().await;
        let created = create_scheduled_game(&state, request(game_id, "2025-01-15", "10:00"))
            .await
            .unwrap();
        assert!(toggle_activation(&state, created.id).await.unwrap().is_active);
        assert!(!toggle_activation(&state, created.id).await.unwrap().is_active);
        assert!(
            !toggle_registration(&state, created.id)
                .await
                .unwrap()
                .registration_open
        );
    }

    #[tokio::test]
    async fn league_matches_keep_invariant_and_order() {
        let (state, game_id) = state_with_game().await;
        let league = |date: &str, time: &str| CreateLeagueMatchRequest {
            game_id,
            scheduled_time: time.into(),
            date: date.into(),
            venue: "Ground".into(),
            participants: Vec::new(),
            max_players_per_team: Some(7),
            league_stage: Some("quarter".into()),
            team1_id: None,
            team2_id: None,
            parent_game_id: None,
        };
        let late = create_league_match(&state, league("2025-01-16", "09:00"))
            .await
            .unwrap();
        let early = create_league_match(&state, league("2025-01-15", "11:00"))
            .await
            .unwrap();
        assert_eq!(late.game_type, GameType::Team);
        assert_eq!(late.max_teams, Some(2));
        assert!(!late.registration_open);
        assert!(late.is_league);

        let listed = list_league_matches(&state, game_id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|m| m.schedule.id).collect();
        assert_eq!(ids, [early.id, late.id]);

        let by_stage = list_matches_by_stage(&state, "quarter").await.unwrap();
        assert_eq!(by_stage.len(), 2);

        let next = create_next_stage(
            &state,
            early.id,
            NextStageQuery {
                next_stage: "semi".into(),
                scheduled_time: "10:00".into(),
                date: "2025-01-17".into(),
                venue: "Ground".into(),
                team1_id: None,
                team2_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(next.game_id, game_id);
        assert_eq!(next.parent_game_id, Some(early.id));
        assert_eq!(next.league_stage.as_deref(), Some("semi"));
    }

    #[tokio::test]
    async fn league_match_with_unknown_team_is_not_found() {
        let (state, game_id) = state_with_game().await;
        let err = create_league_match(
            &state,
            CreateLeagueMatchRequest {
                game_id,
                scheduled_time: "10:00".into(),
                date: "2025-01-15".into(),
                venue: "Ground".into(),
                participants: Vec::new(),
                max_players_per_team: None,
                league_stage: None,
                team1_id: Some(Uuid::new_v4()),
                team2_id: None,
                parent_game_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    async fn plain_league_match(state: &SharedState, game_id: Uuid) -> ScheduledGameSummary {
        create_league_match(
            state,
            CreateLeagueMatchRequest {
                game_id,
                scheduled_time: "10:00".into(),
                date: "2025-01-15".into(),
                venue: "Ground".into(),
                participants: Vec::new(),
                max_players_per_team: None,
                league_stage: Some("final".into()),
                team1_id: None,
                team2_id: None,
                parent_game_id: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn league_match_registration_stays_closed() {
        let (state, game_id) = state_with_game().await;
        let league = plain_league_match(&state, game_id).await;

        let err = toggle_registration(&state, league.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let reopen = UpdateScheduledGameRequest {
            registration_open: Some(true),
            ..UpdateScheduledGameRequest::default()
        };
        let err = update_scheduled_game(&state, league.id, reopen)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let stored = get_scheduled_game(&state, league.id).await.unwrap();
        assert!(!stored.registration_open);
    }

    #[tokio::test]
    async fn league_match_keeps_two_teams() {
        let (state, game_id) = state_with_game().await;
        let league = plain_league_match(&state, game_id).await;

        let widen = UpdateScheduledGameRequest {
            max_teams: Some(8),
            ..UpdateScheduledGameRequest::default()
        };
        let err = update_scheduled_game(&state, league.id, widen)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let move_venue = UpdateScheduledGameRequest {
            venue: Some("Hall".into()),
            ..UpdateScheduledGameRequest::default()
        };
        let updated = update_scheduled_game(&state, league.id, move_venue)
            .await
            .unwrap();
        assert_eq!(updated.venue, "Hall");
        assert_eq!(updated.max_teams, Some(2));
        assert!(!updated.registration_open);
    }

    #[tokio::test]
    async fn individual_game_cannot_become_league() {
        let (state, game_id) = state_with_game().await;
        let created = create_scheduled_game(
            &state,
            CreateScheduledGameRequest {
                game_type: GameType::Individual,
                ..request(game_id, "2025-01-15", "10:00")
            },
        )
        .await
        .unwrap();

        let patch = UpdateScheduledGameRequest {
            is_league: Some(true),
            ..UpdateScheduledGameRequest::default()
        };
        let err = update_scheduled_game(&state, created.id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let stored = get_scheduled_game(&state, created.id).await.unwrap();
        assert!(!stored.is_league);
        assert!(stored.registration_open);
    }

    #[tokio::test]
    async fn team_game_turned_league_is_closed_to_two_teams() {
        let (state, game_id) = state_with_game().await;
        let created = create_scheduled_game(&state, request(game_id, "2025-01-15", "10:00"))
            .await
            .unwrap();
        assert!(created.registration_open);

        let patch = UpdateScheduledGameRequest {
            is_league: Some(true),
            ..UpdateScheduledGameRequest::default()
        };
        let updated = update_scheduled_game(&state, created.id, patch).await.unwrap();
        assert!(updated.is_league);
        assert!(!updated.registration_open);
        assert_eq!(updated.max_teams, Some(2));
    }

    #[tokio::test]
    async fn schedule_writes_wait_for_the_game_lock() {
        let config = AppConfig {
            lock_timeout: Some(std::time::Duration::from_millis(20)),
            ..AppConfig::default()
        };
        let (state, game_id) = state_with_game_and_config(config).await;
        let id = create_scheduled_game(&state, request(game_id, "2025-01-15", "10:00"))
            .await
            .unwrap()
            .id;

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

        let patch = UpdateScheduledGameRequest {
            venue: Some("Hall".into()),
            ..UpdateScheduledGameRequest::default()
        };
        assert!(matches!(
            update_scheduled_game(&state, id, patch).await,
            Err(ServiceError::Timeout)
        ));
        assert!(matches!(
            toggle_activation(&state, id).await,
            Err(ServiceError::Timeout)
        ));
        assert!(matches!(
            toggle_registration(&state, id).await,
            Err(ServiceError::Timeout)
        ));
        assert!(matches!(
            delete_scheduled_game(&state, id).await,
            Err(ServiceError::Timeout)
        ));

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
        delete_scheduled_game(&state, id).await.unwrap();
        assert_eq!(state.game_lock_count(), 0);
    }
}
