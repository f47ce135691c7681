//! Read-only projections of the games currently being played.
//!
//! Active games without a live state yet are shown with a preview built from
//! their registrations. The preview is never persisted.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dao::{
        models::{GameType, LiveStatus, ScheduledGameEntity},
        record_store::RecordStore,
    },
    dto::{
        live::{ActiveGameView, CurrentScores, LiveGameDetails, LiveGameView, RegistrationDetail},
        registration::{IndividualRegistrationSummary, TeamRegistrationSummary},
    },
    error::ServiceError,
    services::{live_state_service::registry_scoreboard, schedule_service::games_by_id},
    state::{SharedState, live_state::Scoreboard},
};

/// Current scoreboard of a schedule, or a registry preview when no state exists.
async fn current_scoreboard(
    store: &Arc<dyn RecordStore>,
    schedule: &ScheduledGameEntity,
) -> Result<(LiveStatus, Scoreboard), ServiceError> {
    match store.find_live_state(schedule.id).await? {
        Some(entity) => Ok((entity.status, entity.current_scores.into())),
        None => Ok((
            LiveStatus::Playing,
            registry_scoreboard(store, schedule).await?,
        )),
    }
}

async fn active_schedules(
    store: &Arc<dyn RecordStore>,
) -> Result<Vec<ScheduledGameEntity>, ServiceError> {
    Ok(store
        .list_scheduled_games()
        .await?
        .into_iter()
        .filter(|schedule| schedule.is_active)
        .collect())
}

/// Active games with their scoreboards, for referees.
pub async fn list_active_games(state: &SharedState) -> Result<Vec<ActiveGameView>, ServiceError> {
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;

    let mut views = Vec::new();
    for schedule in active_schedules(&store).await? {
        let (status, scoreboard) = current_scoreboard(&store, &schedule).await?;
        views.push(ActiveGameView {
            id: schedule.id,
            game: games.get(&schedule.game_id).cloned().map(Into::into),
            scheduled_time: schedule.scheduled_time,
            date: schedule.date,
            venue: schedule.venue,
            game_type: schedule.game_type,
            status,
            current_scores: CurrentScores::from(&scoreboard),
        });
    }
    Ok(views)
}

/// Active games with their scoreboards, for public display.
pub async fn list_live_games(state: &SharedState) -> Result<Vec<LiveGameView>, ServiceError> {
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;

    let mut views = Vec::new();
    for schedule in active_schedules(&store).await? {
        let (status, scoreboard) = current_scoreboard(&store, &schedule).await?;
        views.push(LiveGameView {
            id: schedule.id,
            game: games.get(&schedule.game_id).cloned().map(Into::into),
            start_time: schedule.scheduled_time,
            date: schedule.date,
            venue: schedule.venue,
            game_type: schedule.game_type,
            status,
            participants: CurrentScores::from(&scoreboard).participants,
        });
    }
    Ok(views)
}

/// Public details of one active game, with its registrations.
pub async fn get_live_game(state: &SharedState, id: Uuid) -> Result<LiveGameDetails, ServiceError> {
    let store = state.require_record_store().await?;
    let schedule = store
        .find_scheduled_game(id)
        .await?
        .filter(|schedule| schedule.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("active game `{id}` not found")))?;

    let registrations: Vec<RegistrationDetail> = match schedule.game_type {
        GameType::Team => store
            .list_team_registrations(Some(id))
            .await?
            .into_iter()
            .map(|team| TeamRegistrationSummary::from(team).into())
            .collect(),
        GameType::Individual => store
            .list_individual_registrations(Some(id))
            .await?
            .into_iter()
            .map(|player| IndividualRegistrationSummary::from(player).into())
            .collect(),
    };

    let (status, scoreboard) = current_scoreboard(&store, &schedule).await?;
    let game = store.find_game(schedule.game_id).await?;
    Ok(LiveGameDetails {
        view: LiveGameView {
            id,
            game: game.map(Into::into),
            start_time: schedule.scheduled_time,
            date: schedule.date,
            venue: schedule.venue,
            game_type: schedule.game_type,
            status,
            participants: CurrentScores::from(&scoreboard).participants,
        },
        registrations,
    })
}
