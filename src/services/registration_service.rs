//! Team and individual registrations.
//!
//! Registration checks run under the scheduled game's lock so that two
//! concurrent sign-ups cannot both take the last free slot.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{
        GameType, IndividualRegistrationEntity, ScheduledGameEntity, TeamRegistrationEntity,
    },
    dto::registration::{
        CreateIndividualRegistrationRequest, CreateTeamRegistrationRequest,
        IndividualRegistrationSummary, TeamRegistrationSummary,
    },
    error::ServiceError,
    services::schedule_service::scheduled_game_not_found,
    state::SharedState,
};

fn team_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("team registration `{id}` not found"))
}

fn ensure_open(schedule: &ScheduledGameEntity, expected: GameType) -> Result<(), ServiceError> {
    if !schedule.registration_open {
        return Err(ServiceError::InvalidInput(
            "registration is closed for this game".into(),
        ));
    }
    if schedule.game_type != expected {
        return Err(ServiceError::InvalidInput(format!(
            "this game is not a {expected} event"
        )));
    }
    Ok(())
}

fn ensure_player_capacity(
    max_players: Option<u32>,
    player_count: usize,
) -> Result<(), ServiceError> {
    match max_players {
        Some(max) if player_count > max as usize => Err(ServiceError::InvalidInput(format!(
            "maximum {max} players allowed per team"
        ))),
        _ => Ok(()),
    }
}

fn player_index(players: &[String], index: i64) -> Result<usize, ServiceError> {
    usize::try_from(index)
        .ok()
        .filter(|idx| *idx < players.len())
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid player index {index}")))
}

pub async fn list_team_registrations(
    state: &SharedState,
    scheduled_game_id: Uuid,
) -> Result<Vec<TeamRegistrationSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    Ok(store
        .list_team_registrations(Some(scheduled_game_id))
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn create_team_registration(
    state: &SharedState,
    input: CreateTeamRegistrationRequest,
) -> Result<TeamRegistrationSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let scheduled_game_id = input.scheduled_game_id;

    state
        .with_game_lock(scheduled_game_id, || async {
            let schedule = store
                .find_scheduled_game(scheduled_game_id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(scheduled_game_id))?;
            ensure_open(&schedule, GameType::Team)?;

            let existing = store
                .list_team_registrations(Some(scheduled_game_id))
                .await?;
            if let Some(max) = schedule.max_teams {
                if existing.len() >= max as usize {
                    return Err(ServiceError::InvalidInput(
                        "maximum teams limit reached".into(),
                    ));
                }
            }
            ensure_player_capacity(schedule.max_players_per_team, input.players.len())?;
            if existing.iter().any(|team| team.team_name == input.team_name) {
                return Err(ServiceError::InvalidInput(format!(
                    "team name `{}` already registered",
                    input.team_name
                )));
            }

            let registration = TeamRegistrationEntity {
                id: Uuid::new_v4(),
                scheduled_game_id,
                team_name: input.team_name,
                captain_name: input.captain_name,
                captain_phone: input.captain_phone,
                captain_email: input.captain_email,
                players: input.players,
                registered_at: SystemTime::now(),
            };
            store.insert_team_registration(registration.clone()).await?;
            info!(
                scheduled_game_id = %scheduled_game_id,
                team = %registration.team_name,
                "team registered"
            );
            Ok(registration.into())
        })
        .await
}

/// Scheduled game a team is registered on, read without the lock.
async fn team_schedule_id(state: &SharedState, id: Uuid) -> Result<Uuid, ServiceError> {
    let store = state.require_record_store().await?;
    store
        .find_team_registration(id)
        .await?
        .map(|team| team.scheduled_game_id)
        .ok_or_else(|| team_not_found(id))
}

pub async fn delete_team_registration(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    let scheduled_game_id = team_schedule_id(state, id).await?;
    state
        .with_game_lock(scheduled_game_id, || async {
            if !store.delete_team_registration(id).await? {
                return Err(team_not_found(id));
            }
            Ok(())
        })
        .await?;
    info!(registration_id = %id, "team registration deleted");
    Ok(())
}

/// Edit a team under the lock of its scheduled game, then save it.
///
/// `edit` sees the freshly loaded team and its schedule, if the schedule
/// still exists.
async fn update_team<F>(
    state: &SharedState,
    id: Uuid,
    edit: F,
) -> Result<TeamRegistrationSummary, ServiceError>
where
    F: FnOnce(&mut TeamRegistrationEntity, Option<&ScheduledGameEntity>) -> Result<(), ServiceError>,
{
    let store = state.require_record_store().await?;
    let scheduled_game_id = team_schedule_id(state, id).await?;
    state
        .with_game_lock(scheduled_game_id, || async move {
            let mut team = store
                .find_team_registration(id)
                .await?
                .ok_or_else(|| team_not_found(id))?;
            let schedule = store.find_scheduled_game(team.scheduled_game_id).await?;
            edit(&mut team, schedule.as_ref())?;
            store.save_team_registration(team.clone()).await?;
            Ok(team.into())
        })
        .await
}

/// Append a player to a team, respecting the per-team limit of its schedule.
pub async fn add_player(
    state: &SharedState,
    id: Uuid,
    player_name: String,
) -> Result<TeamRegistrationSummary, ServiceError> {
    update_team(state, id, |team, schedule| {
        if team.players.contains(&player_name) {
            return Err(ServiceError::InvalidInput(format!(
                "player `{player_name}` already exists in this team"
            )));
        }
        if let Some(schedule) = schedule {
            ensure_player_capacity(schedule.max_players_per_team, team.players.len() + 1)?;
        }
        team.players.push(player_name);
        info!(registration_id = %id, players = team.players.len(), "player added");
        Ok(())
    })
    .await
}

/// Rename the player at `index`.
pub async fn edit_player(
    state: &SharedState,
    id: Uuid,
    index: i64,
    player_name: String,
) -> Result<TeamRegistrationSummary, ServiceError> {
    update_team(state, id, |team, _| {
        let idx = player_index(&team.players, index)?;
        let clashes = team
            .players
            .iter()
            .enumerate()
            .any(|(other, name)| other != idx && *name == player_name);
        if clashes {
            return Err(ServiceError::InvalidInput(format!(
                "player name `{player_name}` already exists in this team"
            )));
        }
        team.players[idx] = player_name;
        Ok(())
    })
    .await
}

/// Remove the player at `index`. A team always keeps at least one player.
pub async fn delete_player(
    state: &SharedState,
    id: Uuid,
    index: i64,
) -> Result<TeamRegistrationSummary, ServiceError> {
    update_team(state, id, |team, _| {
        let idx = player_index(&team.players, index)?;
        if team.players.len() <= 1 {
            return Err(ServiceError::InvalidInput(
                "cannot delete the last player, a team must have at least one player".into(),
            ));
        }
        team.players.remove(idx);
        info!(registration_id = %id, players = team.players.len(), "player removed");
        Ok(())
    })
    .await
}

pub async fn list_individual_registrations(
    state: &SharedState,
    scheduled_game_id: Uuid,
) -> Result<Vec<IndividualRegistrationSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    Ok(store
        .list_individual_registrations(Some(scheduled_game_id))
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn create_individual_registration(
    state: &SharedState,
    input: CreateIndividualRegistrationRequest,
) -> Result<IndividualRegistrationSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let scheduled_game_id = input.scheduled_game_id;

    state
        .with_game_lock(scheduled_game_id, || async {
            let schedule = store
                .find_scheduled_game(scheduled_game_id)
                .await?
                .ok_or_else(|| scheduled_game_not_found(scheduled_game_id))?;
            ensure_open(&schedule, GameType::Individual)?;

            let already_registered = store
                .list_individual_registrations(Some(scheduled_game_id))
                .await?
                .iter()
                .any(|player| player.player_name == input.player_name);
            if already_registered {
                return Err(ServiceError::InvalidInput(format!(
                    "player `{}` already registered",
                    input.player_name
                )));
            }

            let registration = IndividualRegistrationEntity {
                id: Uuid::new_v4(),
                scheduled_game_id,
                player_name: input.player_name,
                phone: input.phone,
                email: input.email,
                age: input.age,
                registered_at: SystemTime::now(),
            };
            store
                .insert_individual_registration(registration.clone())
                .await?;
            info!(
                scheduled_game_id = %scheduled_game_id,
                player = %registration.player_name,
                "player registered"
            );
            Ok(registration.into())
        })
        .await
}

pub async fn delete_individual_registration(
    state: &SharedState,
    id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    if !store.delete_individual_registration(id).await? {
        return Err(ServiceError::NotFound(format!(
            "individual registration `{id}` not found"
        )));
    }
    info!(registration_id = %id, "individual registration deleted");
    Ok(())
}
