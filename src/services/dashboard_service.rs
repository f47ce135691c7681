//! Aggregated views for the organisers' dashboard.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    dao::{
        models::{GameType, LiveStatus, ScheduledGameEntity},
        record_store::RecordStore,
    },
    dto::dashboard::{
        DashboardActiveGame, DashboardOverview, DashboardPendingGame, GameStats,
        RegistrationCounters, ScheduleCounters,
    },
    error::ServiceError,
    services::{ranking::rank_individual_results, schedule_service::games_by_id},
    state::{SharedState, live_state::Scoreboard},
};

const NO_SCORE_YET: &str = "0 - 0";
const IN_PROGRESS: &str = "In Progress";

/// One line summary of a scoreboard.
///
/// Team games list every team in registration order; individual games list
/// the `leaders` fastest players recorded so far.
pub fn score_line(
    game_type: GameType,
    scoreboard: &Scoreboard,
    leaders: usize,
) -> Result<String, ServiceError> {
    match game_type {
        GameType::Team => Ok(scoreboard
            .team_scores()
            .iter()
            .map(|team| format!("{}: {}", team.name, team.score))
            .collect::<Vec<_>>()
            .join(" - ")),
        GameType::Individual => {
            let podium = rank_individual_results(scoreboard.timed_entries(), Some(leaders))?;
            if podium.is_empty() {
                return Ok(IN_PROGRESS.to_owned());
            }
            Ok(podium
                .iter()
                .map(|entry| format!("{}: {}", entry.name, entry.time))
                .collect::<Vec<_>>()
                .join(", "))
        }
    }
}

async fn registered_names(
    store: &Arc<dyn RecordStore>,
    schedule: &ScheduledGameEntity,
) -> Result<Vec<String>, ServiceError> {
    let names = match schedule.game_type {
        GameType::Team => store
            .list_team_registrations(Some(schedule.id))
            .await?
            .into_iter()
            .map(|team| team.team_name)
            .collect(),
        GameType::Individual => store
            .list_individual_registrations(Some(schedule.id))
            .await?
            .into_iter()
            .map(|player| player.player_name)
            .collect(),
    };
    Ok(names)
}

/// Team players plus individual players across every registration.
async fn participant_counters(
    store: &Arc<dyn RecordStore>,
) -> Result<RegistrationCounters, ServiceError> {
    let teams = store.list_team_registrations(None).await?;
    let total_individual_players = store.list_individual_registrations(None).await?.len();
    let total_team_players = teams.iter().map(|team| team.players.len()).sum();
    Ok(RegistrationCounters {
        total_teams: teams.len(),
        total_team_players,
        total_individual_players,
        total_participants: total_team_players + total_individual_players,
    })
}

pub async fn overview(state: &SharedState) -> Result<DashboardOverview, ServiceError> {
    let store = state.require_record_store().await?;
    let total_games = store.list_games().await?.len();
    let schedules = store.list_scheduled_games().await?;
    let active_games_count = schedules.iter().filter(|s| s.is_active).count();
    let registrations = participant_counters(&store).await?;

    Ok(DashboardOverview {
        total_games,
        active_games_count,
        pending_games_count: schedules.len() - active_games_count,
        total_participants: registrations.total_participants,
    })
}

/// Active games with their participants and current score line.
pub async fn active_games(state: &SharedState) -> Result<Vec<DashboardActiveGame>, ServiceError> {
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;
    let leaders = state.config().leaders_size;

    let mut lines = Vec::new();
    for schedule in store.list_scheduled_games().await? {
        if !schedule.is_active {
            continue;
        }

        let (status, participants, current_score) = match store.find_live_state(schedule.id).await? {
            Some(entity) => {
                let scoreboard = Scoreboard::from(entity.current_scores);
                let line = score_line(schedule.game_type, &scoreboard, leaders)?;
                (entity.status, scoreboard.names(), line)
            }
            None => {
                let placeholder = match schedule.game_type {
                    GameType::Team => NO_SCORE_YET,
                    GameType::Individual => IN_PROGRESS,
                };
                (
                    LiveStatus::Playing,
                    registered_names(&store, &schedule).await?,
                    placeholder.to_owned(),
                )
            }
        };

        lines.push(DashboardActiveGame {
            id: schedule.id,
            game: games.get(&schedule.game_id).cloned().map(Into::into),
            start_time: schedule.scheduled_time,
            status,
            venue: schedule.venue,
            game_type: schedule.game_type,
            participants,
            current_score,
        });
    }
    Ok(lines)
}

/// Inactive games ordered by date then time.
pub async fn pending_games(state: &SharedState) -> Result<Vec<DashboardPendingGame>, ServiceError> {
    let store = state.require_record_store().await?;
    let games = games_by_id(&store).await?;

    let mut pending: Vec<ScheduledGameEntity> = store
        .list_scheduled_games()
        .await?
        .into_iter()
        .filter(|schedule| !schedule.is_active)
        .collect();
    pending.sort_by(|a, b| a.schedule_key().cmp(&b.schedule_key()));

    let mut lines = Vec::with_capacity(pending.len());
    for schedule in pending {
        let participants = registered_names(&store, &schedule).await?;
        lines.push(DashboardPendingGame {
            id: schedule.id,
            game: games.get(&schedule.game_id).cloned().map(Into::into),
            scheduled_time: schedule.scheduled_time,
            date: schedule.date,
            venue: schedule.venue,
            game_type: schedule.game_type,
            registered_count: participants.len(),
            participants,
            registration_open: schedule.registration_open,
            max_teams: schedule.max_teams,
            max_players_per_team: schedule.max_players_per_team,
        });
    }
    Ok(lines)
}

pub async fn game_stats(state: &SharedState) -> Result<GameStats, ServiceError> {
    let store = state.require_record_store().await?;

    let mut games_by_category: IndexMap<String, usize> = IndexMap::new();
    for game in store.list_games().await? {
        *games_by_category.entry(game.category).or_default() += 1;
    }

    let schedules = store.list_scheduled_games().await?;
    let active = schedules.iter().filter(|s| s.is_active).count();
    let completed = store
        .list_live_states(Some(LiveStatus::Completed))
        .await?
        .len();

    Ok(GameStats {
        games_by_category,
        scheduled_games: ScheduleCounters {
            active,
            pending: schedules.len() - active,
            completed,
            total: schedules.len(),
        },
        registrations: participant_counters(&store).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_line_keeps_registration_order() {
        let mut scoreboard = Scoreboard::from_team_names(["A".to_owned(), "B".to_owned()]);
        if let Scoreboard::Team(teams) = &mut scoreboard {
            teams[0].score = 3;
            teams[1].score = 5;
        }
        assert_eq!(
            score_line(GameType::Team, &scoreboard, 3).unwrap(),
            "A: 3 - B: 5"
        );
    }

    #[test]
    fn individual_line_shows_fastest_leaders() {
        let mut scoreboard = Scoreboard::from_player_names(
            ["A", "B", "C", "D"].into_iter().map(str::to_owned),
        );
        if let Scoreboard::Individual(players) = &mut scoreboard {
            players[0].time = Some("12.3s".into());
            players[1].time = Some("10.1s".into());
            players[3].time = Some("11.0".into());
        }
        assert_eq!(
            score_line(GameType::Individual, &scoreboard, 2).unwrap(),
            "B: 10.1s, D: 11.0"
        );
    }

    #[test]
    fn individual_line_without_times_is_in_progress() {
        let scoreboard = Scoreboard::from_player_names(["A".to_owned()]);
        assert_eq!(
            score_line(GameType::Individual, &scoreboard, 3).unwrap(),
            "In Progress"
        );
    }

    #[test]
    fn malformed_time_is_a_format_error() {
        let mut scoreboard = Scoreboard::from_player_names(["A".to_owned()]);
        if let Scoreboard::Individual(players) = &mut scoreboard {
            players[0].time = Some("fast".into());
        }
        assert!(matches!(
            score_line(GameType::Individual, &scoreboard, 3),
            Err(ServiceError::Format(_))
        ));
    }
}
