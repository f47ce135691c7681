use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::GameSummary;
use crate::dao::models::{GameType, LiveStatus};

/// Headline counters of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardOverview {
    pub total_games: usize,
    pub active_games_count: usize,
    pub pending_games_count: usize,
    /// Team players plus individual players.
    pub total_participants: usize,
}

/// Active game line of the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardActiveGame {
    pub id: Uuid,
    pub game: Option<GameSummary>,
    pub start_time: String,
    pub status: LiveStatus,
    pub venue: String,
    pub game_type: GameType,
    pub participants: Vec<String>,
    /// Human readable score line.
    pub current_score: String,
}

/// Scheduled game not started yet.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPendingGame {
    pub id: Uuid,
    pub game: Option<GameSummary>,
    pub scheduled_time: String,
    pub date: String,
    pub venue: String,
    pub game_type: GameType,
    pub participants: Vec<String>,
    pub registration_open: bool,
    pub max_teams: Option<u32>,
    pub max_players_per_team: Option<u32>,
    pub registered_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScheduleCounters {
    pub active: usize,
    pub pending: usize,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistrationCounters {
    pub total_teams: usize,
    pub total_team_players: usize,
    pub total_individual_players: usize,
    pub total_participants: usize,
}

/// Detailed statistics of the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStats {
    #[schema(value_type = Object)]
    pub games_by_category: IndexMap<String, usize>,
    pub scheduled_games: ScheduleCounters,
    pub registrations: RegistrationCounters,
}
