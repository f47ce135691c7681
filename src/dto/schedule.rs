use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    catalog::GameSummary, format_system_time, registration::TeamRegistrationSummary,
    validation::validate_not_blank,
};
use crate::dao::models::{GameEntity, GameType, ScheduledGameEntity};

/// Payload used to schedule a catalog game.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateScheduledGameRequest {
    pub game_id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub scheduled_time: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub date: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub venue: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub game_type: GameType,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_teams: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_players_per_team: Option<u32>,
}

/// Partial update of a scheduled game. At least one field must be set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduledGameRequest {
    pub scheduled_time: Option<String>,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub participants: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub registration_open: Option<bool>,
    #[validate(range(min = 1))]
    pub max_teams: Option<u32>,
    #[validate(range(min = 1))]
    pub max_players_per_team: Option<u32>,
    pub is_league: Option<bool>,
    pub league_stage: Option<String>,
    pub team1_id: Option<Uuid>,
    pub team2_id: Option<Uuid>,
}

impl UpdateScheduledGameRequest {
    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.scheduled_time.is_none()
            && self.date.is_none()
            && self.venue.is_none()
            && self.participants.is_none()
            && self.is_active.is_none()
            && self.registration_open.is_none()
            && self.max_teams.is_none()
            && self.max_players_per_team.is_none()
            && self.is_league.is_none()
            && self.league_stage.is_none()
            && self.team1_id.is_none()
            && self.team2_id.is_none()
    }
}

/// Payload used to create a league match between two registered teams.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeagueMatchRequest {
    pub game_id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub scheduled_time: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub date: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub venue: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_players_per_team: Option<u32>,
    pub league_stage: Option<String>,
    pub team1_id: Option<Uuid>,
    pub team2_id: Option<Uuid>,
    pub parent_game_id: Option<Uuid>,
}

/// Query parameters describing the follow-up match of a league game.
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NextStageQuery {
    #[validate(custom(function = "validate_not_blank"))]
    pub next_stage: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub scheduled_time: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub date: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub venue: String,
    pub team1_id: Option<Uuid>,
    pub team2_id: Option<Uuid>,
}

/// Scheduled game joined with its catalog entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduledGameSummary {
    pub id: Uuid,
    pub game_id: Uuid,
    /// Catalog entry, absent when it has been deleted.
    pub game: Option<GameSummary>,
    pub scheduled_time: String,
    pub date: String,
    pub venue: String,
    pub participants: Vec<String>,
    pub game_type: GameType,
    pub is_active: bool,
    pub registration_open: bool,
    pub max_teams: Option<u32>,
    pub max_players_per_team: Option<u32>,
    pub is_league: bool,
    pub league_stage: Option<String>,
    pub team1_id: Option<Uuid>,
    pub team2_id: Option<Uuid>,
    pub parent_game_id: Option<Uuid>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<(ScheduledGameEntity, Option<GameEntity>)> for ScheduledGameSummary {
    fn from((value, game): (ScheduledGameEntity, Option<GameEntity>)) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            game: game.map(Into::into),
            scheduled_time: value.scheduled_time,
            date: value.date,
            venue: value.venue,
            participants: value.participants,
            game_type: value.game_type,
            is_active: value.is_active,
            registration_open: value.registration_open,
            max_teams: value.max_teams,
            max_players_per_team: value.max_players_per_team,
            is_league: value.is_league,
            league_stage: value.league_stage,
            team1_id: value.team1_id,
            team2_id: value.team2_id,
            parent_game_id: value.parent_game_id,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// League match with both team registrations resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeagueMatchSummary {
    #[serde(flatten)]
    pub schedule: ScheduledGameSummary,
    pub team1: Option<TeamRegistrationSummary>,
    pub team2: Option<TeamRegistrationSummary>,
}

/// New activation flag of a scheduled game.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivationResponse {
    pub id: Uuid,
    pub is_active: bool,
}

/// New registration flag of a scheduled game.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationToggleResponse {
    pub id: Uuid,
    pub registration_open: bool,
}
