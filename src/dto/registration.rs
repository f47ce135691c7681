use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{
    format_system_time,
    validation::{validate_not_blank, validate_players},
};
use crate::dao::models::{IndividualRegistrationEntity, TeamRegistrationEntity};

/// Payload used to register a team.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRegistrationRequest {
    pub scheduled_game_id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub team_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub captain_name: String,
    #[serde(default)]
    pub captain_phone: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub captain_email: Option<String>,
    /// Player names, at least one.
    #[validate(custom(function = "validate_players"))]
    pub players: Vec<String>,
}

/// Payload used to register a single player.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIndividualRegistrationRequest {
    pub scheduled_game_id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub player_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(range(max = 150))]
    pub age: Option<u32>,
}

/// Player name used when adding or renaming a team member.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlayerRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub player_name: String,
}

/// Team registration as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamRegistrationSummary {
    pub id: Uuid,
    pub scheduled_game_id: Uuid,
    pub team_name: String,
    pub captain_name: String,
    pub captain_phone: Option<String>,
    pub captain_email: Option<String>,
    pub players: Vec<String>,
    /// RFC 3339 registration timestamp.
    pub registered_at: String,
}

impl From<TeamRegistrationEntity> for TeamRegistrationSummary {
    fn from(value: TeamRegistrationEntity) -> Self {
        Self {
            id: value.id,
            scheduled_game_id: value.scheduled_game_id,
            team_name: value.team_name,
            captain_name: value.captain_name,
            captain_phone: value.captain_phone,
            captain_email: value.captain_email,
            players: value.players,
            registered_at: format_system_time(value.registered_at),
        }
    }
}

/// Individual registration as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndividualRegistrationSummary {
    pub id: Uuid,
    pub scheduled_game_id: Uuid,
    pub player_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    /// RFC 3339 registration timestamp.
    pub registered_at: String,
}

impl From<IndividualRegistrationEntity> for IndividualRegistrationSummary {
    fn from(value: IndividualRegistrationEntity) -> Self {
        Self {
            id: value.id,
            scheduled_game_id: value.scheduled_game_id,
            player_name: value.player_name,
            phone: value.phone,
            email: value.email,
            age: value.age,
            registered_at: format_system_time(value.registered_at),
        }
    }
}

/// Response returned after removing a player from a team.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerDeletedResponse {
    pub message: String,
    pub team: TeamRegistrationSummary,
}
