//! Payloads of the live scoreboard endpoints and public live views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{
    catalog::GameSummary,
    format_system_time,
    registration::{IndividualRegistrationSummary, TeamRegistrationSummary},
    validation::validate_not_blank,
};
use crate::{
    dao::models::{GameType, LiveStatus},
    state::live_state::{LiveState, Scoreboard, Winner},
};

/// Signed score change for one team, addressed by its index on the scoreboard.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScoreUpdateRequest {
    pub participant_index: i64,
    pub score_change: i64,
}

/// Time recorded for one player, addressed by its index on the scoreboard.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TimeUpdateRequest {
    pub participant_index: i64,
    /// Stored verbatim, e.g. `"12.5"` or `"12.5s"`.
    #[validate(custom(function = "validate_not_blank"))]
    pub time: String,
}

/// Winner declaration closing a live game.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeclareWinnerRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub winner_name: String,
    #[serde(default)]
    pub winner_score: Option<i64>,
    #[serde(default)]
    pub winner_time: Option<String>,
}

/// One scoreboard line: a team score or a player time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ParticipantScore {
    Team { name: String, score: i64 },
    Timed { name: String, time: Option<String> },
}

/// Scoreboard in its `{"participants": [...]}` wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentScores {
    pub participants: Vec<ParticipantScore>,
}

impl From<&Scoreboard> for CurrentScores {
    fn from(value: &Scoreboard) -> Self {
        let participants = match value {
            Scoreboard::Team(teams) => teams
                .iter()
                .map(|team| ParticipantScore::Team {
                    name: team.name.clone(),
                    score: team.score,
                })
                .collect(),
            Scoreboard::Individual(players) => players
                .iter()
                .map(|player| ParticipantScore::Timed {
                    name: player.name.clone(),
                    time: player.time.clone(),
                })
                .collect(),
        };
        Self { participants }
    }
}

/// Declared winner of a completed game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnerSummary {
    pub name: String,
    pub score: Option<i64>,
    pub time: Option<String>,
    /// RFC 3339 declaration timestamp.
    pub declared_at: String,
}

impl From<&Winner> for WinnerSummary {
    fn from(value: &Winner) -> Self {
        Self {
            name: value.name.clone(),
            score: value.score,
            time: value.time.clone(),
            declared_at: format_system_time(value.declared_at),
        }
    }
}

/// Live state of a scheduled game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LiveStateResponse {
    pub id: Uuid,
    pub scheduled_game_id: Uuid,
    pub status: LiveStatus,
    pub current_scores: CurrentScores,
    pub winner_data: Option<WinnerSummary>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&LiveState> for LiveStateResponse {
    fn from(value: &LiveState) -> Self {
        Self {
            id: value.id,
            scheduled_game_id: value.scheduled_game_id,
            status: value.status,
            current_scores: (&value.scoreboard).into(),
            winner_data: value.winner.as_ref().map(Into::into),
            created_at: format_system_time(value.created_at),
            updated_at: format_system_time(value.updated_at),
        }
    }
}

impl From<LiveState> for LiveStateResponse {
    fn from(value: LiveState) -> Self {
        (&value).into()
    }
}

/// Response of a winner declaration.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeclareWinnerResponse {
    pub message: String,
    pub winner: WinnerSummary,
}

/// Active scheduled game with its current scoreboard, for referees.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveGameView {
    pub id: Uuid,
    pub game: Option<GameSummary>,
    pub scheduled_time: String,
    pub date: String,
    pub venue: String,
    pub game_type: GameType,
    pub status: LiveStatus,
    pub current_scores: CurrentScores,
}

/// Active scheduled game with its current scoreboard, for public display.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameView {
    pub id: Uuid,
    pub game: Option<GameSummary>,
    pub start_time: String,
    pub date: String,
    pub venue: String,
    pub game_type: GameType,
    pub status: LiveStatus,
    pub participants: Vec<ParticipantScore>,
}

/// Registration line shown on the public details of a live game.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RegistrationDetail {
    #[serde(rename_all = "camelCase")]
    Team {
        team_name: String,
        captain_name: String,
        captain_phone: Option<String>,
        captain_email: Option<String>,
        players: Vec<String>,
        registered_at: String,
    },
    #[serde(rename_all = "camelCase")]
    Individual {
        player_name: String,
        phone: Option<String>,
        email: Option<String>,
        age: Option<u32>,
        registered_at: String,
    },
}

impl From<TeamRegistrationSummary> for RegistrationDetail {
    fn from(value: TeamRegistrationSummary) -> Self {
        RegistrationDetail::Team {
            team_name: value.team_name,
            captain_name: value.captain_name,
            captain_phone: value.captain_phone,
            captain_email: value.captain_email,
            players: value.players,
            registered_at: value.registered_at,
        }
    }
}

impl From<IndividualRegistrationSummary> for RegistrationDetail {
    fn from(value: IndividualRegistrationSummary) -> Self {
        RegistrationDetail::Individual {
            player_name: value.player_name,
            phone: value.phone,
            email: value.email,
            age: value.age,
            registered_at: value.registered_at,
        }
    }
}

/// Public details of one live game, including its registrations.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LiveGameDetails {
    #[serde(flatten)]
    pub view: LiveGameView,
    pub registrations: Vec<RegistrationDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn team_scoreboard_keeps_legacy_shape() {
        let scoreboard = Scoreboard::from_team_names(["Lions".to_owned(), "Tigers".to_owned()]);
        let value = serde_json::to_value(CurrentScores::from(&scoreboard)).unwrap();
        assert_eq!(
            value,
            json!({"participants": [{"name": "Lions", "score": 0}, {"name": "Tigers", "score": 0}]})
        );
    }

    #[test]
    fn missing_time_serializes_as_null() {
        let scoreboard = Scoreboard::from_player_names(["Anu".to_owned()]);
        let value = serde_json::to_value(CurrentScores::from(&scoreboard)).unwrap();
        assert_eq!(value, json!({"participants": [{"name": "Anu", "time": null}]}));
    }

    #[test]
    fn live_game_view_uses_camel_case() {
        let view = LiveGameView {
            id: Uuid::nil(),
            game: None,
            start_time: "10:00".into(),
            date: "2025-01-15".into(),
            venue: "Ground".into(),
            game_type: GameType::Individual,
            status: LiveStatus::Playing,
            participants: Vec::new(),
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["startTime"], "10:00");
        assert_eq!(value["gameType"], "individual");
        assert_eq!(value["status"], "playing");
    }
}
