use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of event a scheduled game hosts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Teams compete for points.
    #[default]
    Team,
    /// Players compete against the clock.
    Individual,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Team => f.write_str("team"),
            GameType::Individual => f.write_str("individual"),
        }
    }
}

/// Lifecycle of a live state. `Playing` only ever moves to `Completed`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LiveStatus {
    /// Scores and times are still being recorded.
    #[default]
    Playing,
    /// A winner has been declared.
    Completed,
}

impl LiveStatus {
    /// Lowercase wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            LiveStatus::Playing => "playing",
            LiveStatus::Completed => "completed",
        }
    }
}

/// Catalog entry describing a game that can be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Icon shown next to the game name.
    pub icon: String,
    /// Display name in Tamil.
    pub tamil: String,
    /// Display name in English.
    pub english: String,
    /// Free-form category used for grouping and statistics.
    pub category: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// A concrete instance of a catalog game at a given time and venue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledGameEntity {
    /// Primary key of the scheduled game.
    pub id: Uuid,
    /// Catalog game this instance belongs to.
    pub game_id: Uuid,
    /// Start time as entered by the organisers (e.g. `10:30`).
    pub scheduled_time: String,
    /// Date as entered by the organisers (e.g. `2025-01-15`).
    pub date: String,
    /// Where the game takes place.
    pub venue: String,
    /// Manually entered roster, kept for older schedules.
    pub participants: Vec<String>,
    /// Team or individual event.
    pub game_type: GameType,
    /// Whether the game is currently being played.
    pub is_active: bool,
    /// Whether new registrations are accepted.
    pub registration_open: bool,
    /// Maximum number of teams allowed to register.
    pub max_teams: Option<u32>,
    /// Maximum number of players per team.
    pub max_players_per_team: Option<u32>,
    /// Whether this instance is a league match between two known teams.
    pub is_league: bool,
    /// League stage label (e.g. `semi-final`).
    pub league_stage: Option<String>,
    /// First team registration of a league match.
    pub team1_id: Option<Uuid>,
    /// Second team registration of a league match.
    pub team2_id: Option<Uuid>,
    /// Previous match this league match follows.
    pub parent_game_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Team signed up for a scheduled game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRegistrationEntity {
    /// Primary key of the registration.
    pub id: Uuid,
    /// Scheduled game the team registered for.
    pub scheduled_game_id: Uuid,
    /// Team name, unique per scheduled game.
    pub team_name: String,
    /// Name of the team captain.
    pub captain_name: String,
    /// Optional captain phone number.
    pub captain_phone: Option<String>,
    /// Optional captain email.
    pub captain_email: Option<String>,
    /// Player names, never empty.
    pub players: Vec<String>,
    /// Registration timestamp, defines participant order.
    pub registered_at: SystemTime,
}

/// Single player signed up for a scheduled game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndividualRegistrationEntity {
    /// Primary key of the registration.
    pub id: Uuid,
    /// Scheduled game the player registered for.
    pub scheduled_game_id: Uuid,
    /// Player name, unique per scheduled game.
    pub player_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional email.
    pub email: Option<String>,
    /// Optional age.
    pub age: Option<u32>,
    /// Registration timestamp, defines participant order.
    pub registered_at: SystemTime,
}

/// Score line of one team in a live state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TeamScoreEntity {
    /// Team name.
    pub name: String,
    /// Current score, never negative.
    #[serde(default)]
    pub score: i64,
}

/// Time line of one player in a live state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimedEntryEntity {
    /// Player name.
    pub name: String,
    /// Recorded time, stored verbatim.
    #[serde(default)]
    pub time: Option<String>,
}

/// Persisted scoreboard. Both variants serialize as `{"participants": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CurrentScoresEntity {
    /// Scoreboard of a team game.
    Team {
        /// Teams in registration order.
        participants: Vec<TeamScoreEntity>,
    },
    /// Scoreboard of an individual game.
    Individual {
        /// Players in registration order.
        participants: Vec<TimedEntryEntity>,
    },
}

/// Winner recorded when a game is completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerEntity {
    /// Winner name.
    pub name: String,
    /// Winning score, for team games.
    pub score: Option<i64>,
    /// Winning time, for individual games.
    pub time: Option<String>,
    /// When the winner was declared.
    pub declared_at: SystemTime,
}

/// Live scoreboard of a scheduled game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiveStateEntity {
    /// Primary key of the live state.
    pub id: Uuid,
    /// Scheduled game this state tracks, unique across live states.
    pub scheduled_game_id: Uuid,
    /// Playing or completed.
    pub status: LiveStatus,
    /// Participants with their scores or times.
    pub current_scores: CurrentScoresEntity,
    /// Present once the game is completed.
    pub winner_data: Option<WinnerEntity>,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
}

impl ScheduledGameEntity {
    /// Sort key used by listings ordered by date then time.
    pub fn schedule_key(&self) -> (&str, &str) {
        (self.date.as_str(), self.scheduled_time.as_str())
    }
}
