use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    CurrentScoresEntity, GameEntity, GameType, IndividualRegistrationEntity, LiveStateEntity,
    LiveStatus, ScheduledGameEntity, TeamRegistrationEntity, WinnerEntity,
};

pub const GAMES: &str = "games";
pub const SCHEDULED_GAMES: &str = "scheduled_games";
pub const TEAM_REGISTRATIONS: &str = "team_registrations";
pub const INDIVIDUAL_REGISTRATIONS: &str = "individual_registrations";
pub const LIVE_STATES: &str = "live_states";

/// Identifiers are stored as their hyphenated string form.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

fn parse_id(collection: &'static str, raw: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|source| MongoDaoError::InvalidDocument {
        collection,
        id: raw.to_owned(),
        source,
    })
}

fn parse_optional_id(collection: &'static str, raw: Option<&str>) -> MongoResult<Option<Uuid>> {
    raw.map(|value| parse_id(collection, value)).transpose()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: String,
    icon: String,
    tamil: String,
    english: String,
    category: String,
    created_at: DateTime,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id.to_string(),
            icon: value.icon,
            tamil: value.tamil,
            english: value.english,
            category: value.category,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoGameDocument> for GameEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGameDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(GAMES, &value.id)?,
            icon: value.icon,
            tamil: value.tamil,
            english: value.english,
            category: value.category,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScheduledGameDocument {
    #[serde(rename = "_id")]
    id: String,
    game_id: String,
    scheduled_time: String,
    date: String,
    venue: String,
    #[serde(default)]
    participants: Vec<String>,
    #[serde(default)]
    game_type: GameType,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    registration_open: bool,
    max_teams: Option<u32>,
    max_players_per_team: Option<u32>,
    #[serde(default)]
    is_league: bool,
    league_stage: Option<String>,
    team1_id: Option<String>,
    team2_id: Option<String>,
    parent_game_id: Option<String>,
    created_at: DateTime,
}

impl From<ScheduledGameEntity> for MongoScheduledGameDocument {
    fn from(value: ScheduledGameEntity) -> Self {
        Self {
            id: value.id.to_string(),
            game_id: value.game_id.to_string(),
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
            team1_id: value.team1_id.map(|id| id.to_string()),
            team2_id: value.team2_id.map(|id| id.to_string()),
            parent_game_id: value.parent_game_id.map(|id| id.to_string()),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoScheduledGameDocument> for ScheduledGameEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoScheduledGameDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(SCHEDULED_GAMES, &value.id)?,
            game_id: parse_id(SCHEDULED_GAMES, &value.game_id)?,
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
            team1_id: parse_optional_id(SCHEDULED_GAMES, value.team1_id.as_deref())?,
            team2_id: parse_optional_id(SCHEDULED_GAMES, value.team2_id.as_deref())?,
            parent_game_id: parse_optional_id(SCHEDULED_GAMES, value.parent_game_id.as_deref())?,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamRegistrationDocument {
    #[serde(rename = "_id")]
    id: String,
    scheduled_game_id: String,
    team_name: String,
    captain_name: String,
    captain_phone: Option<String>,
    captain_email: Option<String>,
    players: Vec<String>,
    registered_at: DateTime,
}

impl From<TeamRegistrationEntity> for MongoTeamRegistrationDocument {
    fn from(value: TeamRegistrationEntity) -> Self {
        Self {
            id: value.id.to_string(),
            scheduled_game_id: value.scheduled_game_id.to_string(),
            team_name: value.team_name,
            captain_name: value.captain_name,
            captain_phone: value.captain_phone,
            captain_email: value.captain_email,
            players: value.players,
            registered_at: DateTime::from_system_time(value.registered_at),
        }
    }
}

impl TryFrom<MongoTeamRegistrationDocument> for TeamRegistrationEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoTeamRegistrationDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TEAM_REGISTRATIONS, &value.id)?,
            scheduled_game_id: parse_id(TEAM_REGISTRATIONS, &value.scheduled_game_id)?,
            team_name: value.team_name,
            captain_name: value.captain_name,
            captain_phone: value.captain_phone,
            captain_email: value.captain_email,
            players: value.players,
            registered_at: value.registered_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoIndividualRegistrationDocument {
    #[serde(rename = "_id")]
    id: String,
    scheduled_game_id: String,
    player_name: String,
    phone: Option<String>,
    email: Option<String>,
    age: Option<u32>,
    registered_at: DateTime,
}

impl From<IndividualRegistrationEntity> for MongoIndividualRegistrationDocument {
    fn from(value: IndividualRegistrationEntity) -> Self {
        Self {
            id: value.id.to_string(),
            scheduled_game_id: value.scheduled_game_id.to_string(),
            player_name: value.player_name,
            phone: value.phone,
            email: value.email,
            age: value.age,
            registered_at: DateTime::from_system_time(value.registered_at),
        }
    }
}

impl TryFrom<MongoIndividualRegistrationDocument> for IndividualRegistrationEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoIndividualRegistrationDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(INDIVIDUAL_REGISTRATIONS, &value.id)?,
            scheduled_game_id: parse_id(INDIVIDUAL_REGISTRATIONS, &value.scheduled_game_id)?,
            player_name: value.player_name,
            phone: value.phone,
            email: value.email,
            age: value.age,
            registered_at: value.registered_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MongoWinnerDocument {
    name: String,
    score: Option<i64>,
    time: Option<String>,
    declared_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoLiveStateDocument {
    #[serde(rename = "_id")]
    id: String,
    scheduled_game_id: String,
    status: LiveStatus,
    current_scores: CurrentScoresEntity,
    winner_data: Option<MongoWinnerDocument>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<LiveStateEntity> for MongoLiveStateDocument {
    fn from(value: LiveStateEntity) -> Self {
        Self {
            id: value.id.to_string(),
            scheduled_game_id: value.scheduled_game_id.to_string(),
            status: value.status,
            current_scores: value.current_scores,
            winner_data: value.winner_data.map(|winner| MongoWinnerDocument {
                name: winner.name,
                score: winner.score,
                time: winner.time,
                declared_at: DateTime::from_system_time(winner.declared_at),
            }),
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoLiveStateDocument> for LiveStateEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoLiveStateDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(LIVE_STATES, &value.id)?,
            scheduled_game_id: parse_id(LIVE_STATES, &value.scheduled_game_id)?,
            status: value.status,
            current_scores: value.current_scores,
            winner_data: value.winner_data.map(|winner| WinnerEntity {
                name: winner.name,
                score: winner.score,
                time: winner.time,
                declared_at: winner.declared_at.to_system_time(),
            }),
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}
