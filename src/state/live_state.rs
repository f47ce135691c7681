use std::time::SystemTime;

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{
    CurrentScoresEntity, GameType, LiveStateEntity, LiveStatus, TeamScoreEntity,
    TimedEntryEntity, WinnerEntity,
};

/// Score line of a team during a live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScore {
    /// Team name, taken from its registration.
    pub name: String,
    /// Current score, clamped at zero.
    pub score: i64,
}

/// Time line of a player during a live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEntry {
    /// Player name, taken from their registration.
    pub name: String,
    /// Raw time as entered by the referee (`"12.5"`, `"12.5s"`), parsed only when ranking.
    pub time: Option<String>,
}

/// Participants of a live game, addressed by index in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scoreboard {
    /// Teams competing for points.
    Team(Vec<TeamScore>),
    /// Players competing against the clock.
    Individual(Vec<TimedEntry>),
}

/// Winner recorded when a game is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    /// Winner name.
    pub name: String,
    /// Winning score, for team games.
    pub score: Option<i64>,
    /// Winning time, for individual games.
    pub time: Option<String>,
    /// When the winner was declared.
    pub declared_at: SystemTime,
}

/// Live scoreboard of one scheduled game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveState {
    /// Primary key of the state.
    pub id: Uuid,
    /// Scheduled game tracked by this state.
    pub scheduled_game_id: Uuid,
    /// Playing until a winner is declared.
    pub status: LiveStatus,
    /// Participants with their scores or times.
    pub scoreboard: Scoreboard,
    /// Present once completed.
    pub winner: Option<Winner>,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
}

/// Rejected mutation of a live state. The state is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiveStateError {
    #[error("participant index {index} is out of range for {len} participant(s)")]
    OutOfRange { index: i64, len: usize },
    #[error("{operation} updates do not apply to {game_type} games")]
    WrongGameType {
        operation: &'static str,
        game_type: GameType,
    },
}

impl Scoreboard {
    /// Empty scoreboard for the given game type.
    pub fn empty(game_type: GameType) -> Self {
        match game_type {
            GameType::Team => Scoreboard::Team(Vec::new()),
            GameType::Individual => Scoreboard::Individual(Vec::new()),
        }
    }

    /// Scoreboard listing teams at zero points.
    pub fn from_team_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        Scoreboard::Team(
            names
                .into_iter()
                .map(|name| TeamScore { name, score: 0 })
                .collect(),
        )
    }

    /// Scoreboard listing players without a time yet.
    pub fn from_player_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        Scoreboard::Individual(
            names
                .into_iter()
                .map(|name| TimedEntry { name, time: None })
                .collect(),
        )
    }

    /// Game type this scoreboard belongs to.
    pub fn game_type(&self) -> GameType {
        match self {
            Scoreboard::Team(_) => GameType::Team,
            Scoreboard::Individual(_) => GameType::Individual,
        }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        match self {
            Scoreboard::Team(teams) => teams.len(),
            Scoreboard::Individual(players) => players.len(),
        }
    }

    /// Whether no participant is listed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Team lines, empty for an individual scoreboard.
    pub fn team_scores(&self) -> &[TeamScore] {
        match self {
            Scoreboard::Team(teams) => teams,
            Scoreboard::Individual(_) => &[],
        }
    }

    /// Player lines, empty for a team scoreboard.
    pub fn timed_entries(&self) -> &[TimedEntry] {
        match self {
            Scoreboard::Individual(players) => players,
            Scoreboard::Team(_) => &[],
        }
    }

    /// Participant names in index order.
    pub fn names(&self) -> Vec<String> {
        match self {
            Scoreboard::Team(teams) => teams.iter().map(|team| team.name.clone()).collect(),
            Scoreboard::Individual(players) => {
                players.iter().map(|player| player.name.clone()).collect()
            }
        }
    }
}

fn checked_index(index: i64, len: usize) -> Result<usize, LiveStateError> {
    usize::try_from(index)
        .ok()
        .filter(|idx| *idx < len)
        .ok_or(LiveStateError::OutOfRange { index, len })
}

impl LiveState {
    /// Fresh playing state over the given scoreboard.
    pub fn initialize(scheduled_game_id: Uuid, scoreboard: Scoreboard) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            scheduled_game_id,
            status: LiveStatus::Playing,
            scoreboard,
            winner: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a signed delta to a team score, clamping the result at zero.
    ///
    /// An empty scoreboard of either kind reports [`LiveStateError::OutOfRange`].
    pub fn apply_score_delta(&mut self, index: i64, delta: i64) -> Result<i64, LiveStateError> {
        let teams = match &mut self.scoreboard {
            Scoreboard::Team(teams) => teams,
            Scoreboard::Individual(players) if players.is_empty() => {
                return Err(LiveStateError::OutOfRange { index, len: 0 });
            }
            Scoreboard::Individual(_) => {
                return Err(LiveStateError::WrongGameType {
                    operation: "score",
                    game_type: GameType::Individual,
                });
            }
        };

        let idx = checked_index(index, teams.len())?;
        let team = &mut teams[idx];
        team.score = team.score.saturating_add(delta).max(0);
        let score = team.score;
        self.touch();
        Ok(score)
    }

    /// Store a player's time verbatim.
    pub fn apply_time(&mut self, index: i64, time: String) -> Result<(), LiveStateError> {
        let players = match &mut self.scoreboard {
            Scoreboard::Individual(players) => players,
            Scoreboard::Team(teams) if teams.is_empty() => {
                return Err(LiveStateError::OutOfRange { index, len: 0 });
            }
            Scoreboard::Team(_) => {
                return Err(LiveStateError::WrongGameType {
                    operation: "time",
                    game_type: GameType::Team,
                });
            }
        };

        let idx = checked_index(index, players.len())?;
        players[idx].time = Some(time);
        self.touch();
        Ok(())
    }

    /// Mark the game completed. Declaring again overwrites the previous winner.
    pub fn complete(&mut self, winner: Winner) {
        self.status = LiveStatus::Completed;
        self.winner = Some(winner);
        self.touch();
    }

    /// Whether a winner has been declared.
    pub fn is_completed(&self) -> bool {
        self.status == LiveStatus::Completed
    }

    fn touch(&mut self) {
        // keep updated_at monotonic even if the wall clock steps back
        self.updated_at = SystemTime::now().max(self.updated_at);
    }
}

impl Winner {
    /// Winner declared at the current instant.
    pub fn declared_now(name: String, score: Option<i64>, time: Option<String>) -> Self {
        Self {
            name,
            score,
            time,
            declared_at: SystemTime::now(),
        }
    }
}

impl From<TeamScoreEntity> for TeamScore {
    fn from(value: TeamScoreEntity) -> Self {
        Self {
            name: value.name,
            score: value.score,
        }
    }
}

impl From<TeamScore> for TeamScoreEntity {
    fn from(value: TeamScore) -> Self {
        Self {
            name: value.name,
            score: value.score,
        }
    }
}

impl From<TimedEntryEntity> for TimedEntry {
    fn from(value: TimedEntryEntity) -> Self {
        Self {
            name: value.name,
            time: value.time,
        }
    }
}

impl From<TimedEntry> for TimedEntryEntity {
    fn from(value: TimedEntry) -> Self {
        Self {
            name: value.name,
            time: value.time,
        }
    }
}

impl From<CurrentScoresEntity> for Scoreboard {
    fn from(value: CurrentScoresEntity) -> Self {
        match value {
            CurrentScoresEntity::Team { participants } => {
                Scoreboard::Team(participants.into_iter().map(Into::into).collect())
            }
            CurrentScoresEntity::Individual { participants } => {
                Scoreboard::Individual(participants.into_iter().map(Into::into).collect())
            }
        }
    }
}

impl From<Scoreboard> for CurrentScoresEntity {
    fn from(value: Scoreboard) -> Self {
        match value {
            Scoreboard::Team(teams) => CurrentScoresEntity::Team {
                participants: teams.into_iter().map(Into::into).collect(),
            },
            Scoreboard::Individual(players) => CurrentScoresEntity::Individual {
                participants: players.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<WinnerEntity> for Winner {
    fn from(value: WinnerEntity) -> Self {
        Self {
            name: value.name,
            score: value.score,
            time: value.time,
            declared_at: value.declared_at,
        }
    }
}

impl From<Winner> for WinnerEntity {
    fn from(value: Winner) -> Self {
        Self {
            name: value.name,
            score: value.score,
            time: value.time,
            declared_at: value.declared_at,
        }
    }
}

impl From<LiveStateEntity> for LiveState {
    fn from(value: LiveStateEntity) -> Self {
        Self {
            id: value.id,
            scheduled_game_id: value.scheduled_game_id,
            status: value.status,
            scoreboard: value.current_scores.into(),
            winner: value.winner_data.map(Into::into),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<LiveState> for LiveStateEntity {
    fn from(value: LiveState) -> Self {
        Self {
            id: value.id,
            scheduled_game_id: value.scheduled_game_id,
            status: value.status,
            current_scores: value.scoreboard.into(),
            winner_data: value.winner.map(Into::into),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
