use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{
    catalog::GameSummary,
    format_system_time,
    live::{CurrentScores, WinnerSummary},
};
use crate::{
    dao::models::GameType,
    services::{
        aggregation::ResolvedResult,
        ranking::{PodiumEntry, TeamPlacing, TeamRanking, TeamStanding},
    },
};

/// Ranking attached to a completed result, depending on the game type.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ResultRanking {
    /// Team game: winner and runner-up, plus full standings on detailed lookups.
    Team {
        winner: TeamPlacing,
        runner_up: TeamPlacing,
        #[serde(skip_serializing_if = "Option::is_none")]
        all_participants: Option<Vec<TeamStanding>>,
    },
    /// Individual game: finishers ordered by time.
    Individual { results: Vec<PodiumEntry> },
}

impl ResultRanking {
    /// Team ranking keeping only the podium.
    pub fn team_podium(ranking: TeamRanking) -> Self {
        ResultRanking::Team {
            winner: ranking.winner,
            runner_up: ranking.runner_up,
            all_participants: None,
        }
    }

    /// Team ranking with every standing.
    pub fn team_full(ranking: TeamRanking) -> Self {
        ResultRanking::Team {
            winner: ranking.winner,
            runner_up: ranking.runner_up,
            all_participants: Some(ranking.all_participants),
        }
    }
}

/// Completed game with its final ranking.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultView {
    /// Live state identifier.
    pub id: Uuid,
    pub scheduled_game_id: Uuid,
    pub game: GameSummary,
    pub date: String,
    pub venue: String,
    pub game_type: GameType,
    pub winner_data: Option<WinnerSummary>,
    pub current_scores: CurrentScores,
    /// RFC 3339 timestamp of the last update of the state.
    pub completed_at: String,
    #[serde(flatten)]
    pub ranking: ResultRanking,
}

impl ResultView {
    /// Assemble a view from a resolved result and its ranking.
    pub fn new(result: &ResolvedResult, ranking: ResultRanking) -> Self {
        Self {
            id: result.state.id,
            scheduled_game_id: result.state.scheduled_game_id,
            game: result.game.clone().into(),
            date: result.schedule.date.clone(),
            venue: result.schedule.venue.clone(),
            game_type: result.schedule.game_type,
            winner_data: result.state.winner.as_ref().map(Into::into),
            current_scores: (&result.state.scoreboard).into(),
            completed_at: format_system_time(result.state.updated_at),
            ranking,
        }
    }
}

/// Optional category restriction of the statistics.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Category to count; every category when absent.
    pub category: Option<String>,
}
