//! Ordering of live scoreboards into podiums and standings.
//!
//! Both rankings use stable sorts: participants with equal scores or times keep
//! their registration order.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::live_state::{TeamScore, TimedEntry};

const NOT_AVAILABLE: &str = "N/A";

/// Winner or runner-up of a team game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamPlacing {
    /// Team name, `N/A` when the place is vacant.
    pub name: String,
    /// Final score.
    pub score: i64,
}

/// Entry of the full team standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamStanding {
    /// Team name.
    pub name: String,
    /// Final score.
    pub score: i64,
    /// 1-based rank.
    pub rank: usize,
}

/// Result of ranking a team game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamRanking {
    /// Highest score.
    pub winner: TeamPlacing,
    /// Second highest score.
    pub runner_up: TeamPlacing,
    /// Every team, best first.
    pub all_participants: Vec<TeamStanding>,
}

/// Medal awarded to the first three finishers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    /// First place.
    Gold,
    /// Second place.
    Silver,
    /// Third place.
    Bronze,
}

impl Medal {
    /// Medal for a 1-based position, if any.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Entry of an individual podium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PodiumEntry {
    /// 1-based position.
    pub position: usize,
    /// Player name.
    pub name: String,
    /// Time exactly as it was recorded.
    pub time: String,
    /// Medal for the first three positions.
    pub medal: Option<Medal>,
}

/// Failure while ranking a scoreboard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("time `{time}` recorded for `{name}` is not a number of seconds")]
    MalformedTime { name: String, time: String },
}

fn vacant() -> TeamPlacing {
    TeamPlacing {
        name: NOT_AVAILABLE.to_owned(),
        score: 0,
    }
}

/// Rank teams by score, highest first.
pub fn rank_team_results(participants: &[TeamScore]) -> TeamRanking {
    let mut ordered: Vec<&TeamScore> = participants.iter().collect();
    ordered.sort_by(|a, b| b.score.cmp(&a.score));

    let placing = |idx: usize| {
        ordered
            .get(idx)
            .map(|team| TeamPlacing {
                name: team.name.clone(),
                score: team.score,
            })
            .unwrap_or_else(vacant)
    };

    TeamRanking {
        winner: placing(0),
        runner_up: placing(1),
        all_participants: ordered
            .iter()
            .enumerate()
            .map(|(idx, team)| TeamStanding {
                name: team.name.clone(),
                score: team.score,
                rank: idx + 1,
            })
            .collect(),
    }
}

/// Parse a recorded time into seconds. Accepts an optional trailing `s`.
///
/// Parsing is lenient about whitespace: surrounding blanks and blanks before
/// the `s` are ignored, so `" 9 s "` reads as 9 seconds.
pub fn parse_time(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('s').unwrap_or(trimmed).trim_end();
    number.parse::<f64>().ok().filter(|secs| secs.is_finite())
}

/// Rank players by time, fastest first, keeping at most `top_n` entries.
///
/// Players without a time are left out. Any other time that does not parse
/// fails the whole ranking.
pub fn rank_individual_results(
    participants: &[TimedEntry],
    top_n: Option<usize>,
) -> Result<Vec<PodiumEntry>, RankingError> {
    let mut timed = Vec::with_capacity(participants.len());
    for entry in participants {
        let Some(raw) = entry.time.as_deref().filter(|time| !time.is_empty()) else {
            continue;
        };
        let seconds = parse_time(raw).ok_or_else(|| RankingError::MalformedTime {
            name: entry.name.clone(),
            time: raw.to_owned(),
        })?;
        timed.push((seconds, entry.name.as_str(), raw));
    }

    timed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(timed
        .into_iter()
        .take(top_n.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, (_, name, time))| PodiumEntry {
            position: idx + 1,
            name: name.to_owned(),
            time: time.to_owned(),
            medal: Medal::for_position(idx + 1),
        })
        .collect())
}
