use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::{GameEntity, GameType, ScheduledGameEntity},
    state::live_state::LiveState,
};

/// A completed live state joined with its schedule and catalog entry.
#[derive(Debug, Clone)]
pub struct ResolvedResult {
    /// Completed live state.
    pub state: LiveState,
    /// Scheduled game the state belongs to.
    pub schedule: ScheduledGameEntity,
    /// Catalog game of the schedule.
    pub game: GameEntity,
}

/// Counters over completed games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResultsStats {
    /// Number of completed games.
    pub total_games: usize,
    /// Completed team games.
    pub team_events: usize,
    /// Completed individual games.
    pub individual_events: usize,
    /// Sum of participants listed in every completed scoreboard.
    pub total_participants: usize,
    /// Completed games per category, in first-seen order.
    #[schema(value_type = Object)]
    pub by_category: IndexMap<String, usize>,
}

/// Count completed results, optionally restricted to one category.
pub fn aggregate_results(results: &[ResolvedResult], category_filter: Option<&str>) -> ResultsStats {
    results
        .iter()
        .filter(|result| result.state.is_completed())
        .filter(|result| category_filter.is_none_or(|category| result.game.category == category))
        .fold(ResultsStats::default(), |mut stats, result| {
            stats.total_games += 1;
            match result.schedule.game_type {
                GameType::Team => stats.team_events += 1,
                GameType::Individual => stats.individual_events += 1,
            }
            stats.total_participants += result.state.scoreboard.len();
            *stats
                .by_category
                .entry(result.game.category.clone())
                .or_default() += 1;
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::live_state::{Scoreboard, Winner};
    use std::time::SystemTime;
    use uuid::Uuid;

    fn completed(category: &str, scoreboard: Scoreboard) -> ResolvedResult {
        let game = GameEntity {
            id: Uuid::new_v4(),
            icon: "*".into(),
            tamil: "t".into(),
            english: "e".into(),
            category: category.into(),
            created_at: SystemTime::UNIX_EPOCH,
        };
        let schedule = ScheduledGameEntity {
            id: Uuid::new_v4(),
            game_id: game.id,
            scheduled_time: "10:00".into(),
            date: "2025-01-15".into(),
            venue: "Ground".into(),
            participants: Vec::new(),
            game_type: scoreboard.game_type(),
            is_active: false,
            registration_open: false,
            max_teams: None,
            max_players_per_team: None,
            is_league: false,
            league_stage: None,
            team1_id: None,
            team2_id: None,
            parent_game_id: None,
            created_at: SystemTime::UNIX_EPOCH,
        };
        let mut state = LiveState::initialize(schedule.id, scoreboard);
        state.complete(Winner::declared_now("X".into(), None, None));
        ResolvedResult {
            state,
            schedule,
            game,
        }
    }

    fn teams(count: usize) -> Scoreboard {
        Scoreboard::from_team_names((0..count).map(|idx| format!("T{idx}")))
    }

    fn players(count: usize) -> Scoreboard {
        Scoreboard::from_player_names((0..count).map(|idx| format!("P{idx}")))
    }

    #[test]
    fn no_results_yields_zeros() {
        let stats = aggregate_results(&[], None);
        assert_eq!(stats, ResultsStats::default());
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn counts_by_type_and_category() {
        let results = vec![
            completed("sports", teams(2)),
            completed("kids", players(3)),
            completed("sports", players(4)),
        ];
        let stats = aggregate_results(&results, None);
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.team_events, 1);
        assert_eq!(stats.individual_events, 2);
        assert_eq!(stats.total_participants, 9);
        assert_eq!(
            stats.by_category.into_iter().collect::<Vec<_>>(),
            [("sports".to_owned(), 2), ("kids".to_owned(), 1)]
        );
    }

    #[test]
    fn category_filter_restricts_counts() {
        let results = vec![
            completed("sports", teams(2)),
            completed("kids", players(3)),
        ];
        let stats = aggregate_results(&results, Some("kids"));
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.individual_events, 1);
        assert_eq!(stats.team_events, 0);
        assert_eq!(stats.total_participants, 3);
        assert_eq!(stats.by_category.get("kids"), Some(&1));
        assert!(!stats.by_category.contains_key("sports"));
    }

    #[test]
    fn playing_states_are_ignored() {
        let mut result = completed("sports", teams(2));
        result.state = LiveState::initialize(result.schedule.id, teams(2));
        let stats = aggregate_results(&[result], None);
        assert_eq!(stats.total_games, 0);
    }
}
