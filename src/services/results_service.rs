use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::{
        models::{GameType, LiveStatus},
        record_store::RecordStore,
    },
    dto::results::{ResultRanking, ResultView},
    error::ServiceError,
    services::{
        aggregation::{ResolvedResult, ResultsStats, aggregate_results},
        catalog_service::ALL_CATEGORIES,
        ranking::{rank_individual_results, rank_team_results},
        schedule_service::games_by_id,
    },
    state::{SharedState, live_state::LiveState},
};

/// Completed states joined with their schedule and game, most recent first.
///
/// States whose schedule or catalog game no longer exists are skipped.
async fn resolve_completed(
    store: &Arc<dyn RecordStore>,
) -> Result<Vec<ResolvedResult>, ServiceError> {
    let games = games_by_id(store).await?;
    let schedules: HashMap<_, _> = store
        .list_scheduled_games()
        .await?
        .into_iter()
        .map(|schedule| (schedule.id, schedule))
        .collect();

    let mut resolved = Vec::new();
    for entity in store.list_live_states(Some(LiveStatus::Completed)).await? {
        let state = LiveState::from(entity);
        let Some(schedule) = schedules.get(&state.scheduled_game_id) else {
            warn!(
                scheduled_game_id = %state.scheduled_game_id,
                "skipping result of a deleted scheduled game"
            );
            continue;
        };
        let Some(game) = games.get(&schedule.game_id) else {
            warn!(
                scheduled_game_id = %state.scheduled_game_id,
                game_id = %schedule.game_id,
                "skipping result of a deleted game"
            );
            continue;
        };
        resolved.push(ResolvedResult {
            state,
            schedule: schedule.clone(),
            game: game.clone(),
        });
    }

    resolved.sort_by_key(|result| Reverse(result.state.updated_at));
    Ok(resolved)
}

/// Rank a result. Listings keep the podium only; `detailed` keeps every entry.
fn rank(
    result: &ResolvedResult,
    podium_size: usize,
    detailed: bool,
) -> Result<ResultRanking, ServiceError> {
    let scoreboard = &result.state.scoreboard;
    let ranking = match result.schedule.game_type {
        GameType::Team => {
            let ranking = rank_team_results(scoreboard.team_scores());
            if detailed {
                ResultRanking::team_full(ranking)
            } else {
                ResultRanking::team_podium(ranking)
            }
        }
        GameType::Individual => {
            let top_n = (!detailed).then_some(podium_size);
            ResultRanking::Individual {
                results: rank_individual_results(scoreboard.timed_entries(), top_n)?,
            }
        }
    };
    Ok(ranking)
}

fn to_views(
    results: &[ResolvedResult],
    podium_size: usize,
) -> Result<Vec<ResultView>, ServiceError> {
    results
        .iter()
        .map(|result| Ok(ResultView::new(result, rank(result, podium_size, false)?)))
        .collect()
}

/// Every completed result, most recent first.
pub async fn list_results(state: &SharedState) -> Result<Vec<ResultView>, ServiceError> {
    let store = state.require_record_store().await?;
    let results = resolve_completed(&store).await?;
    to_views(&results, state.config().podium_size)
}

/// Completed results of one category, or all of them for `all`.
pub async fn list_results_by_category(
    state: &SharedState,
    category: &str,
) -> Result<Vec<ResultView>, ServiceError> {
    let store = state.require_record_store().await?;
    let results: Vec<ResolvedResult> = resolve_completed(&store)
        .await?
        .into_iter()
        .filter(|result| category == ALL_CATEGORIES || result.game.category == category)
        .collect();
    to_views(&results, state.config().podium_size)
}

/// Full result of one completed scheduled game.
pub async fn get_result(
    state: &SharedState,
    scheduled_game_id: Uuid,
) -> Result<ResultView, ServiceError> {
    let store = state.require_record_store().await?;
    let result = resolve_completed(&store)
        .await?
        .into_iter()
        .find(|result| result.state.scheduled_game_id == scheduled_game_id)
        .ok_or_else(|| {
            ServiceError::NotFound(format!("result of scheduled game `{scheduled_game_id}` not found"))
        })?;
    let ranking = rank(&result, state.config().podium_size, true)?;
    Ok(ResultView::new(&result, ranking))
}

/// Counters over completed results, optionally for one category.
pub async fn results_stats(
    state: &SharedState,
    category: Option<&str>,
) -> Result<ResultsStats, ServiceError> {
    let store = state.require_record_store().await?;
    let results = resolve_completed(&store).await?;
    let category = category.filter(|category| *category != ALL_CATEGORIES);
    Ok(aggregate_results(&results, category))
}
