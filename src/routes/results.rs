use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::results::{ResultView, StatsQuery},
    error::AppError,
    services::{aggregation::ResultsStats, results_service},
    state::SharedState,
};

/// Completed results endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/results", get(list_results))
        .route("/results/stats", get(results_stats))
        .route("/results/category/{category}", get(list_results_by_category))
        .route("/results/{id}", get(get_result))
}

#[utoipa::path(
    get,
    path = "/results",
    tag = "results",
    responses(
        (status = 200, description = "Completed games, most recent first", body = [ResultView]),
        (status = 422, description = "A recorded time is malformed")
    )
)]
pub async fn list_results(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ResultView>>, AppError> {
    Ok(Json(results_service::list_results(&state).await?))
}

#[utoipa::path(
    get,
    path = "/results/category/{category}",
    tag = "results",
    params(("category" = String, Path, description = "Category name or `all`")),
    responses(
        (status = 200, description = "Completed games of the category", body = [ResultView]),
        (status = 422, description = "A recorded time is malformed")
    )
)]
pub async fn list_results_by_category(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ResultView>>, AppError> {
    Ok(Json(
        results_service::list_results_by_category(&state, &category).await?,
    ))
}

/// Full result of one game, with every participant ranked.
#[utoipa::path(
    get,
    path = "/results/{id}",
    tag = "results",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses(
        (status = 200, description = "Completed game", body = ResultView),
        (status = 404, description = "Game not completed"),
        (status = 422, description = "A recorded time is malformed")
    )
)]
pub async fn get_result(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultView>, AppError> {
    Ok(Json(results_service::get_result(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/results/stats",
    tag = "results",
    params(StatsQuery),
    responses((status = 200, description = "Counters over completed games", body = ResultsStats))
)]
pub async fn results_stats(
    State(state): State<SharedState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ResultsStats>, AppError> {
    Ok(Json(
        results_service::results_stats(&state, query.category.as_deref()).await?,
    ))
}
