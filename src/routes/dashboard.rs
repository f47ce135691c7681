use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{DashboardActiveGame, DashboardOverview, DashboardPendingGame, GameStats},
    error::AppError,
    services::dashboard_service,
    state::SharedState,
};

/// Dashboard endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/dashboard/overview", get(overview))
        .route("/dashboard/active-games", get(active_games))
        .route("/dashboard/pending-games", get(pending_games))
        .route("/dashboard/game-stats", get(game_stats))
}

#[utoipa::path(
    get,
    path = "/dashboard/overview",
    tag = "dashboard",
    responses((status = 200, description = "Headline counters", body = DashboardOverview))
)]
pub async fn overview(State(state): State<SharedState>) -> Result<Json<DashboardOverview>, AppError> {
    Ok(Json(dashboard_service::overview(&state).await?))
}

/// Active games with a one line score summary.
#[utoipa::path(
    get,
    path = "/dashboard/active-games",
    tag = "dashboard",
    responses(
        (status = 200, description = "Active games", body = [DashboardActiveGame]),
        (status = 422, description = "A recorded time is malformed")
    )
)]
pub async fn active_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DashboardActiveGame>>, AppError> {
    Ok(Json(dashboard_service::active_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/dashboard/pending-games",
    tag = "dashboard",
    responses((status = 200, description = "Inactive games by date and time", body = [DashboardPendingGame]))
)]
pub async fn pending_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DashboardPendingGame>>, AppError> {
    Ok(Json(dashboard_service::pending_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/dashboard/game-stats",
    tag = "dashboard",
    responses((status = 200, description = "Catalog, schedule and registration counters", body = GameStats))
)]
pub async fn game_stats(State(state): State<SharedState>) -> Result<Json<GameStats>, AppError> {
    Ok(Json(dashboard_service::game_stats(&state).await?))
}
