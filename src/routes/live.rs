use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::live::{
        ActiveGameView, DeclareWinnerRequest, DeclareWinnerResponse, LiveGameDetails,
        LiveGameView, LiveStateResponse, ScoreUpdateRequest, TimeUpdateRequest,
    },
    error::AppError,
    services::{live_state_service, public_service},
    state::SharedState,
};

/// Live scoreboard mutations and live game views.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/active-games/list", get(list_active_games))
        .route("/active-games/{id}/update-score", post(update_score))
        .route("/active-games/{id}/update-time", post(update_time))
        .route("/active-games/{id}/declare-winner", post(declare_winner))
        .route("/active-games/{id}/state", get(get_state))
        .route("/live-games", get(list_live_games))
        .route("/live-games/{id}", get(get_live_game))
}

#[utoipa::path(
    get,
    path = "/active-games/list",
    tag = "live",
    responses((status = 200, description = "Active games with their scoreboards", body = [ActiveGameView]))
)]
pub async fn list_active_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ActiveGameView>>, AppError> {
    Ok(Json(public_service::list_active_games(&state).await?))
}

/// Add a signed delta to a team score. The live state is created on first use.
#[utoipa::path(
    post,
    path = "/active-games/{id}/update-score",
    tag = "live",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    request_body = ScoreUpdateRequest,
    responses(
        (status = 200, description = "Updated live state", body = LiveStateResponse),
        (status = 400, description = "Participant index out of range or not a team game"),
        (status = 404, description = "Unknown scheduled game"),
        (status = 503, description = "Storage unavailable or lock timeout")
    )
)]
pub async fn update_score(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ScoreUpdateRequest>>,
) -> Result<Json<LiveStateResponse>, AppError> {
    let live_state = live_state_service::apply_score_delta(
        &state,
        id,
        payload.participant_index,
        payload.score_change,
    )
    .await?;
    Ok(Json(live_state.into()))
}

/// Record a player time. The live state is created on first use.
#[utoipa::path(
    post,
    path = "/active-games/{id}/update-time",
    tag = "live",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    request_body = TimeUpdateRequest,
    responses(
        (status = 200, description = "Updated live state", body = LiveStateResponse),
        (status = 400, description = "Participant index out of range or not an individual game"),
        (status = 404, description = "Unknown scheduled game"),
        (status = 503, description = "Storage unavailable or lock timeout")
    )
)]
pub async fn update_time(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<TimeUpdateRequest>>,
) -> Result<Json<LiveStateResponse>, AppError> {
    let live_state =
        live_state_service::apply_time_update(&state, id, payload.participant_index, payload.time)
            .await?;
    Ok(Json(live_state.into()))
}

/// Complete a game and deactivate its schedule.
#[utoipa::path(
    post,
    path = "/active-games/{id}/declare-winner",
    tag = "live",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    request_body = DeclareWinnerRequest,
    responses(
        (status = 200, description = "Winner declared", body = DeclareWinnerResponse),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn declare_winner(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DeclareWinnerRequest>>,
) -> Result<Json<DeclareWinnerResponse>, AppError> {
    let winner = live_state_service::declare_winner(
        &state,
        id,
        payload.winner_name,
        payload.winner_score,
        payload.winner_time,
    )
    .await?;
    Ok(Json(DeclareWinnerResponse {
        message: "Winner declared successfully".into(),
        winner: (&winner).into(),
    }))
}

#[utoipa::path(
    get,
    path = "/active-games/{id}/state",
    tag = "live",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses(
        (status = 200, description = "Stored live state", body = LiveStateResponse),
        (status = 404, description = "No live state yet")
    )
)]
pub async fn get_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LiveStateResponse>, AppError> {
    let live_state = live_state_service::get_state(&state, id).await?;
    Ok(Json(live_state.into()))
}

#[utoipa::path(
    get,
    path = "/live-games",
    tag = "live",
    responses((status = 200, description = "Active games for public display", body = [LiveGameView]))
)]
pub async fn list_live_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LiveGameView>>, AppError> {
    Ok(Json(public_service::list_live_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/live-games/{id}",
    tag = "live",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses(
        (status = 200, description = "Active game with registrations", body = LiveGameDetails),
        (status = 404, description = "No active game with this id")
    )
)]
pub async fn get_live_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LiveGameDetails>, AppError> {
    Ok(Json(public_service::get_live_game(&state, id).await?))
}
