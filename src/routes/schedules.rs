use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        MessageResponse,
        registration::TeamRegistrationSummary,
        schedule::{
            ActivationResponse, CreateLeagueMatchRequest, CreateScheduledGameRequest,
            LeagueMatchSummary, NextStageQuery, RegistrationToggleResponse, ScheduledGameSummary,
            UpdateScheduledGameRequest,
        },
    },
    error::AppError,
    services::schedule_service,
    state::SharedState,
};

/// Scheduled games and league match endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/scheduled-games",
            get(list_scheduled_games).post(create_scheduled_game),
        )
        .route("/scheduled-games/active", get(list_active_games))
        .route(
            "/scheduled-games/open-registration",
            get(list_open_registration_games),
        )
        .route(
            "/scheduled-games/{id}",
            get(get_scheduled_game)
                .patch(update_scheduled_game)
                .delete(delete_scheduled_game),
        )
        .route("/scheduled-games/{id}/activate", patch(toggle_activation))
        .route(
            "/scheduled-games/{id}/registration",
            patch(toggle_registration),
        )
        .route("/scheduled-games/league", post(create_league_match))
        .route("/scheduled-games/league/{id}", get(list_league_matches))
        .route(
            "/scheduled-games/league/{id}/next-stage",
            post(create_next_stage),
        )
        .route(
            "/scheduled-games/league/stage/{stage}",
            get(list_matches_by_stage),
        )
        .route("/team-registrations/all/{game_id}", get(list_teams_for_game))
}

#[utoipa::path(
    get,
    path = "/scheduled-games",
    tag = "scheduled-games",
    responses((status = 200, description = "Every scheduled game", body = [ScheduledGameSummary]))
)]
pub async fn list_scheduled_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ScheduledGameSummary>>, AppError> {
    Ok(Json(schedule_service::list_scheduled_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/scheduled-games/active",
    tag = "scheduled-games",
    responses((status = 200, description = "Scheduled games being played", body = [ScheduledGameSummary]))
)]
pub async fn list_active_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ScheduledGameSummary>>, AppError> {
    Ok(Json(schedule_service::list_active_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/scheduled-games/open-registration",
    tag = "scheduled-games",
    responses((status = 200, description = "Scheduled games accepting registrations", body = [ScheduledGameSummary]))
)]
pub async fn list_open_registration_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ScheduledGameSummary>>, AppError> {
    Ok(Json(
        schedule_service::list_open_registration_games(&state).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/scheduled-games/{id}",
    tag = "scheduled-games",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses(
        (status = 200, description = "Scheduled game", body = ScheduledGameSummary),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn get_scheduled_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduledGameSummary>, AppError> {
    Ok(Json(schedule_service::get_scheduled_game(&state, id).await?))
}

/// Schedule a catalog game. It starts inactive with registration open.
#[utoipa::path(
    post,
    path = "/scheduled-games",
    tag = "scheduled-games",
    request_body = CreateScheduledGameRequest,
    responses(
        (status = 200, description = "Game scheduled", body = ScheduledGameSummary),
        (status = 404, description = "Unknown catalog game")
    )
)]
pub async fn create_scheduled_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateScheduledGameRequest>>,
) -> Result<Json<ScheduledGameSummary>, AppError> {
    Ok(Json(
        schedule_service::create_scheduled_game(&state, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/scheduled-games/{id}",
    tag = "scheduled-games",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    request_body = UpdateScheduledGameRequest,
    responses(
        (status = 200, description = "Scheduled game updated", body = ScheduledGameSummary),
        (status = 400, description = "No field to update"),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn update_scheduled_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdateScheduledGameRequest>>,
) -> Result<Json<ScheduledGameSummary>, AppError> {
    Ok(Json(
        schedule_service::update_scheduled_game(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/scheduled-games/{id}/activate",
    tag = "scheduled-games",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses((status = 200, description = "Activation toggled", body = ActivationResponse))
)]
pub async fn toggle_activation(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivationResponse>, AppError> {
    Ok(Json(schedule_service::toggle_activation(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/scheduled-games/{id}/registration",
    tag = "scheduled-games",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses((status = 200, description = "Registration toggled", body = RegistrationToggleResponse))
)]
pub async fn toggle_registration(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationToggleResponse>, AppError> {
    Ok(Json(schedule_service::toggle_registration(&state, id).await?))
}

/// Delete a scheduled game. Its registrations and live state are kept.
#[utoipa::path(
    delete,
    path = "/scheduled-games/{id}",
    tag = "scheduled-games",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses(
        (status = 200, description = "Scheduled game deleted", body = MessageResponse),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn delete_scheduled_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    schedule_service::delete_scheduled_game(&state, id).await?;
    Ok(Json(MessageResponse::new(
        "Scheduled game deleted successfully",
    )))
}

/// Schedule a league match between two registered teams.
#[utoipa::path(
    post,
    path = "/scheduled-games/league",
    tag = "league",
    request_body = CreateLeagueMatchRequest,
    responses(
        (status = 200, description = "League match scheduled", body = ScheduledGameSummary),
        (status = 404, description = "Unknown game or team")
    )
)]
pub async fn create_league_match(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateLeagueMatchRequest>>,
) -> Result<Json<ScheduledGameSummary>, AppError> {
    Ok(Json(
        schedule_service::create_league_match(&state, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/scheduled-games/league/{id}",
    tag = "league",
    params(("id" = Uuid, Path, description = "Identifier of the catalog game")),
    responses((status = 200, description = "League matches by date and time", body = [LeagueMatchSummary]))
)]
pub async fn list_league_matches(
    State(state): State<SharedState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Vec<LeagueMatchSummary>>, AppError> {
    Ok(Json(
        schedule_service::list_league_matches(&state, game_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/scheduled-games/league/stage/{stage}",
    tag = "league",
    params(("stage" = String, Path, description = "League stage label")),
    responses((status = 200, description = "Matches of the stage by date and time", body = [LeagueMatchSummary]))
)]
pub async fn list_matches_by_stage(
    State(state): State<SharedState>,
    Path(stage): Path<String>,
) -> Result<Json<Vec<LeagueMatchSummary>>, AppError> {
    Ok(Json(
        schedule_service::list_matches_by_stage(&state, &stage).await?,
    ))
}

/// Schedule the match following a league game.
#[utoipa::path(
    post,
    path = "/scheduled-games/league/{id}/next-stage",
    tag = "league",
    params(
        ("id" = Uuid, Path, description = "Identifier of the parent match"),
        NextStageQuery
    ),
    responses(
        (status = 200, description = "Next stage scheduled", body = ScheduledGameSummary),
        (status = 404, description = "Unknown parent match or team")
    )
)]
pub async fn create_next_stage(
    State(state): State<SharedState>,
    Path(parent_id): Path<Uuid>,
    Valid(Query(query)): Valid<Query<NextStageQuery>>,
) -> Result<Json<ScheduledGameSummary>, AppError> {
    Ok(Json(
        schedule_service::create_next_stage(&state, parent_id, query).await?,
    ))
}

/// Teams registered on every non-league instance of a catalog game.
#[utoipa::path(
    get,
    path = "/team-registrations/all/{game_id}",
    tag = "league",
    params(("game_id" = Uuid, Path, description = "Identifier of the catalog game")),
    responses((status = 200, description = "Teams deduplicated by name", body = [TeamRegistrationSummary]))
)]
pub async fn list_teams_for_game(
    State(state): State<SharedState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Vec<TeamRegistrationSummary>>, AppError> {
    Ok(Json(
        schedule_service::list_teams_for_game(&state, game_id).await?,
    ))
}
