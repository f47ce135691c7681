use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        MessageResponse,
        catalog::{GameInput, GameSummary},
    },
    error::AppError,
    services::catalog_service,
    state::SharedState,
};

/// Game catalog endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route(
            "/dashboard/games-by-category/{category}",
            get(list_games_by_category),
        )
}

#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses((status = 200, description = "Catalog games", body = [GameSummary]))
)]
pub async fn list_games(State(state): State<SharedState>) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(catalog_service::list_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Catalog game", body = GameSummary),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(catalog_service::get_game(&state, id).await?))
}

/// Add a game to the catalog.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = GameInput,
    responses((status = 200, description = "Game created", body = GameSummary))
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<GameInput>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(catalog_service::create_game(&state, payload).await?))
}

/// Replace the editable fields of a game.
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    request_body = GameInput,
    responses(
        (status = 200, description = "Game updated", body = GameSummary),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<GameInput>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(catalog_service::update_game(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game deleted", body = MessageResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    catalog_service::delete_game(&state, id).await?;
    Ok(Json(MessageResponse::new("Game deleted successfully")))
}

/// Games of one category, `all` for every game.
#[utoipa::path(
    get,
    path = "/dashboard/games-by-category/{category}",
    tag = "dashboard",
    params(("category" = String, Path, description = "Category name or `all`")),
    responses((status = 200, description = "Catalog games of the category", body = [GameSummary]))
)]
pub async fn list_games_by_category(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(
        catalog_service::list_games_by_category(&state, &category).await?,
    ))
}
