use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::GameEntity,
    dto::catalog::{GameInput, GameSummary},
    error::ServiceError,
    state::SharedState,
};

/// Category name matching every game.
pub const ALL_CATEGORIES: &str = "all";

fn game_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}

pub async fn list_games(state: &SharedState) -> Result<Vec<GameSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    Ok(store.list_games().await?.into_iter().map(Into::into).collect())
}

/// Games of one category, or every game for [`ALL_CATEGORIES`].
pub async fn list_games_by_category(
    state: &SharedState,
    category: &str,
) -> Result<Vec<GameSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    Ok(store
        .list_games()
        .await?
        .into_iter()
        .filter(|game| category == ALL_CATEGORIES || game.category == category)
        .map(Into::into)
        .collect())
}

pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    store
        .find_game(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| game_not_found(id))
}

pub async fn create_game(state: &SharedState, input: GameInput) -> Result<GameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let game = GameEntity {
        id: Uuid::new_v4(),
        icon: input.icon,
        tamil: input.tamil,
        english: input.english,
        category: input.category,
        created_at: SystemTime::now(),
    };
    store.save_game(game.clone()).await?;
    info!(game_id = %game.id, english = %game.english, "game created");
    Ok(game.into())
}

/// Replace the editable fields of a game, keeping its id and creation time.
pub async fn update_game(
    state: &SharedState,
    id: Uuid,
    input: GameInput,
) -> Result<GameSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let mut game = store.find_game(id).await?.ok_or_else(|| game_not_found(id))?;
    game.icon = input.icon;
    game.tamil = input.tamil;
    game.english = input.english;
    game.category = input.category;
    store.save_game(game.clone()).await?;
    info!(game_id = %id, "game updated");
    Ok(game.into())
}

/// Delete a catalog game. Its scheduled instances are left in place.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    if !store.delete_game(id).await? {
        return Err(game_not_found(id));
    }
    info!(game_id = %id, "game deleted");
    Ok(())
}
