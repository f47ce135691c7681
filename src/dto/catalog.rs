use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{format_system_time, validation::validate_not_blank};
use crate::dao::models::GameEntity;

/// Payload used to create or replace a catalog game.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GameInput {
    /// Icon shown next to the game name.
    #[validate(custom(function = "validate_not_blank"))]
    pub icon: String,
    /// Display name in Tamil.
    #[validate(custom(function = "validate_not_blank"))]
    pub tamil: String,
    /// Display name in English.
    #[validate(custom(function = "validate_not_blank"))]
    pub english: String,
    /// Category used for grouping.
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
}

/// Catalog game as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    pub id: Uuid,
    pub icon: String,
    pub tamil: String,
    pub english: String,
    pub category: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<GameEntity> for GameSummary {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            icon: value.icon,
            tamil: value.tamil,
            english: value.english,
            category: value.category,
            created_at: format_system_time(value.created_at),
        }
    }
}
