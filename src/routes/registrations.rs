use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        MessageResponse,
        registration::{
            CreateIndividualRegistrationRequest, CreateTeamRegistrationRequest,
            IndividualRegistrationSummary, PlayerDeletedResponse, PlayerRequest,
            TeamRegistrationSummary,
        },
    },
    error::AppError,
    services::registration_service,
    state::SharedState,
};

/// Team and individual registration endpoints.
///
/// `/team-registrations/{id}` lists the teams of a scheduled game on `GET` and
/// deletes one registration on `DELETE`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/team-registrations", post(create_team_registration))
        .route(
            "/team-registrations/{id}",
            get(list_team_registrations).delete(delete_team_registration),
        )
        .route("/team-registrations/{id}/add-player", post(add_player))
        .route(
            "/team-registrations/{id}/edit-player/{index}",
            patch(edit_player),
        )
        .route(
            "/team-registrations/{id}/delete-player/{index}",
            delete(delete_player),
        )
        .route(
            "/individual-registrations",
            post(create_individual_registration),
        )
        .route(
            "/individual-registrations/{id}",
            get(list_individual_registrations).delete(delete_individual_registration),
        )
}

#[utoipa::path(
    get,
    path = "/team-registrations/{id}",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses((status = 200, description = "Teams in registration order", body = [TeamRegistrationSummary]))
)]
pub async fn list_team_registrations(
    State(state): State<SharedState>,
    Path(scheduled_game_id): Path<Uuid>,
) -> Result<Json<Vec<TeamRegistrationSummary>>, AppError> {
    Ok(Json(
        registration_service::list_team_registrations(&state, scheduled_game_id).await?,
    ))
}

/// Register a team on a scheduled game open for registration.
#[utoipa::path(
    post,
    path = "/team-registrations",
    tag = "registrations",
    request_body = CreateTeamRegistrationRequest,
    responses(
        (status = 200, description = "Team registered", body = TeamRegistrationSummary),
        (status = 400, description = "Registration refused"),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn create_team_registration(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateTeamRegistrationRequest>>,
) -> Result<Json<TeamRegistrationSummary>, AppError> {
    Ok(Json(
        registration_service::create_team_registration(&state, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/team-registrations/{id}",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Identifier of the team registration")),
    responses(
        (status = 200, description = "Registration deleted", body = MessageResponse),
        (status = 404, description = "Unknown registration")
    )
)]
pub async fn delete_team_registration(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    registration_service::delete_team_registration(&state, id).await?;
    Ok(Json(MessageResponse::new(
        "Team registration deleted successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/team-registrations/{id}/add-player",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Identifier of the team registration")),
    request_body = PlayerRequest,
    responses(
        (status = 200, description = "Player added", body = TeamRegistrationSummary),
        (status = 400, description = "Duplicate player or team full")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PlayerRequest>>,
) -> Result<Json<TeamRegistrationSummary>, AppError> {
    Ok(Json(
        registration_service::add_player(&state, id, payload.player_name).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/team-registrations/{id}/edit-player/{index}",
    tag = "registrations",
    params(
        ("id" = Uuid, Path, description = "Identifier of the team registration"),
        ("index" = i64, Path, description = "Position of the player in the team")
    ),
    request_body = PlayerRequest,
    responses(
        (status = 200, description = "Player renamed", body = TeamRegistrationSummary),
        (status = 400, description = "Invalid index or duplicate name")
    )
)]
pub async fn edit_player(
    State(state): State<SharedState>,
    Path((id, index)): Path<(Uuid, i64)>,
    Valid(Json(payload)): Valid<Json<PlayerRequest>>,
) -> Result<Json<TeamRegistrationSummary>, AppError> {
    Ok(Json(
        registration_service::edit_player(&state, id, index, payload.player_name).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/team-registrations/{id}/delete-player/{index}",
    tag = "registrations",
    params(
        ("id" = Uuid, Path, description = "Identifier of the team registration"),
        ("index" = i64, Path, description = "Position of the player in the team")
    ),
    responses(
        (status = 200, description = "Player removed", body = PlayerDeletedResponse),
        (status = 400, description = "Invalid index or last player")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path((id, index)): Path<(Uuid, i64)>,
) -> Result<Json<PlayerDeletedResponse>, AppError> {
    let team = registration_service::delete_player(&state, id, index).await?;
    Ok(Json(PlayerDeletedResponse {
        message: "Player deleted successfully".into(),
        team,
    }))
}

#[utoipa::path(
    get,
    path = "/individual-registrations/{id}",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Identifier of the scheduled game")),
    responses((status = 200, description = "Players in registration order", body = [IndividualRegistrationSummary]))
)]
pub async fn list_individual_registrations(
    State(state): State<SharedState>,
    Path(scheduled_game_id): Path<Uuid>,
) -> Result<Json<Vec<IndividualRegistrationSummary>>, AppError> {
    Ok(Json(
        registration_service::list_individual_registrations(&state, scheduled_game_id).await?,
    ))
}

/// Register a player on a scheduled game open for registration.
#[utoipa::path(
    post,
    path = "/individual-registrations",
    tag = "registrations",
    request_body = CreateIndividualRegistrationRequest,
    responses(
        (status = 200, description = "Player registered", body = IndividualRegistrationSummary),
        (status = 400, description = "Registration refused"),
        (status = 404, description = "Unknown scheduled game")
    )
)]
pub async fn create_individual_registration(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateIndividualRegistrationRequest>>,
) -> Result<Json<IndividualRegistrationSummary>, AppError> {
    Ok(Json(
        registration_service::create_individual_registration(&state, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/individual-registrations/{id}",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Identifier of the individual registration")),
    responses(
        (status = 200, description = "Registration deleted", body = MessageResponse),
        (status = 404, description = "Unknown registration")
    )
)]
pub async fn delete_individual_registration(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    registration_service::delete_individual_registration(&state, id).await?;
    Ok(Json(MessageResponse::new(
        "Individual registration deleted successfully",
    )))
}
