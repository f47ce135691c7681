use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Pongal Games Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::live_stream,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::create_game,
        crate::routes::games::update_game,
        crate::routes::games::delete_game,
        crate::routes::games::list_games_by_category,
        crate::routes::schedules::list_scheduled_games,
        crate::routes::schedules::list_active_games,
        crate::routes::schedules::list_open_registration_games,
        crate::routes::schedules::get_scheduled_game,
        crate::routes::schedules::create_scheduled_game,
        crate::routes::schedules::update_scheduled_game,
        crate::routes::schedules::toggle_activation,
        crate::routes::schedules::toggle_registration,
        crate::routes::schedules::delete_scheduled_game,
        crate::routes::schedules::create_league_match,
        crate::routes::schedules::list_league_matches,
        crate::routes::schedules::list_matches_by_stage,
        crate::routes::schedules::create_next_stage,
        crate::routes::schedules::list_teams_for_game,
        crate::routes::registrations::list_team_registrations,
        crate::routes::registrations::create_team_registration,
        crate::routes::registrations::delete_team_registration,
        crate::routes::registrations::add_player,
        crate::routes::registrations::edit_player,
        crate::routes::registrations::delete_player,
        crate::routes::registrations::list_individual_registrations,
        crate::routes::registrations::create_individual_registration,
        crate::routes::registrations::delete_individual_registration,
        crate::routes::live::list_active_games,
        crate::routes::live::update_score,
        crate::routes::live::update_time,
        crate::routes::live::declare_winner,
        crate::routes::live::get_state,
        crate::routes::live::list_live_games,
        crate::routes::live::get_live_game,
        crate::routes::results::list_results,
        crate::routes::results::list_results_by_category,
        crate::routes::results::get_result,
        crate::routes::results::results_stats,
        crate::routes::dashboard::overview,
        crate::routes::dashboard::active_games,
        crate::routes::dashboard::pending_games,
        crate::routes::dashboard::game_stats,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::MessageResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::LiveStateCompletedEvent,
            crate::dto::live::ParticipantScore,
            crate::dto::live::CurrentScores,
            crate::dto::live::WinnerSummary,
            crate::dto::live::RegistrationDetail,
            crate::dto::results::ResultRanking,
            crate::services::aggregation::ResultsStats,
            crate::services::ranking::TeamRanking,
            crate::services::ranking::TeamPlacing,
            crate::services::ranking::TeamStanding,
            crate::services::ranking::PodiumEntry,
            crate::services::ranking::Medal,
            crate::dao::models::GameType,
            crate::dao::models::LiveStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "games", description = "Game catalog"),
        (name = "scheduled-games", description = "Scheduled game instances"),
        (name = "league", description = "League matches between registered teams"),
        (name = "registrations", description = "Team and individual registrations"),
        (name = "live", description = "Live scoreboards"),
        (name = "results", description = "Completed games and rankings"),
        (name = "dashboard", description = "Organiser dashboard"),
    )
)]
pub struct ApiDoc;
