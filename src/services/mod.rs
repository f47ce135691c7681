/// Reduction of completed results into statistics.
pub mod aggregation;
/// Game catalog management.
pub mod catalog_service;
/// Dashboard counters and score lines.
pub mod dashboard_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Live scoreboard lifecycle.
pub mod live_state_service;
/// Read-only views of the games being played.
pub mod public_service;
/// Ordering of scoreboards into podiums and standings.
pub mod ranking;
/// Team and individual registrations.
pub mod registration_service;
/// Completed results and their rankings.
pub mod results_service;
/// Scheduled games and league matches.
pub mod schedule_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervisor with reconnect backoff.
pub mod storage_supervisor;
