use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SharedState;

pub mod dashboard;
pub mod docs;
pub mod games;
pub mod health;
pub mod live;
pub mod registrations;
pub mod results;
pub mod schedules;
pub mod sse;

/// Compose all route trees, wiring in shared state, documentation routes and
/// the cross-cutting middleware layers.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(games::router())
        .merge(schedules::router())
        .merge(registrations::router())
        .merge(live::router())
        .merge(results::router())
        .merge(dashboard::router())
        .merge(docs::router());

    api_router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
