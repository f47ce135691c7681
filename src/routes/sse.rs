use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/live",
    tag = "sse",
    responses((status = 200, description = "Live scoreboard SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream live scoreboard updates, winner declarations and degraded mode changes.
pub async fn live_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_live(&state);
    info!(
        subscribers = state.live_sse().subscriber_count(),
        "New live SSE connection"
    );
    sse_service::to_sse_stream(sse_service::live_handshake(&state), receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/live", get(live_stream))
}
