use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dto::sse::{LiveStateCompletedEvent, LiveStateUpdatedEvent, ServerEvent, SystemStatus},
    state::{
        SharedState,
        live_state::{LiveState, Winner},
    },
};

const EVENT_LIVE_STATE_UPDATED: &str = "live_state.updated";
const EVENT_LIVE_STATE_COMPLETED: &str = "live_state.completed";
const EVENT_SYSTEM_STATUS: &str = "system_status";

/// Broadcast the scoreboard of a game after a score or time mutation.
pub fn broadcast_live_state_updated(state: &SharedState, live_state: &LiveState) {
    let payload = LiveStateUpdatedEvent(live_state.into());
    send_live_event(state, EVENT_LIVE_STATE_UPDATED, &payload);
}

/// Broadcast the winner of a game that has just been completed.
pub fn broadcast_live_state_completed(
    state: &SharedState,
    scheduled_game_id: Uuid,
    winner: &Winner,
) {
    let payload = LiveStateCompletedEvent {
        scheduled_game_id,
        winner: winner.into(),
    };
    send_live_event(state, EVENT_LIVE_STATE_COMPLETED, &payload);
}

/// Broadcast whether the backend is running without storage.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_live_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_live_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(message) => {
            let reached = state.live_sse().publish(message);
            debug!(event, reached, "live event published");
        }
        Err(err) => warn!(event, error = %err, "failed to serialize live SSE payload"),
    }
}
