use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod live;
pub mod registration;
pub mod results;
pub mod schedule;
pub mod sse;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Plain acknowledgement returned by deletions.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Human readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Build a response from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
