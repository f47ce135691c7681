use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Fan-out of live scoreboard events to every connected SSE client.
///
/// Slow clients lag behind rather than blocking publishers; see
/// [`broadcast::Receiver::recv`] for how lagging is reported.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Publish an event and return how many clients it reached.
    ///
    /// Having no client connected is not an error.
    pub fn publish(&self, event: ServerEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of connected clients.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_clients_reaches_nobody() {
        let hub = SseHub::new(4);
        assert_eq!(hub.publish(ServerEvent::new(None, "x".into())), 0);
    }

    #[tokio::test]
    async fn every_client_receives_published_events() {
        let hub = SseHub::new(4);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        let reached = hub.publish(ServerEvent::new(Some("ping".into()), "{}".into()));
        assert_eq!(reached, 2);
        assert_eq!(first.recv().await.unwrap().event.as_deref(), Some("ping"));
        assert_eq!(second.recv().await.unwrap().data, "{}");
    }
}
