use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Well-known event names.
pub mod names {
    pub const OUTFIT_CREATED: &str = "outfit.created";
    pub const OUTFIT_UPDATED: &str = "outfit.updated";
    pub const OUTFIT_DELETED: &str = "outfit.deleted";
    pub const TRY_ON_CREATED: &str = "virtual_try_on.created";
    pub const TRY_ON_UPDATED: &str = "virtual_try_on.updated";
}

/// A fire-and-forget domain event. Nothing in the request path waits on
/// consumers; losing an event is acceptable, losing a write is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated name, e.g. `outfit.created`.
    pub name: String,
    pub entity_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub payload: serde_json::Value,
    pub occurred_at: NaiveDateTime,
}

impl DomainEvent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entity_id: None,
            customer_id: None,
            payload: serde_json::json!({}),
            occurred_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn customer(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

const CHANNEL_CAPACITY: usize = 256;

/// In-process publish/subscribe hub over a broadcast channel. Publishing
/// with no subscribers drops the event silently.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: DomainEvent) {
        // A send error only means nobody is listening.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Log every published event; installed at startup so the bus always has
/// at least one consumer in a running server.
pub fn spawn_logger(bus: &EventBus) {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::debug!(
                        name = %event.name,
                        entity_id = ?event.entity_id,
                        "domain event"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("event logger lagged, {} event(s) dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let outfit_id = Uuid::new_v4();
        bus.publish(
            DomainEvent::new(names::OUTFIT_CREATED)
                .entity(outfit_id)
                .payload(serde_json::json!({"product_count": 3})),
        );

        let received = first.recv().await.unwrap();
        assert_eq!(received.name, names::OUTFIT_CREATED);
        assert_eq!(received.entity_id, Some(outfit_id));
        assert_eq!(received.payload["product_count"], 3);

        assert_eq!(second.recv().await.unwrap().name, names::OUTFIT_CREATED);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(DomainEvent::new(names::TRY_ON_UPDATED));
    }
}
