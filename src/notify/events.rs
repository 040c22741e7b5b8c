use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::orders::OrderStatus;

/// Name of the real-time event stream carrying order status changes
pub const ORDER_STATUS_EVENT: &str = "order-status-updates";

/// Real-time event emitted after a committed status change
///
/// Addressed to a single account; the connection registry delivering it
/// must not expose it to other accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStatusEvent {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub account_id: i32,
}

/// Publish interface for real-time order events
///
/// Delivery is at-most-once per invocation: no retry, no queuing. A
/// disconnected listener simply misses the event; the order's current
/// status stays queryable from the store.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: OrderStatusEvent);
}

/// Broadcast-channel-backed publisher
///
/// The long-lived connection registry (one subscription per transport,
/// filtered down to the addressed account before delivery) lives outside
/// this service and consumes `subscribe()`.
pub struct BroadcastPublisher {
    tx: broadcast::Sender<OrderStatusEvent>,
}

impl BroadcastPublisher {
    /// Create a publisher with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<OrderStatusEvent> {
        self.tx.subscribe()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: OrderStatusEvent) {
        // send() errors only when nobody is subscribed; that is a missed
        // event, not a failure
        if let Err(err) = self.tx.send(event) {
            tracing::debug!("No listeners for {}: {}", ORDER_STATUS_EVENT, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(account_id: i32) -> OrderStatusEvent {
        OrderStatusEvent {
            order_id: Uuid::new_v4(),
            status: OrderStatus::Preparing,
            account_id,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let publisher = BroadcastPublisher::new(16);
        let mut rx = publisher.subscribe();

        let sent = event(7);
        publisher.publish(sent.clone());

        let received = rx.recv().await.unwrap();
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_noop() {
        let publisher = BroadcastPublisher::new(16);
        // must not panic or block
        publisher.publish(event(1));
    }

    #[tokio::test]
    async fn test_event_serializes_for_transport() {
        let sent = OrderStatusEvent {
            order_id: Uuid::nil(),
            status: OrderStatus::Ready,
            account_id: 3,
        };

        let json = serde_json::to_value(&sent).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["account_id"], 3);
    }
}
