use axum::async_trait;
use uuid::Uuid;

use crate::orders::OrderStatus;

/// Errors surfaced by an SMS gateway
///
/// Never propagated past the notification boundary; callers log and move on.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS dispatch failed: {0}")]
    Dispatch(String),
}

/// External SMS collaborator
///
/// The real provider integration lives outside this service; anything that
/// can deliver a message body to a phone number satisfies this.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SmsError>;
}

/// Gateway stub for local development: logs the message instead of
/// calling a provider
pub struct LogSmsGateway;

#[async_trait]
impl SmsGateway for LogSmsGateway {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SmsError> {
        tracing::info!("SMS to {}: {}", phone, body);
        Ok(())
    }
}

/// Build the customer-facing message body for a status change
pub fn status_message(order_id: Uuid, status: OrderStatus) -> String {
    match status {
        OrderStatus::Pending => format!(
            "We've received your order {} and will start on it shortly.",
            order_id
        ),
        OrderStatus::Preparing => {
            format!("Your order {} is being prepared.", order_id)
        }
        OrderStatus::Ready => format!(
            "Your order {} is ready for pickup. See you soon!",
            order_id
        ),
        OrderStatus::Cancelled => {
            format!("Your order {} has been cancelled.", order_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_status_has_distinct_copy() {
        let order_id = Uuid::new_v4();
        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Cancelled,
        ];

        let messages: Vec<String> = statuses
            .iter()
            .map(|s| status_message(order_id, *s))
            .collect();

        for (i, a) in messages.iter().enumerate() {
            assert!(a.contains(&order_id.to_string()));
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn test_log_gateway_accepts_messages() {
        let gateway = LogSmsGateway;
        let result = gateway.send("+15550100", "test body").await;
        assert!(result.is_ok());
    }
}
