use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::accounts::WalletSnapshot;

/// Order status enum representing the lifecycle of an order
///
/// `Ready` is the canonical terminal-success status; "completed" is accepted
/// as a parse alias for callers that still use the old name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    #[serde(alias = "completed")]
    Ready,
    Cancelled,
}

impl OrderStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse status from string (case-insensitive, accepts the
    /// "completed" alias for ready)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" | "completed" => Ok(OrderStatus::Ready),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing an order in the database
///
/// Status is the only field mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub account_id: i32,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub points_redeemed: i64,
    pub points_earned: i64,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line joined with the current menu-item display name
///
/// The name is resolved at read time; a renamed menu item changes how old
/// orders display, while the frozen price does not move.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLineView {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Request DTO for one cart line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Request DTO for creating a new order
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderLineRequest>,
    /// Reward points to redeem against this order
    #[serde(default)]
    pub redeem_points: i64,
}

/// Request DTO for updating order status
///
/// The status arrives as a free-form string and is compared
/// case-insensitively against the enum.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Response DTO for an order with its lines
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub account_id: i32,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineView>,
    pub subtotal: Decimal,
    pub points_redeemed: i64,
    pub points_earned: i64,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for order creation
///
/// Echoes the priced lines and carries the account's post-settlement
/// wallet snapshot.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineView>,
    pub subtotal: Decimal,
    pub points_redeemed: i64,
    pub points_earned: i64,
    pub total: Decimal,
    pub wallet: WalletSnapshot,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Cancelled,
        ] {
            let parsed = OrderStatus::from_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            OrderStatus::from_str("Preparing").unwrap(),
            OrderStatus::Preparing
        );
        assert_eq!(OrderStatus::from_str("READY").unwrap(), OrderStatus::Ready);
    }

    #[test]
    fn test_completed_is_alias_for_ready() {
        assert_eq!(
            OrderStatus::from_str("completed").unwrap(),
            OrderStatus::Ready
        );
        assert_eq!(
            OrderStatus::from_str("Completed").unwrap(),
            OrderStatus::Ready
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(OrderStatus::from_str("confirmed").is_err());
        assert!(OrderStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_serde_alias() {
        let status: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, OrderStatus::Ready);
        // canonical name is what we serialize
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ready\"");
    }

    #[test]
    fn test_create_order_request_defaults_redeem_to_zero() {
        let json = r#"{"items": [{"menu_item_id": 1, "quantity": 2}]}"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.redeem_points, 0);
        assert_eq!(request.items.len(), 1);
    }
}
