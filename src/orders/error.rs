use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::orders::OrderStatus;

/// Error types for order operations
///
/// Validation and business-rule failures are rejected before (or without)
/// any store mutation; database failures surface to the client as a generic
/// message with the detail kept in the logs.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid cart: {0}")]
    InvalidCart(String),

    #[error("Invalid redemption: {0}")]
    InvalidRedemption(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Insufficient reward points: have {available}, requested {requested}")]
    InsufficientPoints { available: i64, requested: i64 },

    #[error("Insufficient wallet balance")]
    InsufficientFunds,

    #[error("Order not found")]
    NotFound,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            OrderError::InvalidCart(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid_cart", "message": msg }),
            ),
            OrderError::InvalidRedemption(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid_redemption", "message": msg }),
            ),
            OrderError::AccountNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "account_not_found", "message": "Account not found" }),
            ),
            OrderError::InsufficientPoints {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "insufficient_points",
                    "message": format!(
                        "Insufficient reward points: have {}, requested {}",
                        available, requested
                    ),
                }),
            ),
            // balances never leave the service through error bodies
            OrderError::InsufficientFunds => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "insufficient_funds", "message": "Insufficient wallet balance" }),
            ),
            OrderError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "order_not_found", "message": "Order not found" }),
            ),
            // the current status rides along so the caller can resync its view
            OrderError::InvalidTransition { from, to } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid_transition",
                    "message": format!("Invalid status transition from {} to {}", from, to),
                    "current_status": from.as_str(),
                }),
            ),
            OrderError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "error": "forbidden", "message": msg }),
            ),
            OrderError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation_error", "message": msg }),
            ),
            OrderError::Calculation(detail) => {
                tracing::error!("Calculation error in order operation: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal_error", "message": "An internal error occurred" }),
                )
            }
            OrderError::DatabaseError(detail) => {
                tracing::error!("Database error in order operation: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal_error", "message": "An internal error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = OrderError::InvalidCart("cart is empty".to_string());
        assert_eq!(error.to_string(), "Invalid cart: cart is empty");

        let error = OrderError::InsufficientPoints {
            available: 10,
            requested: 50,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient reward points: have 10, requested 50"
        );

        let error = OrderError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Pending,
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition from ready to pending"
        );
    }

    #[test]
    fn test_insufficient_funds_message_carries_no_amounts() {
        let error = OrderError::InsufficientFunds;
        assert!(!error.to_string().chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_error_from_sqlx() {
        let sqlx_error = sqlx::Error::RowNotFound;
        let order_error: OrderError = sqlx_error.into();
        assert!(matches!(order_error, OrderError::DatabaseError(_)));
    }
}
