// HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedAccount;
use crate::orders::{
    CreateOrderRequest, CreateOrderResponse, OrderError, OrderResponse, OrderStatus,
    UpdateStatusRequest,
};

/// Handler for POST /api/orders
/// Creates and settles a new order for the authenticated account
pub async fn create_order_handler(
    State(state): State<crate::AppState>,
    account: AuthenticatedAccount,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    let response = state
        .order_service
        .create_order(account.account_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /api/orders
/// Returns order history for the authenticated account, most recent first;
/// staff callers see all orders
pub async fn get_order_history_handler(
    State(state): State<crate::AppState>,
    account: AuthenticatedAccount,
) -> Result<Json<Vec<OrderResponse>>, OrderError> {
    let orders = if account.is_staff() {
        state.order_service.history_all().await?
    } else {
        state
            .order_service
            .history_for_account(account.account_id)
            .await?
    };

    Ok(Json(orders))
}

/// Handler for GET /api/orders/{order_id}
/// Retrieves a specific order (owner or staff)
pub async fn get_order_by_id_handler(
    State(state): State<crate::AppState>,
    account: AuthenticatedAccount,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state
        .order_service
        .get_order(order_id, account.account_id, account.is_staff())
        .await?;

    Ok(Json(order))
}

/// Handler for PATCH /api/orders/{order_id}/status
/// Applies a status transition (staff only)
///
/// The target status string is matched case-insensitively; "completed" is
/// accepted as an alias of "ready".
pub async fn update_order_status_handler(
    State(state): State<crate::AppState>,
    account: AuthenticatedAccount,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, OrderError> {
    if !account.is_staff() {
        return Err(OrderError::Forbidden(
            "Only staff may update order status".to_string(),
        ));
    }

    let target = OrderStatus::from_str(&request.status).map_err(OrderError::ValidationError)?;

    let order = state.order_service.update_status(order_id, target).await?;

    Ok(Json(order))
}
