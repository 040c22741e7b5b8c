use uuid::Uuid;

use crate::accounts::WalletSnapshot;
use crate::notify::Notifier;
use crate::orders::{
    CatalogRepository, CatalogSnapshot, CreateOrderRequest, CreateOrderResponse, Order,
    OrderError, OrderLineView, OrderResponse, OrderStatus, OrdersRepository, PricingEngine,
};

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    catalog_repo: CatalogRepository,
    orders_repo: OrdersRepository,
    pricing: PricingEngine,
    notifier: Notifier,
}

impl OrderService {
    /// Create a new OrderService
    pub fn new(
        catalog_repo: CatalogRepository,
        orders_repo: OrdersRepository,
        pricing: PricingEngine,
        notifier: Notifier,
    ) -> Self {
        Self {
            catalog_repo,
            orders_repo,
            pricing,
            notifier,
        }
    }

    /// Create and settle a new order
    ///
    /// Prices the cart against a snapshot of the current catalog, then
    /// settles atomically: wallet debit, point redemption/award and the
    /// order write commit as one unit or not at all. Line prices are frozen
    /// from the snapshot regardless of later catalog changes.
    pub async fn create_order(
        &self,
        account_id: i32,
        request: CreateOrderRequest,
    ) -> Result<CreateOrderResponse, OrderError> {
        // Cheap request-shape checks before touching the store; the pricing
        // engine re-validates the full contract against the snapshot.
        if request.items.is_empty() {
            return Err(OrderError::InvalidCart("cart is empty".to_string()));
        }

        let ids: Vec<i32> = request
            .items
            .iter()
            .map(|item| {
                if item.quantity <= 0 {
                    return Err(OrderError::InvalidCart(format!(
                        "quantity must be positive for menu item {}, got {}",
                        item.menu_item_id, item.quantity
                    )));
                }
                Ok(item.menu_item_id)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if request.redeem_points < 0 {
            return Err(OrderError::InvalidRedemption(
                "redeem count must be non-negative".to_string(),
            ));
        }

        let cap = self.pricing.config().max_redeem_per_order;
        if request.redeem_points > cap {
            return Err(OrderError::InvalidRedemption(format!(
                "cannot redeem more than {} points per order",
                cap
            )));
        }

        let snapshot: CatalogSnapshot = self
            .catalog_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|item| {
                (
                    item.id,
                    crate::orders::CatalogEntry {
                        name: item.name,
                        price: item.price,
                        available: item.available,
                    },
                )
            })
            .collect();

        let quote = self
            .pricing
            .quote(&request.items, &snapshot, request.redeem_points)?;

        let (order, account) = self.orders_repo.create_settled(account_id, &quote).await?;

        tracing::info!(
            "Created order {} for account {} ({} lines)",
            order.id,
            account_id,
            quote.lines.len()
        );

        let lines = quote
            .lines
            .into_iter()
            .map(|line| OrderLineView {
                menu_item_id: line.menu_item_id,
                name: line.name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            })
            .collect();

        Ok(CreateOrderResponse {
            id: order.id,
            status: order.status,
            lines,
            subtotal: order.subtotal,
            points_redeemed: order.points_redeemed,
            points_earned: order.points_earned,
            total: order.total,
            wallet: WalletSnapshot::from(&account),
            created_at: order.created_at,
        })
    }

    /// Get order history for one account, most recent first
    pub async fn history_for_account(
        &self,
        account_id: i32,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.orders_repo.find_by_account_id(account_id).await?;
        self.build_responses(orders).await
    }

    /// Get the full order history across accounts (staff view)
    pub async fn history_all(&self) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.orders_repo.find_all().await?;
        self.build_responses(orders).await
    }

    /// Get a specific order by ID
    ///
    /// Non-staff callers may only read their own orders.
    pub async fn get_order(
        &self,
        order_id: Uuid,
        account_id: i32,
        is_staff: bool,
    ) -> Result<OrderResponse, OrderError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !is_staff && order.account_id != account_id {
            return Err(OrderError::Forbidden(
                "You do not have permission to access this order".to_string(),
            ));
        }

        self.build_response(order).await
    }

    /// Apply a status transition and fan the change out
    ///
    /// The transition is validated and persisted under a row lock; the
    /// notification runs after the commit and its failure never rolls the
    /// transition back.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        target: OrderStatus,
    ) -> Result<OrderResponse, OrderError> {
        let order = self.orders_repo.transition_status(order_id, target).await?;

        tracing::info!("Order {} moved to {}", order.id, order.status);

        self.notifier
            .order_status_changed(order.account_id, order.id, order.status)
            .await;

        self.build_response(order).await
    }

    async fn build_response(&self, order: Order) -> Result<OrderResponse, OrderError> {
        let lines = self.orders_repo.lines_for_order(order.id).await?;

        Ok(OrderResponse {
            id: order.id,
            account_id: order.account_id,
            status: order.status,
            lines,
            subtotal: order.subtotal,
            points_redeemed: order.points_redeemed,
            points_earned: order.points_earned,
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    async fn build_responses(
        &self,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.build_response(order).await?);
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod integration_notes {
    // The settlement and lifecycle properties need a live database and
    // belong to the integration suite. Procedures:
    //
    // Atomic settlement:
    // 1. Seed an account with balance B and points P.
    // 2. Fire N concurrent create_order calls for the same account.
    // 3. For the successful subset, assert
    //    final_balance == B - sum(total_i) and
    //    final_points == P - sum(redeemed_i) + sum(earned_i),
    //    exactly, for any interleaving.
    //
    // Redemption/funds bounds:
    // 1. Request a redeem count above the account's points (or a cart whose
    //    total exceeds the balance).
    // 2. Assert the typed rejection and that neither the account row nor
    //    the orders table changed.
    //
    // Price freezing:
    // 1. Create an order, then raise the menu item's price.
    // 2. Re-read the order: stored unit_price and total are unchanged,
    //    while the line's display name would follow a rename.
    //
    // Transition serialization:
    // 1. Race pending->preparing against preparing->ready on one order.
    // 2. Assert the per-request outcomes compose to a legal path and no
    //    state was skipped.
}
