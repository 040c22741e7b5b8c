use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts::Account;
use crate::models::MenuItem;
use crate::orders::error::OrderError;
use crate::orders::{Order, OrderLineView, OrderStatus, Quote, StatusMachine};

/// Repository for catalog reads from the order core's perspective
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new CatalogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find multiple menu items by IDs
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<MenuItem>, OrderError> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, category, price, reward_points, available, created_at, updated_at
            FROM menu_items
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

/// Repository for order persistence and settlement
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    /// Create a new OrdersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Settle a priced order atomically
    ///
    /// In one transaction: a guarded adjust-if-sufficient update debits the
    /// wallet and applies the point redemption/award, then the order and its
    /// lines are inserted. Either everything commits or nothing does, so no
    /// reader can observe a debited account without its order or vice versa.
    ///
    /// The guard re-checks funds and points against the current row, not a
    /// balance read earlier in the request; concurrent settlements against
    /// the same account serialize on the row lock the update takes.
    pub async fn create_settled(
        &self,
        account_id: i32,
        quote: &Quote,
    ) -> Result<(Order, Account), OrderError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET wallet_balance = wallet_balance - $2,
                reward_points = reward_points - $3 + $4
            WHERE id = $1
              AND wallet_balance >= $2
              AND reward_points >= $3
            RETURNING id, name, phone, wallet_balance, reward_points, created_at
            "#,
        )
        .bind(account_id)
        .bind(quote.total)
        .bind(quote.points_redeemed)
        .bind(quote.points_earned)
        .fetch_optional(&mut *tx)
        .await?;

        let account = match updated {
            Some(account) => account,
            // Guard failed, nothing was mutated. Read the row once more to
            // report which constraint was violated.
            None => {
                let current = sqlx::query_as::<_, Account>(
                    r#"
                    SELECT id, name, phone, wallet_balance, reward_points, created_at
                    FROM accounts
                    WHERE id = $1
                    "#,
                )
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;

                return match current {
                    None => Err(OrderError::AccountNotFound),
                    Some(account) if account.reward_points < quote.points_redeemed => {
                        Err(OrderError::InsufficientPoints {
                            available: account.reward_points,
                            requested: quote.points_redeemed,
                        })
                    }
                    Some(_) => Err(OrderError::InsufficientFunds),
                };
            }
        };

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (account_id, status, subtotal, points_redeemed, points_earned, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, status, subtotal, points_redeemed, points_earned, total,
                      created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(OrderStatus::Pending)
        .bind(quote.subtotal)
        .bind(quote.points_redeemed)
        .bind(quote.points_earned)
        .bind(quote.total)
        .fetch_one(&mut *tx)
        .await?;

        for line in &quote.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, menu_item_id, quantity, unit_price, line_total)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id)
            .bind(line.menu_item_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok((order, account))
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, account_id, status, subtotal, points_redeemed, points_earned, total,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Find all orders for an account, most recent first
    pub async fn find_by_account_id(&self, account_id: i32) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, account_id, status, subtotal, points_redeemed, points_earned, total,
                   created_at, updated_at
            FROM orders
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Find all orders across accounts, most recent first (staff view)
    pub async fn find_all(&self) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, account_id, status, subtotal, points_redeemed, points_earned, total,
                   created_at, updated_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Fetch an order's lines with display names resolved against the
    /// current catalog
    ///
    /// Names follow later menu renames; the stored unit_price does not.
    pub async fn lines_for_order(&self, order_id: Uuid) -> Result<Vec<OrderLineView>, OrderError> {
        let lines = sqlx::query_as::<_, OrderLineView>(
            r#"
            SELECT ol.menu_item_id, mi.name, ol.quantity, ol.unit_price, ol.line_total
            FROM order_lines ol
            JOIN menu_items mi ON mi.id = ol.menu_item_id
            WHERE ol.order_id = $1
            ORDER BY ol.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Apply a status transition under a row lock
    ///
    /// The order row is selected FOR UPDATE so concurrent transitions on the
    /// same order serialize and the legality check always reads a committed
    /// status.
    pub async fn transition_status(
        &self,
        order_id: Uuid,
        target: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, account_id, status, subtotal, points_redeemed, points_earned, total,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound)?;

        StatusMachine::transition(current.status, target)?;

        let updated = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, account_id, status, subtotal, points_redeemed, points_earned, total,
                      created_at, updated_at
            "#,
        )
        .bind(target)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    // Settlement and transition behavior require a live database and are
    // exercised through the service-level integration suite; the pure parts
    // (pricing, status table) carry their own unit tests.
}
