use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::orders::{OrderError, OrderLineRequest};

/// Reward-program constants, injected at construction time
#[derive(Debug, Clone)]
pub struct RewardConfig {
    /// Currency value of one redeemed point
    pub point_value: Decimal,
    /// Fraction of the order total earned back as points
    pub earn_rate: Decimal,
    /// Upper bound on points redeemable in a single order, enforced
    /// server-side
    pub max_redeem_per_order: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            point_value: Decimal::new(50, 2),  // 0.50 per point
            earn_rate: Decimal::new(10, 2),    // 10% of total
            max_redeem_per_order: 100,
        }
    }
}

/// One catalog entry in the snapshot the engine prices against
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Decimal,
    pub available: bool,
}

/// Catalog snapshot: menu item id -> current price/availability
pub type CatalogSnapshot = HashMap<i32, CatalogEntry>;

/// A cart line priced against the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Result of pricing a cart
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub points_redeemed: i64,
    pub points_earned: i64,
}

/// Pricing engine
///
/// Pure computation: no I/O, deterministic for a given cart, snapshot and
/// redeem count. Settlement re-validates balances against the store; this
/// engine only prices.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: RewardConfig,
}

impl PricingEngine {
    /// Create a new PricingEngine with the given reward constants
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Price a cart against a catalog snapshot
    ///
    /// # Errors
    /// - `InvalidCart` if the cart is empty, any quantity is not positive,
    ///   or any referenced item is missing or unavailable in the snapshot
    /// - `InvalidRedemption` if the redeem count is negative or exceeds the
    ///   per-order cap
    pub fn quote(
        &self,
        items: &[OrderLineRequest],
        catalog: &CatalogSnapshot,
        redeem_points: i64,
    ) -> Result<Quote, OrderError> {
        if items.is_empty() {
            return Err(OrderError::InvalidCart("cart is empty".to_string()));
        }

        if redeem_points < 0 {
            return Err(OrderError::InvalidRedemption(
                "redeem count must be non-negative".to_string(),
            ));
        }

        if redeem_points > self.config.max_redeem_per_order {
            return Err(OrderError::InvalidRedemption(format!(
                "cannot redeem more than {} points per order",
                self.config.max_redeem_per_order
            )));
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut subtotal = Decimal::ZERO;

        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidCart(format!(
                    "quantity must be positive for menu item {}, got {}",
                    item.menu_item_id, item.quantity
                )));
            }

            let entry = catalog.get(&item.menu_item_id).ok_or_else(|| {
                OrderError::InvalidCart(format!("unknown menu item {}", item.menu_item_id))
            })?;

            if !entry.available {
                return Err(OrderError::InvalidCart(format!(
                    "menu item '{}' is currently unavailable",
                    entry.name
                )));
            }

            let line_total = entry.price * Decimal::from(item.quantity);
            subtotal += line_total;

            lines.push(PricedLine {
                menu_item_id: item.menu_item_id,
                name: entry.name.clone(),
                quantity: item.quantity,
                unit_price: entry.price,
                line_total,
            });
        }

        let discount = Decimal::from(redeem_points) * self.config.point_value;
        let total = (subtotal - discount).max(Decimal::ZERO);

        let points_earned = (total * self.config.earn_rate)
            .floor()
            .to_i64()
            .ok_or_else(|| {
                OrderError::Calculation("earned points out of range".to_string())
            })?;

        Ok(Quote {
            lines,
            subtotal,
            discount,
            total,
            points_redeemed: redeem_points,
            points_earned,
        })
    }
}
