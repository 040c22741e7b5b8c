use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Domain model representing a customer account
///
/// `wallet_balance` and `reward_points` are mutated only by order
/// settlement; both are CHECK-constrained non-negative in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub wallet_balance: Decimal,
    pub reward_points: i64,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of an account's balances returned to the account owner
///
/// This is the only shape in which balances leave the service; the full
/// `Account` row (phone included) stays internal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub wallet_balance: Decimal,
    pub reward_points: i64,
}

impl From<&Account> for WalletSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            wallet_balance: account.wallet_balance,
            reward_points: account.reward_points,
        }
    }
}
