use sqlx::PgPool;

use crate::accounts::Account;

/// Repository for account reads
///
/// Balance mutations do not happen here: settlement adjusts the account row
/// inside the order-creation transaction so that the debit and the order
/// write commit as one unit.
#[derive(Clone)]
pub struct AccountsRepository {
    pool: PgPool,
}

impl AccountsRepository {
    /// Create a new AccountsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Account>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, phone, wallet_balance, reward_points, created_at \
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Look up an account's contact phone, if any
    pub async fn contact_phone(&self, id: i32) -> Result<Option<String>, sqlx::Error> {
        let phone: Option<Option<String>> =
            sqlx::query_scalar("SELECT phone FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(phone.flatten())
    }
}
