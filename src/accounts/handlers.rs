// HTTP handlers for account endpoints

use axum::{extract::State, Json};

use crate::accounts::WalletSnapshot;
use crate::auth::AuthenticatedAccount;
use crate::error::ApiError;

/// Handler for GET /api/account/wallet
/// Returns the authenticated account's balance snapshot
pub async fn get_wallet_handler(
    State(state): State<crate::AppState>,
    account: AuthenticatedAccount,
) -> Result<Json<WalletSnapshot>, ApiError> {
    let found = state
        .accounts_repo
        .find_by_id(account.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Account".to_string(),
            id: account.account_id.to_string(),
        })?;

    Ok(Json(WalletSnapshot::from(&found)))
}
