// Session seam for authenticated routes
//
// Credential issuance and verification live outside this service: an
// upstream auth middleware validates the caller and inserts a
// `SessionAccount` into the request extensions before the request reaches
// these handlers. This module only defines that contract and the extractor
// handlers use to consume it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Role carried by the authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Staff,
}

/// Session identity inserted into request extensions by the upstream
/// auth middleware
#[derive(Debug, Clone)]
pub struct SessionAccount {
    pub account_id: i32,
    pub role: Role,
}

/// Errors raised by the session extractor
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No authenticated session")]
    MissingSession,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingSession => StatusCode::UNAUTHORIZED,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Authenticated account extractor for protected routes
///
/// The account id comes from the session, never from the request body.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: i32,
    pub role: Role,
}

impl AuthenticatedAccount {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionAccount>()
            .ok_or(AuthError::MissingSession)?;

        Ok(AuthenticatedAccount {
            account_id: session.account_id,
            role: session.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_session(session: SessionAccount) -> Parts {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        req.extensions_mut().insert(session);
        let (parts, _) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_extractor_reads_session_extension() {
        let mut parts = parts_with_session(SessionAccount {
            account_id: 42,
            role: Role::Customer,
        });

        let account = AuthenticatedAccount::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(account.account_id, 42);
        assert!(!account.is_staff());
    }

    #[tokio::test]
    async fn test_missing_session_is_rejected() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let result = AuthenticatedAccount::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthError::MissingSession)));
    }

    #[tokio::test]
    async fn test_staff_role() {
        let mut parts = parts_with_session(SessionAccount {
            account_id: 1,
            role: Role::Staff,
        });

        let account = AuthenticatedAccount::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert!(account.is_staff());
    }
}
