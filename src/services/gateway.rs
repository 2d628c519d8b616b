/// Authentication gateway: resolves an inbound bearer credential to a live
/// account.
///
/// The token's embedded profile snapshot may be stale relative to later
/// profile or graph mutations, so the gateway always re-fetches the current
/// account record by the decoded id and never authorizes against the
/// snapshot.
use std::sync::Arc;

use crate::db::AccountRepository;
use crate::domain::{Account, ObjectId};
use crate::error::{Result, ServiceError};
use crate::security::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

pub struct AuthGateway {
    tokens: Arc<TokenService>,
    accounts: Arc<dyn AccountRepository>,
}

impl AuthGateway {
    pub fn new(tokens: Arc<TokenService>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { tokens, accounts }
    }

    pub async fn authenticate(&self, header: Option<&str>) -> Result<Account> {
        let header = header.ok_or_else(|| {
            ServiceError::Unauthorized("authorization header is missing".to_string())
        })?;
        let token = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            ServiceError::Unauthorized(
                "authorization header is not a bearer credential".to_string(),
            )
        })?;

        let claims = self.tokens.verify_access_token(token)?;
        let account_id: ObjectId = claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("malformed account id in token".to_string()))?;

        self.accounts
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("account no longer exists".to_string())
            })
    }
}
