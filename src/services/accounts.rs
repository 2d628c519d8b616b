/// Account registration and session entry points.
use std::sync::Arc;

use serde::Serialize;

use crate::db::AccountRepository;
use crate::domain::{Account, AccountView, ObjectId};
use crate::error::{Result, ServiceError};
use crate::security::{password, TokenService};
use crate::validators;

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountView,
}

pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account. The handle must be unused (case-sensitive
    /// exact match); exactly one account record is created on success.
    pub async fn create_account(
        &self,
        handle: &str,
        password: &str,
        email: &str,
    ) -> Result<AccountView> {
        if !validators::validate_handle(handle) {
            return Err(ServiceError::BadRequest(format!(
                "invalid handle: {:?}",
                handle
            )));
        }
        if !validators::validate_email(email) {
            return Err(ServiceError::BadRequest(format!(
                "invalid email: {:?}",
                email
            )));
        }
        if !validators::validate_password(password) {
            return Err(ServiceError::BadRequest(format!(
                "password must be at least {} characters",
                validators::MIN_PASSWORD_LEN
            )));
        }
        if self.accounts.find_by_handle(handle).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "an account with handle {} is already registered",
                handle
            )));
        }

        let password_hash = password::hash_password(password)?;
        let account = Account::new(handle, email, password_hash);
        let view = account.view();
        self.accounts.insert(account).await?;

        tracing::info!(handle = %handle, id = %view.id, "Registered new account");
        Ok(view)
    }

    /// Password login. Unknown handle is `NotFound`; a wrong password is
    /// `Forbidden`. Success issues an access and a refresh token.
    pub async fn login(&self, handle: &str, password: &str) -> Result<LoginResponse> {
        let account = self
            .accounts
            .find_by_handle(handle)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;

        if !password::verify_password(password, &account.password_hash)? {
            return Err(ServiceError::Forbidden("incorrect password".to_string()));
        }

        let access_token = self.tokens.issue_access_token(&account)?;
        let refresh_token = self.tokens.issue_refresh_token(&account).await?;

        tracing::info!(handle = %handle, id = %account.id, "Account logged in");
        Ok(LoginResponse {
            access_token,
            refresh_token,
            account: account.view(),
        })
    }

    /// Exchange a live refresh token for a new access token.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<String> {
        self.tokens.refresh_access_token(refresh_token).await
    }

    /// Idempotent logout: revoking an unknown token is still a success.
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        self.tokens.revoke(refresh_token).await
    }

    pub async fn get_profile(&self, account_id: ObjectId) -> Result<AccountView> {
        let account = self
            .accounts
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;
        Ok(account.view())
    }
}
