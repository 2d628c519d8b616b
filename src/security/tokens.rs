/// Session token lifecycle: issuance, verification, refresh, revocation.
///
/// Access and refresh tokens are HS256-signed with distinct secrets and
/// distinct lifetimes. Refresh tokens are additionally gated by registry
/// membership, which is checked before any signature work and is the
/// authoritative revocation state. Refresh tokens are not rotated on use.
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Account, Profile};
use crate::error::{Result, ServiceError};

use super::registry::RefreshTokenRegistry;

const VALIDATION_LEEWAY_SECS: u64 = 30; // clock skew tolerance

/// Signed token payload.
///
/// `profile` is a snapshot taken at issuance and is for display only. The
/// authentication gateway re-reads the live account; nothing may authorize
/// against the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (24-char hex)
    pub sub: String,
    /// Profile snapshot at issuance time
    pub profile: Profile,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token identifier
    pub jti: String,
}

pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    registry: Arc<dyn RefreshTokenRegistry>,
}

impl TokenService {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        registry: Arc<dyn RefreshTokenRegistry>,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
            registry,
        }
    }

    pub fn from_config(config: &Config, registry: Arc<dyn RefreshTokenRegistry>) -> Self {
        Self::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
            registry,
        )
    }

    fn mint(
        &self,
        sub: String,
        profile: Profile,
        encoding: &EncodingKey,
        ttl: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            profile,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, encoding)
            .map_err(|e| ServiceError::Internal(format!("Failed to encode token: {}", e)))
    }

    fn decode_with(&self, token: &str, decoding: &DecodingKey) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = VALIDATION_LEEWAY_SECS;
        let data = decode::<Claims>(token, decoding, &validation)?;
        Ok(data.claims)
    }

    /// Mint an access token carrying the account's current profile snapshot.
    pub fn issue_access_token(&self, account: &Account) -> Result<String> {
        self.mint(
            account.id.to_hex(),
            account.profile.clone(),
            &self.access_encoding,
            self.access_ttl,
        )
    }

    /// Mint a refresh token and record its digest in the registry.
    pub async fn issue_refresh_token(&self, account: &Account) -> Result<String> {
        let token = self.mint(
            account.id.to_hex(),
            account.profile.clone(),
            &self.refresh_encoding,
            self.refresh_ttl,
        )?;
        self.registry.insert(&token).await?;
        Ok(token)
    }

    /// Verify an access token. `TokenExpired` and `InvalidToken` are distinct
    /// failures; both map to 401 at the boundary.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        self.decode_with(token, &self.access_decoding)
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// Registry membership is checked first: a revoked token fails with
    /// `TokenRevoked` no matter how valid its signature is. The refresh token
    /// itself is not rotated.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        if !self.registry.contains(refresh_token).await? {
            tracing::warn!("Refresh attempted with a token absent from the registry");
            return Err(ServiceError::TokenRevoked);
        }
        let claims = self.decode_with(refresh_token, &self.refresh_decoding)?;
        self.mint(
            claims.sub,
            claims.profile,
            &self.access_encoding,
            self.access_ttl,
        )
    }

    /// Remove a refresh token from the registry. Idempotent: revoking an
    /// unknown or already-revoked token succeeds.
    pub async fn revoke(&self, refresh_token: &str) -> Result<()> {
        self.registry.remove(refresh_token).await?;
        tracing::info!("Refresh token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::registry::InMemoryTokenRegistry;

    const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

    fn service_with_ttls(access_ttl_secs: i64, refresh_ttl_secs: i64) -> TokenService {
        TokenService::new(
            "access-secret-for-tests",
            "refresh-secret-for-tests",
            access_ttl_secs,
            refresh_ttl_secs,
            Arc::new(InMemoryTokenRegistry::new()),
        )
    }

    fn alice() -> Account {
        Account::new("alice", "alice@example.com", "hash".into())
    }

    #[tokio::test]
    async fn access_token_round_trips_with_snapshot() {
        let service = service_with_ttls(WEEK_SECS, WEEK_SECS);
        let account = alice();

        let token = service.issue_access_token(&account).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, account.id.to_hex());
        assert_eq!(claims.profile.handle, "alice");
        assert!(!claims.jti.is_empty());
    }

    #[tokio::test]
    async fn expired_access_token_is_a_distinct_failure() {
        // Negative TTL puts exp far enough in the past to beat the leeway.
        let service = service_with_ttls(-120, WEEK_SECS);
        let token = service.issue_access_token(&alice()).unwrap();
        assert!(matches!(
            service.verify_access_token(&token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn refresh_token_is_not_a_valid_access_token() {
        let service = service_with_ttls(WEEK_SECS, WEEK_SECS);
        let refresh = service.issue_refresh_token(&alice()).await.unwrap();
        // Signed with the refresh secret, so the access key rejects it.
        assert!(matches!(
            service.verify_access_token(&refresh),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn registry_membership_is_checked_before_signature() {
        let registry = Arc::new(InMemoryTokenRegistry::new());
        let service = TokenService::new(
            "access-secret-for-tests",
            "refresh-secret-for-tests",
            WEEK_SECS,
            WEEK_SECS,
            registry.clone(),
        );

        // Well-signed but never registered: revoked, not invalid.
        let other = service_with_ttls(WEEK_SECS, WEEK_SECS);
        let unregistered = other.issue_refresh_token(&alice()).await.unwrap();
        assert!(matches!(
            service.refresh_access_token(&unregistered).await,
            Err(ServiceError::TokenRevoked)
        ));

        // Registered garbage gets past the membership gate and then fails
        // signature verification.
        registry.insert("garbage-token").await.unwrap();
        assert!(matches!(
            service.refresh_access_token("garbage-token").await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn refresh_succeeds_until_revoked_and_does_not_rotate() {
        let service = service_with_ttls(WEEK_SECS, WEEK_SECS);
        let account = alice();
        let refresh = service.issue_refresh_token(&account).await.unwrap();

        let access = service.refresh_access_token(&refresh).await.unwrap();
        let claims = service.verify_access_token(&access).unwrap();
        assert_eq!(claims.sub, account.id.to_hex());

        // Same refresh token works again: no rotation.
        assert!(service.refresh_access_token(&refresh).await.is_ok());

        service.revoke(&refresh).await.unwrap();
        assert!(matches!(
            service.refresh_access_token(&refresh).await,
            Err(ServiceError::TokenRevoked)
        ));

        // Revoking again is fine.
        service.revoke(&refresh).await.unwrap();
    }
}
