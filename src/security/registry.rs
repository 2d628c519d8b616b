/// Refresh-token registry.
///
/// A refresh token is live only while its digest is present here; removal is
/// the authoritative revocation mechanism, checked before any signature work.
/// Registries store SHA-256 digests, never raw tokens.
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::Result;

/// Hex-encoded SHA-256 digest of a token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
pub trait RefreshTokenRegistry: Send + Sync {
    async fn insert(&self, token: &str) -> Result<()>;
    async fn contains(&self, token: &str) -> Result<bool>;
    /// Unconditional removal; removing an absent token is a no-op.
    async fn remove(&self, token: &str) -> Result<()>;
}

/// Process-local registry. Unbounded, lost on restart (which invalidates
/// every session), and not shared across instances: a sibling instance will
/// reject refresh tokens issued here. Multi-instance deployments need
/// `RedisTokenRegistry` instead.
#[derive(Clone, Default)]
pub struct InMemoryTokenRegistry {
    entries: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRegistry for InMemoryTokenRegistry {
    async fn insert(&self, token: &str) -> Result<()> {
        self.entries.write().await.insert(hash_token(token));
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains(&hash_token(token)))
    }

    async fn remove(&self, token: &str) -> Result<()> {
        self.entries.write().await.remove(&hash_token(token));
        Ok(())
    }
}

/// Redis-backed registry shared across service instances. Entries expire with
/// the refresh-token lifetime, so revoked-by-expiry tokens do not accumulate.
///
/// **Key format**: `pulse:refresh:{sha256(token)}`
pub struct RedisTokenRegistry {
    redis: ConnectionManager,
    ttl_secs: u64,
}

impl RedisTokenRegistry {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    fn key_for(token: &str) -> String {
        format!("pulse:refresh:{}", hash_token(token))
    }
}

#[async_trait]
impl RefreshTokenRegistry for RedisTokenRegistry {
    async fn insert(&self, token: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(Self::key_for(token), "1", self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool> {
        let mut conn = self.redis.clone();
        let exists: bool = conn.exists(Self::key_for(token)).await?;
        Ok(exists)
    }

    async fn remove(&self, token: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: () = conn.del(Self::key_for(token)).await?;
        Ok(())
    }
}
