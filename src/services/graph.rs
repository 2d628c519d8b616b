/// Social graph: following-sets and the derived followers view.
///
/// A follow edge is membership of the followee id in the follower's
/// following-set; there is no separate edge entity and no stored follower
/// list.
use std::sync::Arc;

use crate::db::AccountRepository;
use crate::domain::ObjectId;
use crate::error::{Result, ServiceError};

pub struct SocialGraphService {
    accounts: Arc<dyn AccountRepository>,
}

impl SocialGraphService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Idempotent follow: following an account twice leaves its id in the
    /// following-set exactly once, and the repeat call is a success.
    /// Self-follow is an ordinary append, not an error.
    pub async fn follow(&self, follower_id: ObjectId, followee_id: ObjectId) -> Result<()> {
        self.accounts
            .find_by_id(&followee_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account to follow not found".to_string()))?;
        let mut follower = self
            .accounts
            .find_by_id(&follower_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;

        if follower.profile.following.contains(&followee_id) {
            tracing::debug!(follower = %follower_id, followee = %followee_id, "Already following");
            return Ok(());
        }

        follower.profile.following.push(followee_id);
        self.accounts.save(&follower).await?;
        tracing::info!(follower = %follower_id, followee = %followee_id, "Followed");
        Ok(())
    }

    /// Idempotent unfollow.
    pub async fn unfollow(&self, follower_id: ObjectId, followee_id: ObjectId) -> Result<()> {
        let mut follower = self
            .accounts
            .find_by_id(&follower_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;

        let before = follower.profile.following.len();
        follower.profile.following.retain(|id| *id != followee_id);
        if follower.profile.following.len() != before {
            self.accounts.save(&follower).await?;
            tracing::info!(follower = %follower_id, followee = %followee_id, "Unfollowed");
        }
        Ok(())
    }

    /// Derived follower count: scans every account's following-set, so this
    /// is O(total accounts) per call. There is no reverse index to consult.
    pub async fn follower_count(&self, user_id: ObjectId) -> Result<u64> {
        let accounts = self.accounts.list().await?;
        Ok(accounts
            .iter()
            .filter(|a| a.profile.following.contains(&user_id))
            .count() as u64)
    }
}
