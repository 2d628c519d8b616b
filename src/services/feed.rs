/// Feed and ranking read path, composed from the social graph and the
/// engagement store.
use std::sync::Arc;

use chrono::Utc;

use crate::db::{AccountRepository, CommentRepository, PostRepository};
use crate::domain::{AccountWithFollowers, Comment, ObjectId, Period, Post};
use crate::error::{Result, ServiceError};
use crate::validators::Pagination;

use super::graph::SocialGraphService;

pub struct FeedService {
    accounts: Arc<dyn AccountRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    graph: Arc<SocialGraphService>,
}

impl FeedService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        graph: Arc<SocialGraphService>,
    ) -> Self {
        Self {
            accounts,
            posts,
            comments,
            graph,
        }
    }

    /// Posts authored by the user's followees, newest first. An empty
    /// following-set yields an empty feed, not an error.
    pub async fn fresh_posts_from_following(
        &self,
        user_id: ObjectId,
        page: Pagination,
    ) -> Result<Vec<Post>> {
        let account = self
            .accounts
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;

        if account.profile.following.is_empty() {
            return Ok(Vec::new());
        }
        self.posts
            .by_authors(&account.profile.following, page)
            .await
    }

    /// Most-liked posts within the period, like-count descending.
    ///
    /// The period cutoff is applied as a filter. An unrecognized period fails
    /// `BadRequest` before any query runs.
    pub async fn most_liked_posts(&self, period: &str, page: Pagination) -> Result<Vec<Post>> {
        let period: Period = period.parse()?;
        let since = period.cutoff_from(Utc::now());
        tracing::debug!(period = period.as_str(), %since, "Ranking most-liked posts");
        self.posts.most_liked(since, page).await
    }

    /// Comments on a post, newest first.
    pub async fn comments_for_post(
        &self,
        post_id: ObjectId,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.comments.for_post(&post_id, page).await
    }

    /// Every account with its derived follower count. Unpaginated, and each
    /// count is itself a full scan, so this is O(accounts^2); fine at the
    /// service's current scale, a known ceiling beyond it.
    pub async fn users_with_follower_counts(&self) -> Result<Vec<AccountWithFollowers>> {
        let accounts = self.accounts.list().await?;
        let mut out = Vec::with_capacity(accounts.len());
        for account in accounts {
            let followers = self.graph.follower_count(account.id).await?;
            out.push(AccountWithFollowers {
                account: account.view(),
                followers,
            });
        }
        Ok(out)
    }
}
