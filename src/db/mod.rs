/// Repository boundary for the Pulse core.
///
/// Services depend on these traits only; the backing store is injected at
/// construction. `memory` backs tests and single-process deployments,
/// `postgres` is the sqlx backing.
///
/// Read-modify-write contract: `save` replaces the whole record. Two
/// concurrent writers to the same record race and the last write wins; the
/// core deliberately adds no optimistic concurrency on top.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Account, Comment, ObjectId, Post};
use crate::error::Result;
use crate::validators::Pagination;

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAccounts, InMemoryComments, InMemoryPosts};
pub use postgres::{PgAccountRepository, PgCommentRepository, PgPostRepository};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, account: Account) -> Result<()>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>>;
    /// Case-sensitive exact match on the handle.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>>;
    /// Replace the stored record.
    async fn save(&self, account: &Account) -> Result<()>;
    /// Every account. The follower-count derivation scans this.
    async fn list(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<()>;
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>>;
    async fn save(&self, post: &Post) -> Result<()>;
    /// Posts by any of `authors`, newest first, then skip/limit.
    async fn by_authors(&self, authors: &[ObjectId], page: Pagination) -> Result<Vec<Post>>;
    /// Posts created at or after `since`, ordered by like count descending,
    /// then skip/limit.
    async fn most_liked(&self, since: DateTime<Utc>, page: Pagination) -> Result<Vec<Post>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<()>;
    /// Comments on `post_id`, newest first, then skip/limit.
    async fn for_post(&self, post_id: &ObjectId, page: Pagination) -> Result<Vec<Comment>>;
}
