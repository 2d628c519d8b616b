/// In-memory repository backings.
///
/// RwLock-guarded maps with the same ordering and pagination semantics as the
/// Postgres backing. Cloning shares the underlying storage.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{Account, Comment, ObjectId, Post};
use crate::error::Result;
use crate::validators::Pagination;

use super::{AccountRepository, CommentRepository, PostRepository};

fn paginate<T>(items: Vec<T>, page: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[derive(Clone, Default)]
pub struct InMemoryAccounts {
    accounts: Arc<RwLock<HashMap<ObjectId, Account>>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn insert(&self, account: Account) -> Result<()> {
        self.accounts.write().await.insert(account.id, account);
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.profile.handle == handle)
            .cloned())
    }

    async fn save(&self, account: &Account) -> Result<()> {
        self.accounts
            .write()
            .await
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.read().await.values().cloned().collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPosts {
    posts: Arc<RwLock<HashMap<ObjectId, Post>>>,
}

impl InMemoryPosts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn insert(&self, post: Post) -> Result<()> {
        self.posts.write().await.insert(post.id, post);
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn save(&self, post: &Post) -> Result<()> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn by_authors(&self, authors: &[ObjectId], page: Pagination) -> Result<Vec<Post>> {
        let mut selected: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| authors.contains(&p.author_id))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(selected, page))
    }

    async fn most_liked(&self, since: DateTime<Utc>, page: Pagination) -> Result<Vec<Post>> {
        let mut selected: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.created_at >= since)
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.likes.len().cmp(&a.likes.len()));
        Ok(paginate(selected, page))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryComments {
    comments: Arc<RwLock<HashMap<ObjectId, Comment>>>,
}

impl InMemoryComments {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn insert(&self, comment: Comment) -> Result<()> {
        self.comments.write().await.insert(comment.id, comment);
        Ok(())
    }

    async fn for_post(&self, post_id: &ObjectId, page: Pagination) -> Result<Vec<Comment>> {
        let mut selected: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == *post_id)
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(selected, page))
    }
}
