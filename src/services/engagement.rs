/// Posts, comments, and the like toggle.
use std::sync::Arc;

use serde::Serialize;

use crate::db::{AccountRepository, CommentRepository, PostRepository};
use crate::domain::{Comment, ObjectId, Post};
use crate::error::{Result, ServiceError};

/// Result of a like toggle: the resulting count and which branch fired
/// (`liked == true` means the user is now a member of the like-set).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeOutcome {
    pub likes: usize,
    pub liked: bool,
}

pub struct EngagementService {
    accounts: Arc<dyn AccountRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl EngagementService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            accounts,
            posts,
            comments,
        }
    }

    pub async fn create_post(&self, author_id: ObjectId, content: &str) -> Result<Post> {
        let post = Post::new(author_id, content);
        self.posts.insert(post.clone()).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Created post");
        Ok(post)
    }

    /// Record a comment and append its id to the post's comment list.
    ///
    /// The two writes are independent: a crash between them leaves a comment
    /// that no post references. Caller-visible state is still consistent
    /// (`for_post` queries by post id), but the orphan is detectable.
    pub async fn add_comment(
        &self,
        post_id: ObjectId,
        content: &str,
        author_id: ObjectId,
    ) -> Result<Comment> {
        self.posts
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("post not found".to_string()))?;

        let comment = Comment::new(post_id, author_id, content);
        self.comments.insert(comment.clone()).await?;

        // Second, independent write: re-read the post and append.
        let mut post = self
            .posts
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("post not found".to_string()))?;
        post.comments.push(comment.id);
        self.posts.save(&post).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Added comment");
        Ok(comment)
    }

    /// Toggle `user_id`'s membership in the post's like-set.
    ///
    /// Membership test, not an unconditional append: repeated identical calls
    /// issued serially alternate liked/unliked and never duplicate a member.
    /// Read-modify-write against the store; two concurrent togglers race and
    /// the last write wins.
    pub async fn toggle_like(&self, user_id: ObjectId, post_id: ObjectId) -> Result<LikeOutcome> {
        self.accounts
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;
        let mut post = self
            .posts
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("post not found".to_string()))?;

        let liked = match post.likes.iter().position(|id| *id == user_id) {
            Some(index) => {
                post.likes.remove(index);
                false
            }
            None => {
                post.likes.push(user_id);
                true
            }
        };
        self.posts.save(&post).await?;

        tracing::debug!(post_id = %post_id, user_id = %user_id, liked, "Toggled like");
        Ok(LikeOutcome {
            likes: post.likes.len(),
            liked,
        })
    }
}
