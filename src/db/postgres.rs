/// Postgres repository backings (schema in `migrations/0001_init.sql`).
///
/// Records are stored document-style: like-sets, following-sets, and comment
/// lists live in `TEXT[]` columns and `save` rewrites the whole row. This
/// reproduces the per-document write model of the original store, with the
/// same last-write-wins behavior under concurrent mutation.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Account, Comment, ObjectId, Post, Profile};
use crate::error::{Result, ServiceError};
use crate::validators::Pagination;

use super::{AccountRepository, CommentRepository, PostRepository};

fn decode_id(raw: &str) -> Result<ObjectId> {
    raw.parse()
        .map_err(|_| ServiceError::Internal(format!("corrupt id in database: {}", raw)))
}

fn decode_ids(raw: &[String]) -> Result<Vec<ObjectId>> {
    raw.iter().map(|s| decode_id(s)).collect()
}

fn encode_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.to_hex()).collect()
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    created_at: DateTime<Utc>,
    password_hash: String,
    handle: String,
    name: String,
    email: String,
    bio: String,
    following: Vec<String>,
    saved: Vec<String>,
    birthdate: DateTime<Utc>,
    avatar: String,
    cover: String,
}

impl AccountRow {
    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: decode_id(&self.id)?,
            created_at: self.created_at,
            password_hash: self.password_hash,
            profile: Profile {
                handle: self.handle,
                name: self.name,
                email: self.email,
                bio: self.bio,
                following: decode_ids(&self.following)?,
                saved: decode_ids(&self.saved)?,
                birthdate: self.birthdate,
                avatar: self.avatar,
                cover: self.cover,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    author_id: String,
    content: String,
    likes: Vec<String>,
    comments: Vec<String>,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Result<Post> {
        Ok(Post {
            id: decode_id(&self.id)?,
            author_id: decode_id(&self.author_id)?,
            content: self.content,
            likes: decode_ids(&self.likes)?,
            comments: decode_ids(&self.comments)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    author_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Result<Comment> {
        Ok(Comment {
            id: decode_id(&self.id)?,
            post_id: decode_id(&self.post_id)?,
            author_id: decode_id(&self.author_id)?,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

const UPSERT_ACCOUNT: &str = r#"
    INSERT INTO accounts
        (id, created_at, password_hash, handle, name, email, bio,
         following, saved, birthdate, avatar, cover)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (id) DO UPDATE SET
        password_hash = EXCLUDED.password_hash,
        handle = EXCLUDED.handle,
        name = EXCLUDED.name,
        email = EXCLUDED.email,
        bio = EXCLUDED.bio,
        following = EXCLUDED.following,
        saved = EXCLUDED.saved,
        birthdate = EXCLUDED.birthdate,
        avatar = EXCLUDED.avatar,
        cover = EXCLUDED.cover
"#;

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, account: &Account) -> Result<()> {
        sqlx::query(UPSERT_ACCOUNT)
            .bind(account.id.to_hex())
            .bind(account.created_at)
            .bind(&account.password_hash)
            .bind(&account.profile.handle)
            .bind(&account.profile.name)
            .bind(&account.profile.email)
            .bind(&account.profile.bio)
            .bind(encode_ids(&account.profile.following))
            .bind(encode_ids(&account.profile.saved))
            .bind(account.profile.birthdate)
            .bind(&account.profile.avatar)
            .bind(&account.profile.cover)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: Account) -> Result<()> {
        self.upsert(&account).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = $1")
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        // Case-sensitive exact match: TEXT equality, no citext/ILIKE.
        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE handle = $1")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AccountRow::into_account).transpose()
    }

    async fn save(&self, account: &Account) -> Result<()> {
        self.upsert(account).await
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(AccountRow::into_account).collect()
    }
}

const UPSERT_POST: &str = r#"
    INSERT INTO posts (id, author_id, content, likes, comments, created_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (id) DO UPDATE SET
        content = EXCLUDED.content,
        likes = EXCLUDED.likes,
        comments = EXCLUDED.comments
"#;

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, post: &Post) -> Result<()> {
        sqlx::query(UPSERT_POST)
            .bind(post.id.to_hex())
            .bind(post.author_id.to_hex())
            .bind(&post.content)
            .bind(encode_ids(&post.likes))
            .bind(encode_ids(&post.comments))
            .bind(post.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: Post) -> Result<()> {
        self.upsert(&post).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = $1")
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        row.map(PostRow::into_post).transpose()
    }

    async fn save(&self, post: &Post) -> Result<()> {
        self.upsert(post).await
    }

    async fn by_authors(&self, authors: &[ObjectId], page: Pagination) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts WHERE author_id = ANY($1)
             ORDER BY created_at DESC OFFSET $2 LIMIT $3",
        )
        .bind(encode_ids(authors))
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PostRow::into_post).collect()
    }

    async fn most_liked(&self, since: DateTime<Utc>, page: Pagination) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts WHERE created_at >= $1
             ORDER BY cardinality(likes) DESC OFFSET $2 LIMIT $3",
        )
        .bind(since)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PostRow::into_post).collect()
    }
}

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, content, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id.to_hex())
        .bind(comment.post_id.to_hex())
        .bind(comment.author_id.to_hex())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn for_post(&self, post_id: &ObjectId, page: Pagination) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT * FROM comments WHERE post_id = $1
             ORDER BY created_at DESC OFFSET $2 LIMIT $3",
        )
        .bind(post_id.to_hex())
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CommentRow::into_comment).collect()
    }
}
