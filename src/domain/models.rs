use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectId;

/// Public profile carried inside token payloads and API responses.
///
/// This is also the *snapshot* embedded in signed tokens: it is display data
/// only and must never be used for authorization decisions, because it can be
/// stale relative to later profile or graph mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub handle: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub following: Vec<ObjectId>,
    pub saved: Vec<ObjectId>,
    pub birthdate: DateTime<Utc>,
    pub avatar: String,
    pub cover: String,
}

/// Account record. `password_hash` never leaves the crate; serialize
/// `AccountView` instead.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: ObjectId,
    pub created_at: DateTime<Utc>,
    pub password_hash: String,
    pub profile: Profile,
}

impl Account {
    pub fn new(handle: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            created_at: now,
            password_hash,
            profile: Profile {
                handle: handle.to_string(),
                name: handle.to_string(),
                email: email.to_string(),
                bio: String::new(),
                following: Vec::new(),
                saved: Vec::new(),
                birthdate: now,
                avatar: String::new(),
                cover: String::new(),
            },
        }
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            created_at: self.created_at,
            profile: self.profile.clone(),
        }
    }
}

/// Outward-facing account shape, without credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: ObjectId,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Account view with its derived follower count attached.
#[derive(Debug, Clone, Serialize)]
pub struct AccountWithFollowers {
    #[serde(flatten)]
    pub account: AccountView,
    pub followers: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub content: String,
    /// Liking users. Toggle invariant: each member appears at most once.
    pub likes: Vec<ObjectId>,
    /// Comment ids in append order.
    pub comments: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: ObjectId, content: &str) -> Self {
        Self {
            id: ObjectId::new(),
            author_id,
            content: content.to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub author_id: ObjectId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: ObjectId, author_id: ObjectId, content: &str) -> Self {
        Self {
            id: ObjectId::new(),
            post_id,
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_empty_sets_and_handle_as_name() {
        let account = Account::new("alice", "alice@example.com", "hash".into());
        assert_eq!(account.profile.handle, "alice");
        assert_eq!(account.profile.name, "alice");
        assert!(account.profile.following.is_empty());
        assert!(account.profile.saved.is_empty());
    }

    #[test]
    fn account_view_omits_password_hash() {
        let account = Account::new("bob", "bob@example.com", "s3cret-hash".into());
        let json = serde_json::to_string(&account.view()).unwrap();
        assert!(!json.contains("s3cret-hash"));
        assert!(json.contains("\"handle\":\"bob\""));
    }
}
