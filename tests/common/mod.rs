//! Shared fixtures for integration tests: the full service graph wired to
//! in-memory backings.
#![allow(dead_code)]

use std::sync::Arc;

use pulse_service::db::{
    AccountRepository, CommentRepository, InMemoryAccounts, InMemoryComments, InMemoryPosts,
    PostRepository,
};
use pulse_service::security::{InMemoryTokenRegistry, TokenService};
use pulse_service::services::{
    AccountService, AuthGateway, EngagementService, FeedService, SocialGraphService,
};

pub const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

pub struct TestApp {
    pub accounts: AccountService,
    pub gateway: AuthGateway,
    pub engagement: EngagementService,
    pub graph: Arc<SocialGraphService>,
    pub feed: FeedService,
    // Direct store handles for fixtures and assertions.
    pub account_store: InMemoryAccounts,
    pub post_store: InMemoryPosts,
    pub comment_store: InMemoryComments,
}

pub fn test_app() -> TestApp {
    let account_store = InMemoryAccounts::new();
    let post_store = InMemoryPosts::new();
    let comment_store = InMemoryComments::new();

    let accounts: Arc<dyn AccountRepository> = Arc::new(account_store.clone());
    let posts: Arc<dyn PostRepository> = Arc::new(post_store.clone());
    let comments: Arc<dyn CommentRepository> = Arc::new(comment_store.clone());

    let tokens = Arc::new(TokenService::new(
        "integration-access-secret",
        "integration-refresh-secret",
        WEEK_SECS,
        WEEK_SECS,
        Arc::new(InMemoryTokenRegistry::new()),
    ));
    let graph = Arc::new(SocialGraphService::new(accounts.clone()));

    TestApp {
        accounts: AccountService::new(accounts.clone(), tokens.clone()),
        gateway: AuthGateway::new(tokens.clone(), accounts.clone()),
        engagement: EngagementService::new(accounts.clone(), posts.clone(), comments.clone()),
        feed: FeedService::new(accounts, posts, comments, graph.clone()),
        graph,
        account_store,
        post_store,
        comment_store,
    }
}
