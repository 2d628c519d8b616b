mod common;

use common::test_app;
use pulse_service::ServiceError;

#[tokio::test]
async fn duplicate_handle_is_a_conflict() {
    let app = test_app();
    app.accounts
        .create_account("alice", "secret1", "alice@example.com")
        .await
        .unwrap();

    let second = app
        .accounts
        .create_account("alice", "other-password", "alice2@example.com")
        .await;
    assert!(matches!(second, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn malformed_handle_and_email_are_rejected() {
    let app = test_app();
    assert!(matches!(
        app.accounts.create_account("a", "secret1", "a@example.com").await,
        Err(ServiceError::BadRequest(_))
    ));
    assert!(matches!(
        app.accounts.create_account("alice", "secret1", "not-an-email").await,
        Err(ServiceError::BadRequest(_))
    ));
}

#[tokio::test]
async fn short_passwords_are_rejected_at_registration() {
    let app = test_app();
    assert!(matches!(
        app.accounts
            .create_account("alice", "five5", "alice@example.com")
            .await,
        Err(ServiceError::BadRequest(_))
    ));
    // Exactly the six-character floor is accepted.
    app.accounts
        .create_account("alice", "sixsix", "alice@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn login_failure_taxonomy() {
    let app = test_app();
    app.accounts
        .create_account("alice", "secret1", "alice@example.com")
        .await
        .unwrap();

    assert!(matches!(
        app.accounts.login("nobody", "secret1").await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        app.accounts.login("alice", "wrong").await,
        Err(ServiceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn register_login_refresh_logout_scenario() {
    let app = test_app();
    app.accounts
        .create_account("alice", "secret1", "alice@example.com")
        .await
        .unwrap();

    let session = app.accounts.login("alice", "secret1").await.unwrap();
    assert!(!session.access_token.is_empty());
    assert!(!session.refresh_token.is_empty());
    assert_ne!(session.access_token, session.refresh_token);

    // Refresh mints a fresh access token while the session is live.
    let new_access = app
        .accounts
        .refresh_session(&session.refresh_token)
        .await
        .unwrap();
    assert!(!new_access.is_empty());

    // Logout, then the same refresh token is rejected.
    app.accounts.logout(&session.refresh_token).await.unwrap();
    assert!(matches!(
        app.accounts.refresh_session(&session.refresh_token).await,
        Err(ServiceError::TokenRevoked)
    ));

    // Logout is idempotent.
    app.accounts.logout(&session.refresh_token).await.unwrap();
}

#[tokio::test]
async fn gateway_rejects_missing_and_malformed_headers() {
    let app = test_app();

    assert!(matches!(
        app.gateway.authenticate(None).await,
        Err(ServiceError::Unauthorized(_))
    ));
    assert!(matches!(
        app.gateway.authenticate(Some("Token abc")).await,
        Err(ServiceError::Unauthorized(_))
    ));
    assert!(matches!(
        app.gateway.authenticate(Some("Bearer not.a.jwt")).await,
        Err(ServiceError::InvalidToken)
    ));
}

#[tokio::test]
async fn gateway_resolves_bearer_to_live_account() {
    let app = test_app();
    app.accounts
        .create_account("alice", "secret1", "alice@example.com")
        .await
        .unwrap();
    let session = app.accounts.login("alice", "secret1").await.unwrap();

    let header = format!("Bearer {}", session.access_token);
    let account = app.gateway.authenticate(Some(&header)).await.unwrap();
    assert_eq!(account.profile.handle, "alice");
}

#[tokio::test]
async fn gateway_reads_current_state_not_the_token_snapshot() {
    let app = test_app();
    let alice = app
        .accounts
        .create_account("alice", "secret1", "alice@example.com")
        .await
        .unwrap();
    let bob = app
        .accounts
        .create_account("bob", "secret2", "bob@example.com")
        .await
        .unwrap();

    // The access token snapshot is taken before the follow mutation...
    let session = app.accounts.login("alice", "secret1").await.unwrap();
    app.graph.follow(alice.id, bob.id).await.unwrap();

    // ...yet authentication sees the current following-set.
    let header = format!("Bearer {}", session.access_token);
    let account = app.gateway.authenticate(Some(&header)).await.unwrap();
    assert_eq!(account.profile.following, vec![bob.id]);
}
