//! Integration tests for MySqlUserDirectory.
//!
//! Run against a MySQL testcontainer; requires Docker.

mod common;

use common::TestDatabase;
use rolodex_core::{Email, NewUser, RolodexError, UserId};
use rolodex_repository::{MySqlUserDirectory, UserDirectory};

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: Email::new_unchecked(email),
        password_hash: "hashed_password_123".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_find() {
    let db = TestDatabase::new().await;
    let directory = MySqlUserDirectory::new(db.pool());

    let created = directory
        .create(new_user("alice", "alice@example.com"), None)
        .await
        .expect("Failed to create user");
    assert_eq!(created.username, "alice");
    assert!(!created.confirmed);
    assert!(created.avatar.is_none());

    let by_id = directory
        .find_by_id(created.id)
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(by_id.email.as_str(), "alice@example.com");
    assert_eq!(by_id.password_hash, "hashed_password_123");

    let by_email = directory
        .find_by_email(&Email::new_unchecked("alice@example.com"))
        .await
        .expect("Query failed");
    assert_eq!(by_email.map(|u| u.id), Some(created.id));

    assert!(directory
        .find_by_id(UserId::new(999_999))
        .await
        .expect("Query failed")
        .is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_username_lookup_is_case_sensitive() {
    let db = TestDatabase::new().await;
    let directory = MySqlUserDirectory::new(db.pool());

    directory
        .create(new_user("alice", "alice@example.com"), None)
        .await
        .expect("Failed to create user");

    assert!(directory.find_by_username("alice").await.unwrap().is_some());
    assert!(directory.find_by_username("ALICE").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let directory = MySqlUserDirectory::new(db.pool());

    directory
        .create(new_user("alice", "alice@example.com"), None)
        .await
        .expect("Failed to create user");

    let result = directory
        .create(new_user("alice2", "alice@example.com"), None)
        .await;
    assert!(matches!(result, Err(RolodexError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_confirm_email_and_update_avatar() {
    let db = TestDatabase::new().await;
    let directory = MySqlUserDirectory::new(db.pool());

    let user = directory
        .create(new_user("alice", "alice@example.com"), None)
        .await
        .expect("Failed to create user");

    directory
        .confirm_email(&user.email)
        .await
        .expect("Failed to confirm");
    directory
        .confirm_email(&user.email)
        .await
        .expect("Second confirm failed");

    let mut stored = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.confirmed);

    stored.password_hash = String::new();
    stored.set_avatar("https://img.example.com/alice.png");
    directory.update(&stored).await.expect("Failed to update");

    let reloaded = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.avatar.as_deref(), Some("https://img.example.com/alice.png"));
    assert_eq!(reloaded.password_hash, "hashed_password_123");
    assert!(reloaded.confirmed);
}
