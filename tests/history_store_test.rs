// ABOUTME: Integration tests for the SQLite chat history store
// ABOUTME: Covers ordering, UTF-8 round trips, atomic seeding, durability, and store failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chat_relay_server::{
    config::DatabaseUrl,
    database::{ChatTurn, Database},
    errors::ErrorKind,
    llm::MessageRole,
};
use tempfile::TempDir;

// ============================================================================
// Reads and appends
// ============================================================================

#[tokio::test]
async fn test_unknown_user_has_empty_history() {
    let database = common::create_test_database().await.unwrap();
    let history = database.history();

    assert!(history.read_all("nobody").await.unwrap().is_empty());
    assert_eq!(history.count("nobody").await.unwrap(), 0);
}

#[tokio::test]
async fn test_turns_come_back_in_insertion_order() {
    let database = common::create_test_database().await.unwrap();
    let history = database.history();

    let turns = [
        (MessageRole::System, "You are a helpful assistant."),
        (MessageRole::User, "héllo wörld ✨"),
        (MessageRole::Assistant, "こんにちは\nsecond line"),
        (MessageRole::User, ""),
        (MessageRole::Assistant, "  padded  "),
    ];
    for (role, content) in turns {
        history.append("u1", role, content).await.unwrap();
    }

    let stored = history.read_all("u1").await.unwrap();
    let expected: Vec<ChatTurn> = turns
        .iter()
        .map(|(role, content)| ChatTurn::new(*role, *content))
        .collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let database = common::create_test_database().await.unwrap();
    let history = database.history();

    history.append("alice", MessageRole::User, "a1").await.unwrap();
    history.append("bob", MessageRole::User, "b1").await.unwrap();
    history.append("alice", MessageRole::User, "a2").await.unwrap();

    let alice: Vec<String> = history
        .read_all("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(alice, vec!["a1", "a2"]);
    assert_eq!(history.count("bob").await.unwrap(), 1);
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn test_seed_only_inserts_into_empty_conversation() {
    let database = common::create_test_database().await.unwrap();
    let history = database.history();

    assert!(history.seed_if_empty("u1", "seed").await.unwrap());
    assert!(!history.seed_if_empty("u1", "seed").await.unwrap());

    let stored = history.read_all("u1").await.unwrap();
    assert_eq!(stored, vec![ChatTurn::new(MessageRole::System, "seed")]);

    history.append("u2", MessageRole::User, "already here").await.unwrap();
    assert!(!history.seed_if_empty("u2", "seed").await.unwrap());
    assert_eq!(history.count("u2").await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_seeds_insert_once() {
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("seed.db"),
    };
    let database = Database::new(&url).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let history = database.history();
        handles.push(tokio::spawn(async move {
            history.seed_if_empty("racer", "seed").await.unwrap()
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(database.history().count("racer").await.unwrap(), 1);
    database.close().await;
}

// ============================================================================
// Durability and schema
// ============================================================================

#[tokio::test]
async fn test_history_survives_reopen_and_migration_is_idempotent() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested.db"),
    };

    let database = Database::new(&url).await.unwrap();
    database
        .history()
        .append("u1", MessageRole::User, "persist me")
        .await
        .unwrap();
    database.migrate().await.unwrap();
    database.close().await;

    let reopened = Database::new(&url).await.unwrap();
    reopened.migrate().await.unwrap();
    let stored = reopened.history().read_all("u1").await.unwrap();
    assert_eq!(stored, vec![ChatTurn::new(MessageRole::User, "persist me")]);
    reopened.close().await;
}

#[tokio::test]
async fn test_closed_store_reports_storage_error() {
    let database = common::create_test_database().await.unwrap();
    let history = database.history();
    database.close().await;

    let err = history
        .append("u1", MessageRole::User, "lost")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    let err = history.read_all("u1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    assert!(database.health_check().await.is_err());
}

#[tokio::test]
async fn test_corrupt_role_is_storage_error() {
    let database = common::create_test_database().await.unwrap();
    sqlx::query("INSERT INTO chat_history (user_id, role, content) VALUES ('u1', 'tool', 'x')")
        .execute(database.pool())
        .await
        .unwrap();

    let err = database.history().read_all("u1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}
