//! Shared test infrastructure.
//!
//! Database-backed tests run under `#[sqlx::test(migrations = "./migrations")]`,
//! which hands each test a fresh Postgres database with the schema applied.
//! These helpers seed users and build an application config.

#![allow(dead_code)]

use sqlx::PgPool;

use rendezvous::auth::password;
use rendezvous::config::AppConfig;
use rendezvous::models::user::{self, NewUser};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_PASSWORD: &str = "password123";

// ============================================================================
// SEEDING
// ============================================================================

/// Create a user with `TEST_PASSWORD`. Returns the new user's id.
pub async fn insert_user(pool: &PgPool, username: &str, display_name: &str) -> i64 {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    user::create(
        pool,
        &NewUser {
            username: username.to_string(),
            password: hash,
            display_name: display_name.to_string(),
        },
    )
    .await
    .expect("Failed to create user")
}

/// alice, bob and charlie. Returns their ids in that order.
pub async fn seed_three_users(pool: &PgPool) -> (i64, i64, i64) {
    let alice = insert_user(pool, "alice", "Alice Andersen").await;
    let bob = insert_user(pool, "bob", "Bob Berg").await;
    let charlie = insert_user(pool, "charlie", "Charlie Christensen").await;
    (alice, bob, charlie)
}

// ============================================================================
// CONFIG
// ============================================================================

/// Config for in-process apps. The database URL is unused: tests pass the
/// pool from `#[sqlx::test]` directly.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
        "SESSION_KEY" => Some("s".repeat(64)),
        "APP_NAME" => Some("Rendezvous Test".to_string()),
        _ => None,
    })
    .expect("test config is valid")
}
