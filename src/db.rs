use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::models::user::{self, NewUser};

/// Demo accounts created in staging. They share the admin password.
pub const STAGING_USERS: [(&str, &str); 4] = [
    ("alice", "Alice Andersen"),
    ("bob", "Bob Berg"),
    ("charlie", "Charlie Christensen"),
    ("diana", "Diana Dahl"),
];

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the admin account when the user collection is empty.
pub async fn seed_base(pool: &PgPool, admin_password_hash: &str) -> Result<(), sqlx::Error> {
    let count = user::count(pool).await?;
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping base seed");
        return Ok(());
    }

    user::create(
        pool,
        &NewUser {
            username: "admin".to_string(),
            password: admin_password_hash.to_string(),
            display_name: "Administrator".to_string(),
        },
    )
    .await?;
    log::info!("Base seed complete");
    Ok(())
}

/// Seed the admin account plus the demo users, so there is someone to invite.
pub async fn seed_staging(pool: &PgPool, password_hash: &str) -> Result<(), sqlx::Error> {
    seed_base(pool, password_hash).await?;

    if user::find_by_username(pool, STAGING_USERS[0].0).await?.is_some() {
        log::info!("Staging data already present, skipping");
        return Ok(());
    }

    for (username, display_name) in STAGING_USERS {
        let new = NewUser {
            username: username.to_string(),
            password: password_hash.to_string(),
            display_name: display_name.to_string(),
        };
        if let Err(e) = user::create(pool, &new).await {
            log::warn!("Seed staging: could not create '{username}': {e}");
        }
    }

    log::info!("Staging seed complete");
    Ok(())
}
