use sqlx::PgPool;

use super::types::{NewUser, User, UserOption};

const SELECT_USER: &str = "\
    SELECT e.id, e.name AS username, e.label AS display_name, \
           COALESCE(p_pw.value, '') AS password \
    FROM entities e \
    LEFT JOIN entity_properties p_pw \
        ON e.id = p_pw.entity_id AND p_pw.key = 'password' \
    WHERE e.entity_type = 'user' AND e.is_active = true";

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} AND e.name = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} AND e.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every active user except `current_user_id`, labelled with the display
/// name (falling back to the username) and sorted by label.
pub async fn find_others(pool: &PgPool, current_user_id: i64) -> Result<Vec<UserOption>, sqlx::Error> {
    sqlx::query_as::<_, UserOption>(
        "SELECT e.id, e.name AS username, \
                CASE WHEN e.label = '' THEN e.name ELSE e.label END AS label \
         FROM entities e \
         WHERE e.entity_type = 'user' AND e.is_active = true AND e.id <> $1 \
         ORDER BY label, e.id",
    )
    .bind(current_user_id)
    .fetch_all(pool)
    .await
}

/// Resolve a set of ids to active users, dropping any that don't exist.
pub async fn find_existing_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM entities \
         WHERE entity_type = 'user' AND is_active = true AND id = ANY($1) \
         ORDER BY id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM entities WHERE entity_type = 'user'")
        .fetch_one(pool)
        .await
}

/// Insert the user entity and its password property in one transaction.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO entities (entity_type, name, label) VALUES ('user', $1, $2) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.display_name)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, 'password', $2)")
        .bind(id)
        .bind(&new.password)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(id)
}
