use serde_json::Value;
use sqlx::PgPool;

/// A row of the audit trail, as shown on the dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub summary: String,
    pub created_at: String,
}

/// Append an entry to the audit trail. `details` should carry a `summary`
/// string, which is what the dashboard displays.
pub async fn log(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5::JSONB)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

/// Like `log`, but a failure is only reported, never returned.
pub async fn log_quietly(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) {
    if let Err(e) = log(pool, user_id, action, target_type, target_id, details).await {
        log::warn!("Audit write failed for {action} on {target_type} {target_id}: {e}");
    }
}

/// The user's most recent audit entries, newest first.
pub async fn find_recent_for_user(pool: &PgPool, user_id: i64, limit: i64) -> Result<Vec<AuditEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditEntry>(
        "SELECT id, action, target_type, target_id, \
                COALESCE(details->>'summary', action) AS summary, \
                TO_CHAR(created_at, 'YYYY-MM-DD HH24:MI') AS created_at \
         FROM audit_log \
         WHERE user_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
