use sqlx::{PgPool, Postgres, Transaction};

use super::id::generate_meeting_id;
use super::types::*;

/// How many fresh ids to try before giving up on a collision.
const MAX_ID_ATTEMPTS: usize = 5;

/// Base SELECT for meeting documents: properties flattened into columns, the
/// creator resolved through `created_by`, and the invitee count.
const MEETING_SELECT: &str = "\
SELECT e.id, e.name AS meeting_id, e.label AS meeting_name, \
       COALESCE(p_type.value, '') AS meeting_type, \
       COALESCE(p_date.value, '') AS meeting_date, \
       COALESCE(NULLIF(p_max.value, ''), '0')::BIGINT AS max_users, \
       COALESCE(p_status.value, 'true') = 'true' AS status, \
       COALESCE(creator.id, 0) AS created_by, \
       COALESCE(NULLIF(creator.label, ''), creator.name, '') AS creator_name, \
       (SELECT COUNT(*) FROM relations r_inv \
        WHERE r_inv.source_id = e.id \
          AND r_inv.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'invites') \
       ) AS invited_count \
FROM entities e \
LEFT JOIN entity_properties p_type ON e.id = p_type.entity_id AND p_type.key = 'meeting_type' \
LEFT JOIN entity_properties p_date ON e.id = p_date.entity_id AND p_date.key = 'meeting_date' \
LEFT JOIN entity_properties p_max ON e.id = p_max.entity_id AND p_max.key = 'max_users' \
LEFT JOIN entity_properties p_status ON e.id = p_status.entity_id AND p_status.key = 'status' \
LEFT JOIN relations r_cb ON r_cb.source_id = e.id \
    AND r_cb.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'created_by') \
LEFT JOIN entities creator ON r_cb.target_id = creator.id \
WHERE e.entity_type = 'meeting'";

/// Write a meeting record: the entity, its properties, and the `created_by`
/// and `invites` relations, in one transaction.
///
/// If the requested `meeting_id` is already taken a new one is generated,
/// up to `MAX_ID_ATTEMPTS` times.
pub async fn create(pool: &PgPool, new: &NewMeeting) -> Result<CreatedMeeting, sqlx::Error> {
    let mut meeting_id = new.meeting_id.clone();
    let mut attempt = 1;

    loop {
        let mut tx = pool.begin().await?;
        match insert_meeting(&mut tx, new, &meeting_id).await {
            Ok(id) => {
                tx.commit().await?;
                return Ok(CreatedMeeting { id, meeting_id });
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() && attempt < MAX_ID_ATTEMPTS => {
                tx.rollback().await?;
                log::warn!("Meeting id '{meeting_id}' already in use, generating another");
                meeting_id = generate_meeting_id();
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn insert_meeting(
    tx: &mut Transaction<'_, Postgres>,
    new: &NewMeeting,
    meeting_id: &str,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO entities (entity_type, name, label) VALUES ('meeting', $1, $2) RETURNING id",
    )
    .bind(meeting_id)
    .bind(&new.meeting_name)
    .fetch_one(&mut **tx)
    .await?;

    let props = [
        ("meeting_type", new.meeting_type.as_str().to_string()),
        ("meeting_date", format_meeting_date(new.meeting_date)),
        ("max_users", new.max_users.to_string()),
        ("status", new.status.to_string()),
    ];
    for (key, value) in props {
        sqlx::query("INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(key)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }

    insert_relation(tx, "created_by", id, new.created_by).await?;
    for user_id in &new.invited_users {
        insert_relation(tx, "invites", id, *user_id).await?;
    }

    Ok(id)
}

async fn insert_relation(
    tx: &mut Transaction<'_, Postgres>,
    relation_type: &str,
    source_id: i64,
    target_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO relations (relation_type_id, source_id, target_id) \
         VALUES ((SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = $1), $2, $3) \
         ON CONFLICT DO NOTHING",
    )
    .bind(relation_type)
    .bind(source_id)
    .bind(target_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Look up a meeting by its public id, with its invitees.
pub async fn find_by_meeting_id(pool: &PgPool, meeting_id: &str) -> Result<Option<MeetingRecord>, sqlx::Error> {
    let found = sqlx::query_as::<_, MeetingListItem>(&format!("{MEETING_SELECT} AND e.name = $1"))
        .bind(meeting_id)
        .fetch_optional(pool)
        .await?;

    let Some(meeting) = found else {
        return Ok(None);
    };

    let invited_users = find_invitees(pool, meeting.id).await?;
    Ok(Some(MeetingRecord { meeting, invited_users }))
}

async fn find_invitees(pool: &PgPool, id: i64) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT r.target_id FROM relations r \
         WHERE r.source_id = $1 \
           AND r.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'invites') \
         ORDER BY r.target_id",
    )
    .bind(id)
    .fetch_all(pool)
    .await
}

/// Meetings created by the user, newest first.
pub async fn find_created_by(pool: &PgPool, user_id: i64) -> Result<Vec<MeetingListItem>, sqlx::Error> {
    sqlx::query_as::<_, MeetingListItem>(&format!("{MEETING_SELECT} AND creator.id = $1 ORDER BY e.id DESC"))
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Active meetings the user may join: those they are invited to, plus every
/// anyone-can-join meeting. Newest first.
pub async fn find_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<MeetingListItem>, sqlx::Error> {
    let sql = format!(
        "{MEETING_SELECT} \
         AND COALESCE(p_status.value, 'true') = 'true' \
         AND (p_type.value = 'anyone-can-join' \
              OR EXISTS (SELECT 1 FROM relations r_me \
                         WHERE r_me.source_id = e.id AND r_me.target_id = $1 \
                           AND r_me.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'invites'))) \
         ORDER BY e.id DESC"
    );
    sqlx::query_as::<_, MeetingListItem>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Set the active flag. Returns false when no meeting has that entity id.
pub async fn set_status(pool: &PgPool, id: i64, active: bool) -> Result<bool, sqlx::Error> {
    let touched = sqlx::query(
        "UPDATE entities SET updated_at = NOW() WHERE id = $1 AND entity_type = 'meeting'",
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if touched == 0 {
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, 'status', $2) \
         ON CONFLICT (entity_id, key) DO UPDATE SET value = EXCLUDED.value",
    )
    .bind(id)
    .bind(active.to_string())
    .execute(pool)
    .await?;

    Ok(true)
}
