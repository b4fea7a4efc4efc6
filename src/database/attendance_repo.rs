use sqlx::SqlitePool;

use crate::models::{AttendanceRow, AttendeeViewRow};

const SQL_INSERT_ATTENDEE: &str = r#"
INSERT INTO event_attendees (
  event_id,
  user_id,
  status,
  check_in_time
) VALUES (?1, ?2, 'PENDING', ?3)
"#;

const SQL_FIND_ATTENDEE: &str = r#"
SELECT
    event_id,
    user_id,
    status,
    rejected_reason,
    check_in_time,
    created_at,
    updated_at
FROM event_attendees
WHERE event_id = ?1
  AND user_id = ?2
LIMIT 1
"#;

const SQL_UPDATE_STATUS: &str = r#"
UPDATE event_attendees
SET status = ?3,
    rejected_reason = ?4,
    check_in_time = COALESCE(?5, check_in_time),
    updated_at = datetime('now')
WHERE event_id = ?1
  AND user_id = ?2
"#;

const SQL_UPDATE_CHECK_IN_TIME: &str = r#"
UPDATE event_attendees
SET check_in_time = ?3,
    updated_at = datetime('now')
WHERE event_id = ?1
  AND user_id = ?2
"#;

// Inner join on persons drops attendees whose directory entry is gone; the
// left join on the referrer falls back to the referral type tag.
const SQL_ATTENDEE_VIEW: &str = r#"
SELECT
    a.event_id,
    a.user_id,
    p.name,
    p.email,
    p.contact,
    p.blood_group,
    p.role,
    COALESCE(ref.name, p.referral_type) AS referral_display,
    a.status,
    a.rejected_reason,
    a.check_in_time,
    (SELECT COUNT(*)
       FROM calls c
      WHERE c.event_id = a.event_id AND c.user_id = a.user_id) AS total_calls,
    (SELECT c.description
       FROM calls c
      WHERE c.event_id = a.event_id AND c.user_id = a.user_id
      ORDER BY c.call_number DESC LIMIT 1) AS last_call_feedback,
    (SELECT c.call_time
       FROM calls c
      WHERE c.event_id = a.event_id AND c.user_id = a.user_id
      ORDER BY c.call_number DESC LIMIT 1) AS last_call_time,
    (SELECT c.status
       FROM calls c
      WHERE c.event_id = a.event_id AND c.user_id = a.user_id
      ORDER BY c.call_number DESC LIMIT 1) AS last_call_status
FROM event_attendees a
JOIN persons p ON p.user_id = a.user_id
LEFT JOIN persons ref ON ref.user_id = p.referred_by
WHERE a.event_id = ?1
"#;

const SQL_ATTENDEE_VIEW_ORDER: &str = r#"
ORDER BY a.created_at, a.user_id
"#;

const SQL_ATTENDEE_VIEW_ONE: &str = r#"
  AND a.user_id = ?2
LIMIT 1
"#;

pub async fn insert_attendee(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    check_in_time: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_ATTENDEE)
        .bind(event_id)
        .bind(user_id)
        .bind(check_in_time)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_attendee(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> sqlx::Result<Option<AttendanceRow>> {
    sqlx::query_as::<_, AttendanceRow>(SQL_FIND_ATTENDEE)
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns the number of rows touched; 0 means no such attendee.
pub async fn update_status(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    status: &str,
    rejected_reason: &str,
    check_in_time: Option<&str>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_STATUS)
        .bind(event_id)
        .bind(user_id)
        .bind(status)
        .bind(rejected_reason)
        .bind(check_in_time)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_check_in_time(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    check_in_time: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_CHECK_IN_TIME)
        .bind(event_id)
        .bind(user_id)
        .bind(check_in_time)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_attendee_views(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<AttendeeViewRow>> {
    let sql = format!("{}{}", SQL_ATTENDEE_VIEW, SQL_ATTENDEE_VIEW_ORDER);
    sqlx::query_as::<_, AttendeeViewRow>(&sql)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn load_attendee_view(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> sqlx::Result<Option<AttendeeViewRow>> {
    let sql = format!("{}{}", SQL_ATTENDEE_VIEW, SQL_ATTENDEE_VIEW_ONE);
    sqlx::query_as::<_, AttendeeViewRow>(&sql)
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
