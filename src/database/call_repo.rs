use sqlx::SqlitePool;

use crate::models::CallRow;

const SQL_LATEST_CALL_NUMBER: &str = r#"
SELECT MAX(call_number)
FROM calls
WHERE event_id = ?1
  AND user_id = ?2
"#;

const SQL_INSERT_CALL: &str = r#"
INSERT INTO calls (
  event_id,
  user_id,
  call_number,
  status,
  description,
  call_time
) VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
"#;

const SQL_FIND_CALL: &str = r#"
SELECT
    event_id,
    user_id,
    call_number,
    status,
    description,
    call_time,
    created_at
FROM calls
WHERE event_id = ?1
  AND user_id = ?2
  AND call_number = ?3
LIMIT 1
"#;

pub async fn latest_call_number(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, Option<i64>>(SQL_LATEST_CALL_NUMBER)
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Append-only: rows are never updated or deleted. The composite primary key
/// rejects a duplicate call number for the same pair.
pub async fn insert_call(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    call_number: i64,
    status: &str,
    description: &str,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_CALL)
        .bind(event_id)
        .bind(user_id)
        .bind(call_number)
        .bind(status)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_call(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    call_number: i64,
) -> sqlx::Result<Option<CallRow>> {
    sqlx::query_as::<_, CallRow>(SQL_FIND_CALL)
        .bind(event_id)
        .bind(user_id)
        .bind(call_number)
        .fetch_optional(pool)
        .await
}
