use sqlx::SqlitePool;

use crate::models::EventRow;

const SQL_LOAD_EVENT: &str = r#"
SELECT
    event_id,
    name,
    place,
    area_id,
    event_date,
    start_time,
    end_time,
    is_active
FROM events
WHERE event_id = ?1
LIMIT 1
"#;

pub async fn load_event_by_id(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LOAD_EVENT)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}
