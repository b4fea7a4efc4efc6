use sqlx::SqlitePool;

use crate::models::{PersonRow, UnregisteredPersonRow};

const SQL_FIND_PERSON_BY_ID: &str = r#"
SELECT
    user_id,
    name,
    email,
    contact,
    blood_group,
    role,
    area_id,
    referral_type,
    referred_by,
    is_active
FROM persons
WHERE user_id = ?1
LIMIT 1
"#;

const SQL_FIND_PERSON_BY_CONTACT_OR_EMAIL: &str = r#"
SELECT
    user_id,
    name,
    email,
    contact,
    blood_group,
    role,
    area_id,
    referral_type,
    referred_by,
    is_active
FROM persons
WHERE (contact = ?1 OR email = ?1)
  AND is_active = 1
LIMIT 1
"#;

const SQL_LIST_UNREGISTERED_IN_AREA: &str = r#"
SELECT
    p.user_id,
    p.name,
    p.email,
    p.contact,
    p.blood_group
FROM persons p
WHERE p.is_active = 1
  AND p.area_id = ?2
  AND p.user_id NOT IN (
      SELECT a.user_id FROM event_attendees a WHERE a.event_id = ?1
  )
ORDER BY p.name
"#;

pub async fn find_person_by_id(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<PersonRow>> {
    sqlx::query_as::<_, PersonRow>(SQL_FIND_PERSON_BY_ID)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_person_by_contact_or_email(
    pool: &SqlitePool,
    value: &str,
) -> sqlx::Result<Option<PersonRow>> {
    sqlx::query_as::<_, PersonRow>(SQL_FIND_PERSON_BY_CONTACT_OR_EMAIL)
        .bind(value)
        .fetch_optional(pool)
        .await
}

/// Active persons in the event's area with no attendance record for it.
/// An event without an area matches nobody.
pub async fn list_unregistered_in_area(
    pool: &SqlitePool,
    event_id: &str,
    area_id: Option<&str>,
) -> sqlx::Result<Vec<UnregisteredPersonRow>> {
    sqlx::query_as::<_, UnregisteredPersonRow>(SQL_LIST_UNREGISTERED_IN_AREA)
        .bind(event_id)
        .bind(area_id)
        .fetch_all(pool)
        .await
}
