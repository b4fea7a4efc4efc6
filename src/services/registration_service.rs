use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::{self, attendance_repo, directory_repo, event_repo};
use crate::error::ApiError;
use crate::models::AttendanceRow;
use crate::services::time_slot;

/// Register one person to an event. The record starts as PENDING with the
/// requested check-in slot, or the auto-resolved slot when none was given.
/// No broadcast happens on plain registration.
pub async fn register_attendee(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    requested_slot: Option<&str>,
) -> Result<AttendanceRow, ApiError> {
    let event = event_repo::load_event_by_id(pool, event_id)
        .await?
        .filter(|e| e.is_active == 1)
        .ok_or_else(|| ApiError::NotFound("Event not found or inactive".into()))?;

    directory_repo::find_person_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if attendance_repo::find_attendee(pool, event_id, user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "User already registered for this event".into(),
        ));
    }

    let slot = resolve_slot(requested_slot);
    if let Err(e) = attendance_repo::insert_attendee(pool, &event.event_id, user_id, &slot).await {
        // Lost a race with a concurrent registration for the same pair.
        if database::is_unique_violation(&e) {
            return Err(ApiError::Conflict(
                "User already registered for this event".into(),
            ));
        }
        return Err(e.into());
    }

    attendance_repo::find_attendee(pool, event_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Internal(sqlx::Error::RowNotFound))
}

fn resolve_slot(requested: Option<&str>) -> String {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slot) => slot.to_string(),
        None => time_slot::auto_time_slot(),
    }
}

/// One row of a bulk registration upload. File parsing happens upstream; the
/// rows arrive already structured. `timeSloat` keeps the field name the
/// existing upload sheets use.
#[derive(Debug, Deserialize)]
pub struct BulkRegistrationRow {
    pub email: Option<String>,
    pub contact: Option<String>,
    #[serde(rename = "timeSloat")]
    pub time_sloat: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRegistrationSummary {
    pub total_rows: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<BulkRowError>,
}

/// Each row is handled independently: a person that cannot be resolved or is
/// already registered is skipped, only a malformed row counts as an error.
/// One bad row never fails the batch.
pub async fn register_bulk(
    pool: &SqlitePool,
    event_id: &str,
    rows: Vec<BulkRegistrationRow>,
) -> Result<BulkRegistrationSummary, ApiError> {
    event_repo::load_event_by_id(pool, event_id)
        .await?
        .filter(|e| e.is_active == 1)
        .ok_or_else(|| ApiError::NotFound("Event not found or inactive".into()))?;

    let mut summary = BulkRegistrationSummary {
        total_rows: rows.len(),
        inserted: 0,
        skipped: 0,
        errors: Vec::new(),
    };

    for (idx, row) in rows.iter().enumerate() {
        let lookup = row
            .contact
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| row.email.as_deref().map(str::trim).filter(|s| !s.is_empty()));

        let Some(lookup) = lookup else {
            summary.errors.push(BulkRowError {
                row: idx + 1,
                message: "Missing email or contact".into(),
            });
            continue;
        };

        let Some(person) = directory_repo::find_person_by_contact_or_email(pool, lookup).await?
        else {
            summary.skipped += 1;
            continue;
        };

        if attendance_repo::find_attendee(pool, event_id, &person.user_id)
            .await?
            .is_some()
        {
            summary.skipped += 1;
            continue;
        }

        let slot = resolve_slot(row.time_sloat.as_deref());
        match attendance_repo::insert_attendee(pool, event_id, &person.user_id, &slot).await {
            Ok(()) => summary.inserted += 1,
            Err(e) if database::is_unique_violation(&e) => {
                warn!(
                    "Bulk row {} raced an existing registration for user {}",
                    idx + 1,
                    person.user_id
                );
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        seed_event, seed_person, seed_person_contactable, setup_pool,
    };

    #[tokio::test]
    async fn registration_defaults_blank_slot_to_auto_slot() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let user_id = seed_person(&pool, "Asha", "area-1").await;

        let row = register_attendee(&pool, &event_id, &user_id, Some("   "))
            .await
            .unwrap();

        assert_eq!(row.status, "PENDING");
        assert_eq!(row.check_in_time, time_slot::auto_time_slot());
        assert_eq!(row.rejected_reason, "");
    }

    #[tokio::test]
    async fn registration_keeps_explicit_slot() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let user_id = seed_person(&pool, "Asha", "area-1").await;

        let row = register_attendee(&pool, &event_id, &user_id, Some("2 PM - 3 PM"))
            .await
            .unwrap();

        assert_eq!(row.check_in_time, "2 PM - 3 PM");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts_and_keeps_one_record() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let user_id = seed_person(&pool, "Asha", "area-1").await;

        register_attendee(&pool, &event_id, &user_id, None)
            .await
            .unwrap();
        let second = register_attendee(&pool, &event_id, &user_id, None).await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM event_attendees WHERE event_id = ?1 AND user_id = ?2",
        )
        .bind(&event_id)
        .bind(&user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn inactive_event_is_not_found() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", false).await;
        let user_id = seed_person(&pool, "Asha", "area-1").await;

        let res = register_attendee(&pool, &event_id, &user_id, None).await;
        assert!(matches!(res, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn unknown_person_is_not_found() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;

        let res = register_attendee(&pool, &event_id, "nobody", None).await;
        assert!(matches!(res, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn bulk_rows_are_bucketed_independently() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let fresh = seed_person_contactable(
            &pool,
            "Asha",
            "area-1",
            Some("asha@example.org"),
            None,
        )
        .await;
        let registered = seed_person_contactable(
            &pool,
            "Bilal",
            "area-1",
            None,
            Some("5550001"),
        )
        .await;
        register_attendee(&pool, &event_id, &registered, None)
            .await
            .unwrap();

        let rows = vec![
            BulkRegistrationRow {
                email: Some("asha@example.org".into()),
                contact: None,
                time_sloat: Some("10 AM - 11 AM".into()),
            },
            BulkRegistrationRow {
                email: None,
                contact: Some("5550001".into()),
                time_sloat: None,
            },
            BulkRegistrationRow {
                email: Some("unknown@example.org".into()),
                contact: None,
                time_sloat: None,
            },
            BulkRegistrationRow {
                email: None,
                contact: None,
                time_sloat: None,
            },
        ];

        let summary = register_bulk(&pool, &event_id, rows).await.unwrap();
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 4);

        let row = attendance_repo::find_attendee(&pool, &event_id, &fresh)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.check_in_time, "10 AM - 11 AM");
    }

    #[tokio::test]
    async fn bulk_against_inactive_event_is_not_found() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", false).await;

        let res = register_bulk(&pool, &event_id, Vec::new()).await;
        assert!(matches!(res, Err(ApiError::NotFound(_))));
    }
}
