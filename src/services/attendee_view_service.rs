use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::{attendance_repo, directory_repo, event_repo};
use crate::error::ApiError;
use crate::models::{AttendeeViewRow, UnregisteredPersonRow};

/// Flattened attendee row as served to callers and pushed to observers.
/// Field names mirror what the existing frontend consumes, including the
/// inherited `timeSloat` spelling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub blood_group: String,
    pub role: String,
    pub referred_by: String,
    pub status: String,
    pub rejected_reason: String,
    #[serde(rename = "timeSloat")]
    pub time_sloat: String,
    pub total_call_made: i64,
    pub last_call_feedback: String,
    pub last_call_time: Option<String>,
    pub call_status: Option<String>,
}

fn build_view(row: AttendeeViewRow) -> AttendeeView {
    AttendeeView {
        id: row.user_id,
        name: row.name,
        email: row.email.unwrap_or_default(),
        contact: row.contact.unwrap_or_default(),
        blood_group: row.blood_group.unwrap_or_default(),
        role: row.role.unwrap_or_default(),
        referred_by: row.referral_display,
        status: row.status,
        rejected_reason: row.rejected_reason,
        time_sloat: row.check_in_time,
        total_call_made: row.total_calls,
        last_call_feedback: row.last_call_feedback.unwrap_or_default(),
        last_call_time: row.last_call_time,
        call_status: row.last_call_status,
    }
}

/// Attendees whose person record no longer resolves are dropped by the join,
/// not reported as errors.
pub async fn list_attendees_for_event(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Vec<AttendeeView>, ApiError> {
    let rows = attendance_repo::list_attendee_views(pool, event_id).await?;
    Ok(rows.into_iter().map(build_view).collect())
}

pub async fn load_attendee_view(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> Result<Option<AttendeeView>, ApiError> {
    let row = attendance_repo::load_attendee_view(pool, event_id, user_id).await?;
    Ok(row.map(build_view))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisteredPersonView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub blood_group: String,
}

pub async fn list_unregistered_for_event(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Vec<UnregisteredPersonView>, ApiError> {
    let event = event_repo::load_event_by_id(pool, event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    let rows =
        directory_repo::list_unregistered_in_area(pool, event_id, event.area_id.as_deref()).await?;
    Ok(rows.into_iter().map(build_unregistered_view).collect())
}

fn build_unregistered_view(row: UnregisteredPersonRow) -> UnregisteredPersonView {
    UnregisteredPersonView {
        id: row.user_id,
        name: row.name,
        email: row.email.unwrap_or_default(),
        contact: row.contact.unwrap_or_default(),
        blood_group: row.blood_group.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::registration_service::register_attendee;
    use crate::services::test_support::{seed_event, seed_person, set_referral, setup_pool};

    #[tokio::test]
    async fn registered_view_resolves_referral_to_person_name() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let referrer = seed_person(&pool, "Bilal", "area-1").await;
        let donor = seed_person(&pool, "Asha", "area-1").await;
        set_referral(&pool, &donor, "USER", Some(&referrer)).await;
        register_attendee(&pool, &event_id, &donor, None)
            .await
            .unwrap();

        let views = list_attendees_for_event(&pool, &event_id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "Asha");
        assert_eq!(views[0].referred_by, "Bilal");
    }

    #[tokio::test]
    async fn missing_referral_target_falls_back_to_type_tag() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let donor = seed_person(&pool, "Asha", "area-1").await;
        set_referral(&pool, &donor, "USER", Some("gone-user")).await;
        register_attendee(&pool, &event_id, &donor, None)
            .await
            .unwrap();

        let views = list_attendees_for_event(&pool, &event_id).await.unwrap();
        assert_eq!(views[0].referred_by, "USER");
    }

    #[tokio::test]
    async fn direct_referral_shows_the_type_tag() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let donor = seed_person(&pool, "Asha", "area-1").await;
        register_attendee(&pool, &event_id, &donor, None)
            .await
            .unwrap();

        let views = list_attendees_for_event(&pool, &event_id).await.unwrap();
        assert_eq!(views[0].referred_by, "DIRECT");
    }

    #[tokio::test]
    async fn unresolvable_person_is_silently_excluded() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let donor = seed_person(&pool, "Asha", "area-1").await;
        register_attendee(&pool, &event_id, &donor, None)
            .await
            .unwrap();

        // Orphan attendance row with no directory entry behind it.
        sqlx::query(
            "INSERT INTO event_attendees (event_id, user_id, status, check_in_time)
             VALUES (?1, 'ghost', 'PENDING', '9 AM - 10 AM')",
        )
        .bind(&event_id)
        .execute(&pool)
        .await
        .unwrap();

        let views = list_attendees_for_event(&pool, &event_id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, donor);
    }

    #[tokio::test]
    async fn unregistered_view_is_area_scoped_set_difference() {
        let pool = setup_pool().await;
        let event_id = seed_event(&pool, "area-1", true).await;
        let registered = seed_person(&pool, "Asha", "area-1").await;
        let eligible = seed_person(&pool, "Bilal", "area-1").await;
        let _other_area = seed_person(&pool, "Chitra", "area-2").await;
        register_attendee(&pool, &event_id, &registered, None)
            .await
            .unwrap();

        let views = list_unregistered_for_event(&pool, &event_id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, eligible);
    }

    #[tokio::test]
    async fn unregistered_view_for_missing_event_is_not_found() {
        let pool = setup_pool().await;
        let res = list_unregistered_for_event(&pool, "no-such-event").await;
        assert!(matches!(res, Err(ApiError::NotFound(_))));
    }
}
