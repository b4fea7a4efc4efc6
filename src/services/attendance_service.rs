use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::{self, attendance_repo, call_repo};
use crate::error::ApiError;
use crate::models::{AttendeeStatus, CallOutcome, CallRow};
use crate::services::attendee_view_service::{self, AttendeeView};
use crate::web::broadcast::Broadcaster;

/// The wire body of `POST /event/{id}/userStatus/{userId}`. One endpoint
/// carries both status changes and call logging, discriminated by `status`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendeeBody {
    pub status: Option<String>,
    pub description: Option<String>,
    pub rejection_reason: Option<String>,
    pub time_slot: Option<String>,
    pub call_status: Option<String>,
}

/// Validated update, dispatched by variant instead of by string comparison.
/// `CALL_MADE` routes to the call log and never touches the ledger status.
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceUpdate {
    StatusChange {
        status: AttendeeStatus,
        time_slot: Option<String>,
        rejection_reason: Option<String>,
    },
    CallLogged {
        outcome: CallOutcome,
        description: Option<String>,
        time_slot: Option<String>,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AttendanceUpdate {
    /// All field validation happens here, before any write is issued.
    pub fn from_request(body: UpdateAttendeeBody) -> Result<Self, ApiError> {
        let status = non_blank(body.status)
            .ok_or_else(|| ApiError::InvalidArgument("Status is required".into()))?;

        if status == "CALL_MADE" {
            let raw = non_blank(body.call_status)
                .ok_or_else(|| ApiError::InvalidArgument("Call status is required".into()))?;
            let outcome = CallOutcome::parse(&raw)
                .ok_or_else(|| ApiError::InvalidArgument("Invalid call status".into()))?;
            let time_slot = non_blank(body.time_slot);
            let description = non_blank(body.description);
            if outcome == CallOutcome::Answered && time_slot.is_none() && description.is_none() {
                return Err(ApiError::InvalidArgument(
                    "Description is required if time slot is not provided for answered calls"
                        .into(),
                ));
            }
            return Ok(AttendanceUpdate::CallLogged {
                outcome,
                description,
                time_slot,
            });
        }

        let status = AttendeeStatus::parse(&status)
            .ok_or_else(|| ApiError::InvalidArgument("Invalid status".into()))?;
        let time_slot = non_blank(body.time_slot);
        if matches!(status, AttendeeStatus::Donated | AttendeeStatus::Rejected)
            && time_slot.is_none()
        {
            return Err(ApiError::InvalidArgument("Time slot is required".into()));
        }
        let rejection_reason = non_blank(body.rejection_reason);
        if status == AttendeeStatus::Rejected && rejection_reason.is_none() {
            return Err(ApiError::InvalidArgument(
                "Rejection reason is required".into(),
            ));
        }

        Ok(AttendanceUpdate::StatusChange {
            status,
            time_slot,
            rejection_reason,
        })
    }
}

pub struct UpdateOutcome {
    pub attendee: AttendeeView,
    pub call: Option<CallRow>,
    pub message: String,
}

/// Apply one validated update, then push the refreshed attendee view to every
/// connected observer. The write is authoritative; the broadcast is
/// best-effort and carries no delivery guarantee.
pub async fn update_attendee(
    pool: &SqlitePool,
    broadcaster: &Broadcaster,
    event_id: &str,
    user_id: &str,
    update: AttendanceUpdate,
) -> Result<UpdateOutcome, ApiError> {
    let (call, message) = match update {
        AttendanceUpdate::StatusChange {
            status,
            time_slot,
            rejection_reason,
        } => {
            // The reason only survives on REJECTED; every other status
            // clears it.
            let reason = if status == AttendeeStatus::Rejected {
                rejection_reason.unwrap_or_default()
            } else {
                String::new()
            };
            let affected = attendance_repo::update_status(
                pool,
                event_id,
                user_id,
                status.as_str(),
                &reason,
                time_slot.as_deref(),
            )
            .await?;
            if affected == 0 {
                return Err(ApiError::NotFound("Attendee not found".into()));
            }
            let message = if status == AttendeeStatus::Rejected {
                "User rejected successfully".to_string()
            } else {
                format!("User marked as {}", status.as_str())
            };
            (None, message)
        }
        AttendanceUpdate::CallLogged {
            outcome,
            description,
            time_slot,
        } => {
            if attendance_repo::find_attendee(pool, event_id, user_id)
                .await?
                .is_none()
            {
                return Err(ApiError::NotFound("Attendee not found".into()));
            }
            let call = append_call(pool, event_id, user_id, outcome, description.as_deref()).await?;
            if let Some(slot) = time_slot.as_deref() {
                attendance_repo::update_check_in_time(pool, event_id, user_id, slot).await?;
            }
            (Some(call), "Call logged successfully".to_string())
        }
    };

    let attendee = attendee_view_service::load_attendee_view(pool, event_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendee not found".into()))?;
    broadcaster.notify("event-updated", &attendee);

    Ok(UpdateOutcome {
        attendee,
        call,
        message,
    })
}

/// Next call number is 1 + the latest for the pair. A concurrent submission
/// can take the number first; the composite key rejects the duplicate and we
/// recompute once before surfacing `Conflict`.
async fn append_call(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
    outcome: CallOutcome,
    description: Option<&str>,
) -> Result<CallRow, ApiError> {
    let description = if outcome == CallOutcome::Answered {
        description.unwrap_or("")
    } else {
        ""
    };

    let mut retried = false;
    loop {
        let latest = call_repo::latest_call_number(pool, event_id, user_id).await?;
        let number = latest.unwrap_or(0) + 1;
        match call_repo::insert_call(pool, event_id, user_id, number, outcome.as_str(), description)
            .await
        {
            Ok(()) => {
                return call_repo::find_call(pool, event_id, user_id, number)
                    .await?
                    .ok_or_else(|| ApiError::Internal(sqlx::Error::RowNotFound));
            }
            Err(e) if database::is_unique_violation(&e) => {
                if retried {
                    return Err(ApiError::Conflict(
                        "Concurrent call submissions for this attendee".into(),
                    ));
                }
                warn!(
                    "Call number {} for event {} user {} was taken, recomputing",
                    number, event_id, user_id
                );
                retried = true;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
