use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::services::attendance_service::{self, AttendanceUpdate, UpdateAttendeeBody};
use crate::services::attendee_view_service;
use crate::services::registration_service::{self, BulkRegistrationRow};
use crate::web::middleware::auth::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    pub user_id: String,
    pub time: Option<String>,
}

pub async fn register_user_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<RegisterUserBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Invalid event or user ID".into()));
    }

    let attendee = registration_service::register_attendee(
        &state.pool,
        &event_id,
        &body.user_id,
        body.time.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "data": attendee,
        })),
    ))
}

pub async fn register_bulk_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
    Json(rows): Json<Vec<BulkRegistrationRow>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = registration_service::register_bulk(&state.pool, &event_id, rows).await?;

    Ok(Json(json!({
        "success": true,
        "totalRows": summary.total_rows,
        "inserted": summary.inserted,
        "skipped": summary.skipped,
        "errors": summary.errors,
    })))
}

pub async fn update_attendee_status_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path((event_id, user_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(body): Json<UpdateAttendeeBody>,
) -> Result<impl IntoResponse, ApiError> {
    let update = AttendanceUpdate::from_request(body)?;
    let outcome = attendance_service::update_attendee(
        &state.pool,
        &state.broadcaster,
        &event_id,
        &user_id,
        update,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": outcome.message,
        "attendee": outcome.attendee,
        "call": outcome.call,
    })))
}

pub async fn list_attendees_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let data = attendee_view_service::list_attendees_for_event(&state.pool, &event_id).await?;

    Ok(Json(json!({
        "success": true,
        "total": data.len(),
        "data": data,
    })))
}

pub async fn list_unregistered_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let data = attendee_view_service::list_unregistered_for_event(&state.pool, &event_id).await?;

    Ok(Json(json!({
        "success": true,
        "total": data.len(),
        "data": data,
    })))
}
