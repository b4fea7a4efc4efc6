use serde::Serialize;

/// Ledger states for an attendee. `CALL_MADE` is deliberately not here: it is
/// a request discriminator that routes to the call log, never a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeStatus {
    Pending,
    Donated,
    Rejected,
    Cancelled,
}

impl AttendeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeStatus::Pending => "PENDING",
            AttendeeStatus::Donated => "DONATED",
            AttendeeStatus::Rejected => "REJECTED",
            AttendeeStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(AttendeeStatus::Pending),
            "DONATED" => Some(AttendeeStatus::Donated),
            "REJECTED" => Some(AttendeeStatus::Rejected),
            "CANCELLED" => Some(AttendeeStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRow {
    pub event_id: String,
    pub user_id: String,
    pub status: String,
    pub rejected_reason: String,
    pub check_in_time: String,
    pub created_at: String,
    pub updated_at: String,
}
