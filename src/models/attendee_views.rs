/// Flattened per-attendee row joining the ledger with the person directory
/// and the call log. `referral_display` is the referring person's name when
/// the reference resolves, otherwise the referral type tag.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendeeViewRow {
    pub event_id: String,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub blood_group: Option<String>,
    pub role: Option<String>,
    pub referral_display: String,
    pub status: String,
    pub rejected_reason: String,
    pub check_in_time: String,
    pub total_calls: i64,
    pub last_call_feedback: Option<String>,
    pub last_call_time: Option<String>,
    pub last_call_status: Option<String>,
}
