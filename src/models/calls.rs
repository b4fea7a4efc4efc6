use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Answered,
    NotConnected,
    NotAnswered,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Answered => "ANSWERED",
            CallOutcome::NotConnected => "NOT_CONNECTED",
            CallOutcome::NotAnswered => "NOT_ANSWERED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ANSWERED" => Some(CallOutcome::Answered),
            "NOT_CONNECTED" => Some(CallOutcome::NotConnected),
            "NOT_ANSWERED" => Some(CallOutcome::NotAnswered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CallRow {
    pub event_id: String,
    pub user_id: String,
    pub call_number: i64,
    pub status: String,
    pub description: String,
    pub call_time: String,
    pub created_at: String,
}
