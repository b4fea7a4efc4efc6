#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonRow {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub blood_group: Option<String>,
    pub role: Option<String>,
    pub area_id: Option<String>,
    pub referral_type: String,
    pub referred_by: Option<String>,
    pub is_active: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnregisteredPersonRow {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub blood_group: Option<String>,
}
