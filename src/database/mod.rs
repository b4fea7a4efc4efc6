pub mod attendance_repo;
pub mod call_repo;
pub mod directory_repo;
pub mod event_repo;

/// Unique-key violations are how the store reports registration and
/// call-number races; callers translate them to `Conflict` or retry.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
