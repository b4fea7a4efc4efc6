pub mod attendance_service;
pub mod attendee_view_service;
pub mod registration_service;
pub mod time_slot;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use uuid::Uuid;

    pub async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub async fn seed_event(pool: &SqlitePool, area_id: &str, is_active: bool) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO events (event_id, name, place, area_id, event_date, start_time, end_time, is_active)
             VALUES (?1, 'Community Drive', 'Town Hall', ?2, '2026-09-01', '09:00', '17:00', ?3)",
        )
        .bind(&id)
        .bind(area_id)
        .bind(is_active as i64)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    pub async fn seed_person(pool: &SqlitePool, name: &str, area_id: &str) -> String {
        let email = format!("{}@example.org", Uuid::new_v4());
        seed_person_contactable(pool, name, area_id, Some(&email), None).await
    }

    pub async fn seed_person_contactable(
        pool: &SqlitePool,
        name: &str,
        area_id: &str,
        email: Option<&str>,
        contact: Option<&str>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO persons (user_id, name, email, contact, blood_group, role, area_id, referral_type, referred_by, is_active)
             VALUES (?1, ?2, ?3, ?4, 'O+', 'DONOR', ?5, 'DIRECT', NULL, 1)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(contact)
        .bind(area_id)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    pub async fn set_referral(
        pool: &SqlitePool,
        user_id: &str,
        referral_type: &str,
        referred_by: Option<&str>,
    ) {
        sqlx::query("UPDATE persons SET referral_type = ?2, referred_by = ?3 WHERE user_id = ?1")
            .bind(user_id)
            .bind(referral_type)
            .bind(referred_by)
            .execute(pool)
            .await
            .unwrap();
    }
}
