pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod web;

use sqlx::SqlitePool;

use crate::web::broadcast::Broadcaster;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub broadcaster: Broadcaster,
}
