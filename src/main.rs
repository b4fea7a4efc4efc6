use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use blooddrive::web::broadcast::Broadcaster;
use blooddrive::web::middleware::auth as auth_middleware;
use blooddrive::web::routes::{event, ws};
use blooddrive::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database and bring the schema up to date
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:blooddrive.db".to_string());
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Could not connect to the database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Could not run migrations");

    let state = AppState {
        pool,
        broadcaster: Broadcaster::new(),
    };

    // 3. Protected routes under one middleware layer
    let protected_routes = Router::new()
        .route("/event/:id/registerUser", post(event::register_user_handler))
        .route(
            "/event/:id/register-bulk",
            post(event::register_bulk_handler),
        )
        .route(
            "/event/:id/userStatus/:user_id",
            post(event::update_attendee_status_handler),
        )
        .route("/event/:id/user", get(event::list_attendees_handler))
        .route(
            "/event/:id/user/unregister",
            get(event::list_unregistered_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_auth));

    // 4. Assemble the application
    let app = Router::new()
        // Public routes
        .route("/health", get(|| async { "ok" }))
        .route("/ws", get(ws::ws_handler))
        // Protected routes
        .merge(protected_routes)
        // Layers
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        // State
        .with_state(state);

    // 5. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Could not parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Could not parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Could not bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Server running at http://{}", bound_addr);

    axum::serve(listener, app).await.expect("Server error");
}
