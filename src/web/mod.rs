pub mod broadcast;
pub mod middleware;
pub mod routes;
