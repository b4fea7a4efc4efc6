pub mod event;
pub mod ws;
