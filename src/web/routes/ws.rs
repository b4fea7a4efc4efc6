use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| observer_loop(socket, state))
}

/// Forwards every broadcast to the connected observer until it goes away.
/// Observers only listen; inbound frames are ignored.
async fn observer_loop(mut socket: WebSocket, state: AppState) {
    let mut rx = state.broadcaster.subscribe();
    debug!(
        "Observer connected ({} online)",
        state.broadcaster.observer_count()
    );

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(message) => {
                    if socket.send(Message::Text(message)).await.is_err() {
                        break;
                    }
                }
                // A slow observer drops the missed updates and keeps going.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(_)) => continue,
                _ => break,
            },
        }
    }

    debug!("Observer disconnected");
}
