use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Handle to the observer channel. Cloned into the app state and handed to
/// the services that need to push updates; never reached through globals.
/// Sends are fire-and-forget with no delivery guarantee.
#[derive(Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<String>,
}

impl Broadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn notify(&self, event: &str, payload: &impl Serialize) {
        let message = match serde_json::to_string(&json!({ "event": event, "data": payload })) {
            Ok(m) => m,
            Err(e) => {
                debug!("Dropping broadcast, payload failed to serialize: {}", e);
                return;
            }
        };
        // No receivers connected is not an error.
        let _ = self.tx.send(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_without_observers_is_a_no_op() {
        let broadcaster = Broadcaster::new();
        broadcaster.notify("event-updated", &serde_json::json!({"ok": true}));
        assert_eq!(broadcaster.observer_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_message() {
        let broadcaster = Broadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.notify("event-updated", &serde_json::json!({"userId": "u1"}));

        for rx in [&mut first, &mut second] {
            let message = rx.try_recv().unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&message).unwrap();
            assert_eq!(parsed["event"], "event-updated");
            assert_eq!(parsed["data"]["userId"], "u1");
        }
    }
}
