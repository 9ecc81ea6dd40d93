use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

pub mod topics;

/// Minimal event envelope (RFC3339 time).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Envelope {
    pub time: String,
    pub kind: String,
    pub payload: Value,
}

impl Envelope {
    /// Convenience accessor for integer payload fields.
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.payload.get(key).and_then(|v| v.as_u64())
    }
}

/// A simple broadcast bus for JSON-serializable events.
///
/// Publishing never blocks and never fails: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct Bus {
    tx: broadcast::Sender<Envelope>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }

    pub fn publish<T: Serialize>(&self, kind: &str, payload: &T) {
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let val =
            serde_json::to_value(payload).unwrap_or_else(|_| serde_json::json!({"_ser":"error"}));
        tracing::trace!(target: "idfill.events", kind, "publish");
        let _ = self.tx.send(Envelope {
            time: now,
            kind: kind.to_string(),
            payload: val,
        });
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_receive_published_envelopes() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(topics::TOPIC_IMPORT_PROGRESS, &json!({"pct": 40}));
        let env = rx.recv().await.expect("envelope");
        assert_eq!(env.kind, "import.progress");
        assert_eq!(env.u64_field("pct"), Some(40));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = Bus::default();
        bus.publish(topics::TOPIC_IMPORT_STARTED, &json!({}));
    }
}
