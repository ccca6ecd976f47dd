use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Message ids seen recently. Messenger redelivers a webhook call when it does
/// not get a timely acknowledgement.
pub struct DeliveryLog {
    ttl: Duration,
    seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl DeliveryLog {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Records `message_id` and returns whether it was new.
    pub async fn first_delivery(&self, message_id: &str) -> bool {
        self.first_delivery_at(message_id, Utc::now()).await
    }

    async fn first_delivery_at(&self, message_id: &str, now: DateTime<Utc>) -> bool {
        let mut seen = self.seen.lock().await;

        seen.retain(|_, expiry| *expiry > now);

        if seen.contains_key(message_id) {
            return false;
        }

        seen.insert(message_id.into(), now + self.ttl);

        true
    }
}

#[test]
fn repeated_ids_are_duplicates() {
    use tokio_test::block_on;

    let log = DeliveryLog::new(Duration::minutes(10));

    assert!(block_on(log.first_delivery("mid.1")));
    assert!(!block_on(log.first_delivery("mid.1")));
    assert!(block_on(log.first_delivery("mid.2")));
}

#[test]
fn ids_expire_after_ttl() {
    use tokio_test::block_on;

    let log = DeliveryLog::new(Duration::minutes(10));
    let now = Utc::now();

    assert!(block_on(log.first_delivery_at("mid.1", now)));
    assert!(!block_on(log.first_delivery_at("mid.1", now + Duration::minutes(9))));
    assert!(block_on(log.first_delivery_at("mid.1", now + Duration::minutes(11))));
}
