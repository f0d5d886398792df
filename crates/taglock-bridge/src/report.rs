//! Outbound event reporting.
//!
//! Tag events fan out to fixed-name channels on a messaging transport:
//! authorized, denied, and manual-button open. Publishing is
//! fire-and-forget and serialized through an exclusive publisher lock
//! so interleaved tasks never corrupt an in-flight publish.

#![allow(async_fn_in_trait)]

use taglock_core::TagId;
use taglock_core::constants::{BUTTON_PAYLOAD, TOPIC_AUTHORIZED, TOPIC_BUTTON, TOPIC_DENIED};
use tokio::sync::Mutex;
use tracing::info;

/// Transport boundary to the external messaging client.
///
/// Fire-and-forget: delivery failures are the transport's concern and
/// never propagate back into the scan loop.
pub trait EventTransport: Send + Sync {
    /// Publish `payload` on `topic`.
    async fn publish(&self, topic: &str, payload: &str);
}

/// Serialized event reporter over a transport.
///
/// # Examples
///
/// ```
/// use taglock_bridge::report::{MockTransport, Reporter};
/// use taglock_core::TagId;
/// use taglock_core::constants::TOPIC_AUTHORIZED;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let transport = MockTransport::new();
///     let reporter = Reporter::new(transport.clone());
///
///     reporter.granted(TagId::new(42).unwrap()).await;
///
///     let events = transport.events();
///     assert_eq!(events, vec![(TOPIC_AUTHORIZED.to_string(), "42".to_string())]);
/// }
/// ```
pub struct Reporter<T> {
    transport: T,
    publish_lock: Mutex<()>,
}

impl<T: EventTransport> Reporter<T> {
    /// Create a reporter over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            publish_lock: Mutex::new(()),
        }
    }

    /// Report an authorized tag read.
    pub async fn granted(&self, tag: TagId) {
        self.publish(TOPIC_AUTHORIZED, &tag.to_string()).await;
    }

    /// Report a denied tag read.
    pub async fn denied(&self, tag: TagId) {
        self.publish(TOPIC_DENIED, &tag.to_string()).await;
    }

    /// Report a manual button-triggered open.
    pub async fn button(&self) {
        self.publish(TOPIC_BUTTON, BUTTON_PAYLOAD).await;
    }

    async fn publish(&self, topic: &str, payload: &str) {
        let _guard = self.publish_lock.lock().await;
        self.transport.publish(topic, payload).await;
    }
}

/// Default transport: events surface in the structured log only.
///
/// Stands in at the messaging-client boundary when no broker session
/// is wired up.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl EventTransport for LogTransport {
    async fn publish(&self, topic: &str, payload: &str) {
        info!(topic, payload, "event published");
    }
}

/// Recording transport for tests.
///
/// Clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    events: std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>,
}

impl MockTransport {
    /// Create an empty recording transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All published (topic, payload) pairs in order.
    #[must_use]
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().expect("event log poisoned").clone()
    }
}

impl EventTransport for MockTransport {
    async fn publish(&self, topic: &str, payload: &str) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push((topic.to_string(), payload.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reporter_topics_and_payloads() {
        let transport = MockTransport::new();
        let reporter = Reporter::new(transport.clone());

        reporter.granted(TagId::new(42).unwrap()).await;
        reporter.denied(TagId::new(7).unwrap()).await;
        reporter.button().await;

        assert_eq!(
            transport.events(),
            vec![
                (TOPIC_AUTHORIZED.to_string(), "42".to_string()),
                (TOPIC_DENIED.to_string(), "7".to_string()),
                (TOPIC_BUTTON.to_string(), BUTTON_PAYLOAD.to_string()),
            ]
        );
    }
}
