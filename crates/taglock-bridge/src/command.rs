//! Remote management command hand-off.
//!
//! A one-item-deep queue carries tag toggle commands from the inbound
//! messaging client to the dedicated consumer task. The producer side
//! never blocks: if a command is already pending, the new one is
//! dropped — at most one pending command is buffered, by design, since
//! the consumer drains promptly. The consumer side blocks indefinitely
//! and is the sole external writer path into the whitelist.

use std::sync::Arc;

use taglock_core::TagId;
use taglock_storage::{BlobStore, Toggle, Whitelist};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Create the command hand-off queue.
///
/// # Examples
///
/// ```
/// use taglock_bridge::command_queue;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let (sender, mut receiver) = command_queue();
///
///     assert!(sender.submit("42"));
///     let tag = receiver.recv().await.unwrap();
///     assert_eq!(tag.as_u32(), 42);
/// }
/// ```
#[must_use]
pub fn command_queue() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Producer half of the hand-off, held by the messaging client glue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<TagId>,
}

impl CommandSender {
    /// Parse an inbound payload and enqueue it without blocking.
    ///
    /// The payload is the ASCII decimal tag value as entered on the
    /// management side. Returns `true` if the command was queued;
    /// unparseable payloads are rejected with a warning and a full
    /// queue drops the command silently (at-most-one-pending policy).
    pub fn submit(&self, payload: &str) -> bool {
        let tag: TagId = match payload.parse() {
            Ok(tag) => tag,
            Err(e) => {
                warn!(payload, error = %e, "rejected unparseable toggle command");
                return false;
            }
        };

        match self.tx.try_send(tag) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(tag)) => {
                debug!(%tag, "command queue full, dropping toggle");
                false
            }
            Err(mpsc::error::TrySendError::Closed(tag)) => {
                warn!(%tag, "command consumer gone, dropping toggle");
                false
            }
        }
    }
}

/// Consumer half of the hand-off, owned by the whitelist mutation task.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::Receiver<TagId>,
}

impl CommandReceiver {
    /// Block until the next queued tag arrives.
    ///
    /// Returns `None` once every sender has been dropped.
    pub async fn recv(&mut self) -> Option<TagId> {
        self.rx.recv().await
    }
}

/// Consumer task body: apply queued toggle commands to the whitelist.
///
/// Commands are applied in arrival order; the store lock serializes
/// them against local-scan searches. Storage failures are reported and
/// the loop keeps running — a failed persist leaves the in-memory
/// toggle in place per the store's best-effort persistence contract.
/// The loop exits when every sender has been dropped.
pub async fn run_consumer<B: BlobStore>(mut receiver: CommandReceiver, whitelist: Arc<Whitelist<B>>) {
    while let Some(tag) = receiver.recv().await {
        match whitelist.toggle(tag).await {
            Ok(Toggle::Added(index)) => info!(%tag, index, "remote command authorized tag"),
            Ok(Toggle::Removed(index)) => info!(%tag, index, "remote command deauthorized tag"),
            Err(e) => warn!(%tag, error = %e, "remote toggle failed"),
        }
    }
    debug!("command queue closed, consumer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use taglock_storage::MemoryBlobStore;

    #[tokio::test]
    async fn test_submit_parses_decimal_payload() {
        let (sender, mut receiver) = command_queue();

        assert!(sender.submit(" 1234 "));
        assert_eq!(receiver.recv().await.unwrap().as_u32(), 1234);
    }

    #[tokio::test]
    async fn test_submit_rejects_garbage_and_zero() {
        let (sender, _receiver) = command_queue();

        assert!(!sender.submit("not a number"));
        assert!(!sender.submit(""));
        assert!(!sender.submit("0")); // reserved sentinel
        assert!(!sender.submit("-3"));
    }

    #[tokio::test]
    async fn test_queue_drops_when_full() {
        let (sender, mut receiver) = command_queue();

        assert!(sender.submit("1"));
        // One command pending, consumer has not drained: drop.
        assert!(!sender.submit("2"));

        assert_eq!(receiver.recv().await.unwrap().as_u32(), 1);

        // Drained: the queue accepts again.
        assert!(sender.submit("3"));
        assert_eq!(receiver.recv().await.unwrap().as_u32(), 3);
    }

    #[tokio::test]
    async fn test_consumer_applies_commands_in_order() {
        let (sender, receiver) = command_queue();
        let whitelist = Arc::new(Whitelist::load(MemoryBlobStore::new()).await);

        let consumer = tokio::spawn(run_consumer(receiver, Arc::clone(&whitelist)));

        // Toggle on, then off again; submissions paced by yielding so
        // the depth-1 queue never drops.
        for _ in 0..2 {
            while !sender.submit("42") {
                tokio::task::yield_now().await;
            }
        }

        drop(sender);
        consumer.await.unwrap();

        let tag = TagId::new(42).unwrap();
        assert!(whitelist.search(tag).await.is_none());
    }

    #[tokio::test]
    async fn test_consumer_survives_storage_failure() {
        let (sender, receiver) = command_queue();
        let store = MemoryBlobStore::new();
        let whitelist = Arc::new(Whitelist::load(store.clone()).await);

        let consumer = tokio::spawn(run_consumer(receiver, Arc::clone(&whitelist)));

        store.set_fail_writes(true);
        assert!(sender.submit("7"));

        drop(sender);
        consumer.await.unwrap();

        // Persist failed, but the in-memory toggle was applied and the
        // consumer exited cleanly rather than panicking.
        let tag = TagId::new(7).unwrap();
        assert!(whitelist.search(tag).await.is_some());
    }
}
