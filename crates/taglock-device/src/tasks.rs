//! Long-running device tasks.
//!
//! Each task is an unbounded loop over one blocking input: the scan
//! loop over the reader, the button loop over the manual release. Both
//! are plain async functions over trait-bounded instances constructed
//! in `main` — no hidden statics. Malformed input and storage failures
//! stay local to an iteration; only device-level failures (a
//! disconnected byte source or button) end a loop.

use std::sync::Arc;
use std::time::Duration;

use taglock_bridge::{EventTransport, Reporter};
use taglock_hardware::traits::{ButtonInput, ByteSource, Clock, DoorActuator};
use taglock_rfid::{TagDecoder, TagRead};
use taglock_storage::{BlobStore, Whitelist};
use tracing::{info, warn};

/// Scan loop: decode tags and actuate the door for authorized ones.
///
/// Denials and grants are reported on the outbound channels; a door
/// actuation failure is reported and the loop keeps scanning. The
/// whitelist search and any concurrent remote toggle serialize on the
/// store lock — the decision is made on whatever slot state the lock
/// snapshot shows.
///
/// # Errors
///
/// Returns only when the byte source fails at the device level
/// (disconnection); decode-level conditions never end the loop.
pub async fn run_scan_loop<S, C, B, D, T>(
    mut decoder: TagDecoder<S, C>,
    whitelist: Arc<Whitelist<B>>,
    door: Arc<D>,
    reporter: Arc<Reporter<T>>,
) -> taglock_hardware::Result<()>
where
    S: ByteSource,
    C: Clock,
    B: BlobStore,
    D: DoorActuator,
    T: EventTransport,
{
    loop {
        match decoder.decode().await? {
            TagRead::Tag(tag) => {
                if let Some(index) = whitelist.search(tag).await {
                    info!(%tag, index, "access granted, opening door");
                    if let Err(e) = door.open().await {
                        warn!(%tag, error = %e, "door actuation failed");
                    }
                    reporter.granted(tag).await;
                } else {
                    info!(%tag, "access denied");
                    reporter.denied(tag).await;
                }
            }
            TagRead::Invalid | TagRead::Suppressed => {}
        }
    }
}

/// Manual release loop: open the door on button presses.
///
/// After each open the loop sleeps one re-scan delay (the debounce
/// idle window) before accepting the next press, pacing repeated
/// presses the same way the decoder paces repeated reads.
///
/// # Errors
///
/// Returns only when the button input fails at the device level.
pub async fn run_button_loop<I, C, D, T>(
    mut button: I,
    door: Arc<D>,
    reporter: Arc<Reporter<T>>,
    clock: C,
    rescan_delay: Duration,
) -> taglock_hardware::Result<()>
where
    I: ButtonInput,
    C: Clock,
    D: DoorActuator,
    T: EventTransport,
{
    loop {
        button.wait_pressed().await?;
        info!("manual button open");
        if let Err(e) = door.open().await {
            warn!(error = %e, "door actuation failed");
        }
        reporter.button().await;
        clock.sleep(rescan_delay).await;
    }
}
