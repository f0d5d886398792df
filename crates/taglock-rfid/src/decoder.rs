use std::time::Duration;

use taglock_core::TagId;
use taglock_core::constants::{DEFAULT_IDLE_WINDOW_MS, SCAN_WINDOW};
use taglock_hardware::error::Result;
use taglock_hardware::traits::{ByteSource, Clock};
use taglock_protocol::scan_window;
use tracing::{debug, trace};

/// Outcome of one decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRead {
    /// A validated tag identifier, accepted past the debounce window.
    Tag(TagId),

    /// No parseable record in the window, checksum mismatch, or the
    /// reserved zero identifier. Discard and resync; never fatal.
    Invalid,

    /// A valid record inside the idle window of the previous accepted
    /// read. Not an error condition; the byte source has been drained.
    Suppressed,
}

/// Debouncing frame decoder over a blocking byte source.
///
/// Owns its scratch window and debounce timestamp exclusively; no
/// other task reads or writes them. `decode` blocks without timeout —
/// the reader has no tag-present signal, so the owning task is
/// expected to be single-purpose and wait indefinitely.
///
/// # Examples
///
/// ```
/// use taglock_hardware::mock::{MockByteSource, MockClock};
/// use taglock_protocol::encode_record;
/// use taglock_rfid::{TagDecoder, TagRead};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> taglock_hardware::Result<()> {
///     let (source, handle) = MockByteSource::new();
///     let mut decoder = TagDecoder::new(source, MockClock::new());
///
///     let mut window = vec![0u8; 64];
///     window[..14].copy_from_slice(&encode_record(0x0A, 42));
///     handle.feed(window).await;
///
///     match decoder.decode().await? {
///         TagRead::Tag(id) => assert_eq!(id.as_u32(), 42),
///         other => panic!("expected tag, got {other:?}"),
///     }
///     Ok(())
/// }
/// ```
pub struct TagDecoder<S, C> {
    source: S,
    clock: C,
    idle_window: Duration,
    last_accepted: Option<Duration>,
    window: [u8; SCAN_WINDOW],
}

impl<S: ByteSource, C: Clock> TagDecoder<S, C> {
    /// Create a decoder with the default idle window.
    pub fn new(source: S, clock: C) -> Self {
        Self::with_idle_window(source, clock, Duration::from_millis(DEFAULT_IDLE_WINDOW_MS))
    }

    /// Create a decoder with an explicit idle window.
    pub fn with_idle_window(source: S, clock: C, idle_window: Duration) -> Self {
        Self {
            source,
            clock,
            idle_window,
            last_accepted: None,
            window: [0u8; SCAN_WINDOW],
        }
    }

    /// The configured debounce idle window.
    #[must_use]
    pub fn idle_window(&self) -> Duration {
        self.idle_window
    }

    /// Read one scan window and decode it.
    ///
    /// Blocks until the byte source fills the window. Malformed or
    /// ambiguous input degrades to [`TagRead::Invalid`]; a valid read
    /// inside the idle window yields [`TagRead::Suppressed`] and drains
    /// the byte source so stale buffered records are not reprocessed.
    ///
    /// # Errors
    ///
    /// Returns an error only for byte-source failures (disconnection,
    /// link errors), never for malformed frames.
    pub async fn decode(&mut self) -> Result<TagRead> {
        self.source.read_exact(&mut self.window).await?;

        let raw = match scan_window(&self.window) {
            Ok(raw) => raw,
            Err(e) => {
                trace!(error = %e, "discarding unparseable window");
                return Ok(TagRead::Invalid);
            }
        };

        let Ok(id) = TagId::new(raw) else {
            trace!("discarding reserved zero tag");
            return Ok(TagRead::Invalid);
        };

        let now = self.clock.now();
        if let Some(last) = self.last_accepted
            && now < last + self.idle_window
        {
            debug!(%id, "read suppressed inside idle window");
            self.source.flush().await?;
            return Ok(TagRead::Suppressed);
        }

        self.last_accepted = Some(now);
        debug!(%id, "tag decoded");
        Ok(TagRead::Tag(id))
    }
}
