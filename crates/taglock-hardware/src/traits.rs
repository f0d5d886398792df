//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the peripherals of the lock
//! controller: the reader's serial byte stream, the monotonic clock the
//! decoder debounces against, the door actuator, and the manual release
//! button. The traits establish the seam between the ingest pipeline
//! and physical devices, enabling substitution between mock and real
//! hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use std::time::Duration;

/// Raw byte stream from the reader's serial link.
///
/// The reader has no tag-present signal, so reads are inherently
/// blocking with no timeout; the owning task is single-purpose and is
/// expected to wait indefinitely.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods
/// return `impl Future` (Edition 2024 RPITIT). Use generic type
/// parameters instead of `Box<dyn ByteSource>`:
///
/// ```no_run
/// use taglock_hardware::traits::ByteSource;
/// use taglock_hardware::error::Result;
///
/// async fn fill_window<S: ByteSource>(source: &mut S) -> Result<[u8; 64]> {
///     let mut window = [0u8; 64];
///     source.read_exact(&mut window).await?;
///     Ok(window)
/// }
/// ```
pub trait ByteSource: Send {
    /// Fill `buf` completely with bytes from the link.
    ///
    /// Blocks (suspending only the calling task) until the buffer is
    /// full. There is no timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a link-level
    /// error occurs.
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discard any buffered-but-unread bytes.
    ///
    /// Used after a suppressed decode so stale records the reader
    /// transmitted during the idle window are not reprocessed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying driver rejects the operation.
    async fn flush(&mut self) -> Result<()>;
}

/// Injected monotonic time capability.
///
/// The decoder depends on a clock for its debounce window; it does not
/// need to be one. Mock implementations advance manually for
/// deterministic tests.
pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary fixed epoch.
    fn now(&self) -> Duration;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Boolean output line driving the lock relay.
///
/// Synchronous on purpose: setting a GPIO/relay line does not suspend.
pub trait OutputSwitch: Send {
    /// Drive the output high (`true`) or low (`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the output driver fails.
    fn set(&mut self, on: bool) -> Result<()>;
}

/// Door actuator consumed by the authorization decision.
///
/// `open` asserts the lock output for a fixed short duration and
/// deasserts it. Calls are serialized; concurrent callers queue rather
/// than overlap pulses.
pub trait DoorActuator: Send + Sync {
    /// Pulse the door open.
    ///
    /// # Errors
    ///
    /// Returns an error if the output driver fails mid-pulse.
    async fn open(&self) -> Result<()>;
}

/// Manual release button input.
pub trait ButtonInput: Send {
    /// Block until the button is pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input device is disconnected.
    async fn wait_pressed(&mut self) -> Result<()>;
}
