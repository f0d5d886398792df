//! Mock door actuator recording open pulses.

use crate::error::Result;
use crate::traits::DoorActuator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock door for observing authorization decisions in tests.
///
/// # Examples
///
/// ```
/// use taglock_hardware::mock::MockDoor;
/// use taglock_hardware::traits::DoorActuator;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> taglock_hardware::Result<()> {
///     let (door, handle) = MockDoor::new();
///
///     door.open().await?;
///     assert_eq!(handle.pulse_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDoor {
    pulses: Arc<AtomicUsize>,
}

impl MockDoor {
    /// Create a mock door and its observer handle.
    pub fn new() -> (Self, MockDoorHandle) {
        let pulses = Arc::new(AtomicUsize::new(0));
        (
            Self {
                pulses: Arc::clone(&pulses),
            },
            MockDoorHandle { pulses },
        )
    }
}

impl DoorActuator for MockDoor {
    async fn open(&self) -> Result<()> {
        self.pulses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Observer handle for a [`MockDoor`].
#[derive(Debug, Clone)]
pub struct MockDoorHandle {
    pulses: Arc<AtomicUsize>,
}

impl MockDoorHandle {
    /// Number of open pulses issued so far.
    #[must_use]
    pub fn pulse_count(&self) -> usize {
        self.pulses.load(Ordering::SeqCst)
    }
}
