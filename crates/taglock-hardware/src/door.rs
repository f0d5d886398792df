//! Relay-driven door actuator.
//!
//! The lock is opened by asserting a relay output for a fixed short
//! pulse and deasserting it. A mutex serializes pulses so concurrent
//! open requests queue rather than overlap.

use crate::error::Result;
use crate::traits::{Clock, DoorActuator, OutputSwitch};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Door actuator pulsing an [`OutputSwitch`] for a fixed duration.
///
/// # Examples
///
/// ```
/// use taglock_hardware::door::RelayDoor;
/// use taglock_hardware::clock::SystemClock;
/// use taglock_hardware::mock::MockSwitch;
/// use taglock_hardware::traits::DoorActuator;
/// use std::time::Duration;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> taglock_hardware::Result<()> {
///     let (switch, handle) = MockSwitch::new();
///     let door = RelayDoor::new(switch, SystemClock::new(), Duration::from_millis(1));
///
///     door.open().await?;
///     assert_eq!(handle.transitions(), vec![true, false]);
///     Ok(())
/// }
/// ```
pub struct RelayDoor<S, C> {
    switch: Mutex<S>,
    clock: C,
    pulse: Duration,
}

impl<S: OutputSwitch, C: Clock> RelayDoor<S, C> {
    /// Create a door actuator over `switch` with the given pulse width.
    pub fn new(switch: S, clock: C, pulse: Duration) -> Self {
        Self {
            switch: Mutex::new(switch),
            clock,
            pulse,
        }
    }
}

impl<S: OutputSwitch, C: Clock> DoorActuator for RelayDoor<S, C> {
    async fn open(&self) -> Result<()> {
        // Lock held across the whole pulse: a second caller waits for
        // the deassert instead of stretching the pulse.
        let mut switch = self.switch.lock().await;
        switch.set(true)?;
        self.clock.sleep(self.pulse).await;
        let result = switch.set(false);
        debug!(pulse_ms = self.pulse.as_millis() as u64, "door pulsed");
        result
    }
}

/// Output switch that surfaces line levels in the structured log.
///
/// Stands in at the GPIO boundary when no platform relay driver is
/// wired up; real deployments implement [`OutputSwitch`] over their
/// GPIO facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSwitch;

impl OutputSwitch for LogSwitch {
    fn set(&mut self, on: bool) -> Result<()> {
        debug!(level = on as u8, "lock output set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClock, MockSwitch};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_pulses_high_then_low() {
        let (switch, handle) = MockSwitch::new();
        let door = RelayDoor::new(switch, MockClock::new(), Duration::from_millis(100));

        door.open().await.unwrap();

        assert_eq!(handle.transitions(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_concurrent_opens_queue() {
        let (switch, handle) = MockSwitch::new();
        let door = Arc::new(RelayDoor::new(
            switch,
            MockClock::new(),
            Duration::from_millis(100),
        ));

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let door = Arc::clone(&door);
                tokio::spawn(async move { door.open().await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // Pulses never overlap: strict high/low alternation.
        assert_eq!(handle.transitions(), vec![true, false, true, false, true, false]);
    }
}
