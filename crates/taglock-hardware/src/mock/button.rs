//! Mock manual release button.

use crate::error::{HardwareError, Result};
use crate::traits::ButtonInput;
use tokio::sync::mpsc;

/// Mock button driven programmatically from tests.
///
/// # Examples
///
/// ```
/// use taglock_hardware::mock::MockButton;
/// use taglock_hardware::traits::ButtonInput;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> taglock_hardware::Result<()> {
///     let (mut button, handle) = MockButton::new();
///
///     handle.press().await;
///     button.wait_pressed().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockButton {
    press_rx: mpsc::Receiver<()>,
}

impl MockButton {
    /// Create a mock button and its pressing handle.
    pub fn new() -> (Self, MockButtonHandle) {
        let (press_tx, press_rx) = mpsc::channel(32);
        (Self { press_rx }, MockButtonHandle { press_tx })
    }
}

impl ButtonInput for MockButton {
    async fn wait_pressed(&mut self) -> Result<()> {
        self.press_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("mock button closed"))
    }
}

/// Controller handle for a [`MockButton`].
#[derive(Debug, Clone)]
pub struct MockButtonHandle {
    press_tx: mpsc::Sender<()>,
}

impl MockButtonHandle {
    /// Simulate a button press.
    ///
    /// # Panics
    ///
    /// Panics if the button half has been dropped.
    pub async fn press(&self) {
        self.press_tx.send(()).await.expect("mock button dropped");
    }
}
