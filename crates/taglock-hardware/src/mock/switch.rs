//! Mock output switch recording level transitions.

use crate::error::Result;
use crate::traits::OutputSwitch;
use std::sync::{Arc, Mutex};

/// Mock relay output for testing pulse shapes.
#[derive(Debug)]
pub struct MockSwitch {
    transitions: Arc<Mutex<Vec<bool>>>,
}

impl MockSwitch {
    /// Create a mock switch and its observer handle.
    pub fn new() -> (Self, MockSwitchHandle) {
        let transitions = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                transitions: Arc::clone(&transitions),
            },
            MockSwitchHandle { transitions },
        )
    }
}

impl OutputSwitch for MockSwitch {
    fn set(&mut self, on: bool) -> Result<()> {
        self.transitions.lock().expect("switch log poisoned").push(on);
        Ok(())
    }
}

/// Observer handle for a [`MockSwitch`].
#[derive(Debug, Clone)]
pub struct MockSwitchHandle {
    transitions: Arc<Mutex<Vec<bool>>>,
}

impl MockSwitchHandle {
    /// All level transitions in order.
    #[must_use]
    pub fn transitions(&self) -> Vec<bool> {
        self.transitions.lock().expect("switch log poisoned").clone()
    }
}
