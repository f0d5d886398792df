//! Hardware abstraction layer for the lock controller.
//!
//! This crate defines the trait seams between the tag-ingest pipeline
//! and physical devices (reader serial link, clock, door relay, manual
//! button), plus real and mock implementations of each.

pub mod clock;
pub mod door;
pub mod error;
pub mod mock;
pub mod serial;
pub mod traits;

pub use clock::SystemClock;
pub use door::{LogSwitch, RelayDoor};
pub use error::{HardwareError, Result};
pub use serial::SerialByteSource;
pub use traits::{ButtonInput, ByteSource, Clock, DoorActuator, OutputSwitch};
