//! Device wiring for the lock controller.
//!
//! Combines the decoder, whitelist, bridge, and hardware seams into
//! the running device: configuration, the scan loop, and the manual
//! button loop. The `taglockd` binary constructs every instance at
//! startup and hands each task its own references — the instances
//! outlive every task using them.

pub mod config;
pub mod tasks;

pub use config::DeviceConfig;
pub use tasks::{run_button_loop, run_scan_loop};
