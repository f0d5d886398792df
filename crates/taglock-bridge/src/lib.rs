//! Remote management bridge and outbound reporting.
//!
//! This crate carries both directions of the device's messaging
//! boundary without owning the messaging client itself:
//!
//! - **Inbound**: a depth-1 hand-off queue from the management channel
//!   to the whitelist mutation task ([`command_queue`],
//!   [`run_consumer`]). Non-blocking producer, drop-on-full, blocking
//!   consumer — at most one remote command is ever pending.
//! - **Outbound**: fire-and-forget event reporting on fixed topics
//!   ([`Reporter`], [`EventTransport`]), serialized through an
//!   exclusive publisher lock.

pub mod command;
pub mod report;

pub use command::{CommandReceiver, CommandSender, command_queue, run_consumer};
pub use report::{EventTransport, LogTransport, MockTransport, Reporter};
