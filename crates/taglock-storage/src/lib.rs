//! Storage layer for the lock controller.
//!
//! This crate provides the durable blob facility and the whitelist
//! store built on top of it:
//!
//! - [`Database`] / [`DatabaseConfig`] - SQLite pool wrapper owning the
//!   single `blobs` table
//! - [`BlobStore`] - the durable key-value blob trait, with
//!   [`SqliteBlobStore`] (production) and [`MemoryBlobStore`] (tests,
//!   failure injection)
//! - [`Whitelist`] - the fixed-capacity authorized-tag set with toggle
//!   semantics and whole-array persistence
//!
//! # Persistence Model
//!
//! The whitelist is one flat blob: 128 little-endian u32 slots under a
//! fixed key, written in full after every mutation. The load path
//! tolerates virgin storage, truncates oversized blobs to capacity,
//! and records (rather than propagates) storage failures so the device
//! keeps operating on an empty in-memory set.
//!
//! Persistence is deliberately best-effort: a durable-write failure
//! after a successful in-memory toggle is reported to the caller but
//! the mutation is kept, so memory may run ahead of storage until the
//! next successful write.

pub mod blob;
pub mod connection;
pub mod error;
pub mod whitelist;

pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use whitelist::{Toggle, Whitelist};
