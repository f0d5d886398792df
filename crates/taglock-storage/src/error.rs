use thiserror::Error;

/// Storage-specific error types for the whitelist store.
///
/// These errors represent failures of the durable blob backing and the
/// fixed-capacity bound of the whitelist. None of them are fatal to the
/// process: callers report them and keep operating, accepting that the
/// in-memory whitelist and its durable copy may diverge until the next
/// successful mutation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Durable storage could not be opened or read
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Whitelist has no free slot for a new tag
    #[error("Whitelist full: all {capacity} slots occupied")]
    CapacityExceeded { capacity: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
