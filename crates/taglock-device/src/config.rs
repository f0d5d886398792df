use serde::{Deserialize, Serialize};
use std::time::Duration;
use taglock_core::constants::{DEFAULT_IDLE_WINDOW_MS, DOOR_PULSE_MS, READER_BAUD_RATE};

/// Device configuration
///
/// # Example
///
/// ```
/// use taglock_device::config::DeviceConfig;
///
/// let config = DeviceConfig::default()
///     .serial_port("/dev/ttyUSB1")
///     .database_path("/var/lib/taglock/taglock.db");
///
/// assert_eq!(config.baud_rate, 9600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Serial port the reader is attached to
    pub serial_port: String,

    /// Reader link baud rate
    pub baud_rate: u32,

    /// Path to the SQLite database backing the whitelist
    pub database_path: String,

    /// Debounce idle window in milliseconds
    pub idle_window_ms: u64,

    /// Door actuation pulse width in milliseconds
    pub door_pulse_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: READER_BAUD_RATE,
            database_path: "taglock.db".to_string(),
            idle_window_ms: DEFAULT_IDLE_WINDOW_MS,
            door_pulse_ms: DOOR_PULSE_MS,
        }
    }
}

impl DeviceConfig {
    /// Set the reader serial port
    #[must_use]
    pub fn serial_port(mut self, port: impl Into<String>) -> Self {
        self.serial_port = port.into();
        self
    }

    /// Set the whitelist database path
    #[must_use]
    pub fn database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set the debounce idle window in milliseconds
    #[must_use]
    pub fn idle_window_ms(mut self, ms: u64) -> Self {
        self.idle_window_ms = ms;
        self
    }

    /// Build the configuration from defaults plus `TAGLOCK_*`
    /// environment overrides.
    ///
    /// Recognized variables: `TAGLOCK_SERIAL_PORT`, `TAGLOCK_BAUD_RATE`,
    /// `TAGLOCK_DATABASE`, `TAGLOCK_IDLE_WINDOW_MS`,
    /// `TAGLOCK_DOOR_PULSE_MS`. Unparseable numeric values fall back
    /// to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("TAGLOCK_SERIAL_PORT") {
            config.serial_port = port;
        }
        if let Some(baud) = env_u64("TAGLOCK_BAUD_RATE") {
            config.baud_rate = baud as u32;
        }
        if let Ok(path) = std::env::var("TAGLOCK_DATABASE") {
            config.database_path = path;
        }
        if let Some(ms) = env_u64("TAGLOCK_IDLE_WINDOW_MS") {
            config.idle_window_ms = ms;
        }
        if let Some(ms) = env_u64("TAGLOCK_DOOR_PULSE_MS") {
            config.door_pulse_ms = ms;
        }

        config
    }

    /// Debounce idle window as a duration
    #[must_use]
    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    /// Door pulse width as a duration
    #[must_use]
    pub fn door_pulse(&self) -> Duration {
        Duration::from_millis(self.door_pulse_ms)
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}
