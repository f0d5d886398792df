//! Serial byte source for the reader link.
//!
//! The RDM6300-class reader transmits ASCII records over a plain
//! 9600 8N1 serial line. This implementation preserves the unbounded
//! blocking-read contract of [`ByteSource`] on top of the serial
//! driver's mandatory finite timeout by looping on timed-out reads.

use crate::error::{HardwareError, Result};
use crate::traits::ByteSource;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Per-attempt driver timeout. Invisible to callers: timed-out reads
/// are retried until the requested byte count arrives.
const READ_SLICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking byte source over a serial port.
///
/// # Examples
///
/// ```no_run
/// use taglock_hardware::serial::SerialByteSource;
/// use taglock_hardware::traits::ByteSource;
///
/// # async fn example() -> taglock_hardware::Result<()> {
/// let mut source = SerialByteSource::open("/dev/ttyUSB0", 9600)?;
///
/// let mut window = [0u8; 64];
/// source.read_exact(&mut window).await?;
/// # Ok(())
/// # }
/// ```
pub struct SerialByteSource {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialByteSource {
    /// Open the serial link with the reader's fixed framing (8N1, no
    /// flow control).
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InitializationFailed` if the port cannot
    /// be opened or configured. Driver bring-up failures are expected
    /// to abort process startup, not be retried.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_SLICE_TIMEOUT)
            .open()
            .map_err(|e| {
                HardwareError::initialization_failed(format!(
                    "cannot open serial port {path}: {e}"
                ))
            })?;

        debug!(path, baud_rate, "serial port opened");

        Ok(Self {
            port,
            path: path.to_string(),
        })
    }
}

impl ByteSource for SerialByteSource {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            // The driver read may park the thread for up to the slice
            // timeout; tell the runtime so other tasks keep running.
            let result = tokio::task::block_in_place(|| self.port.read(&mut buf[filled..]));
            match result {
                Ok(0) => return Err(HardwareError::disconnected(self.path.clone())),
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}
