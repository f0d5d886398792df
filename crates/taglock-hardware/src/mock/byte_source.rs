//! Mock byte source simulating the reader's serial stream.

use crate::error::{HardwareError, Result};
use crate::traits::ByteSource;
use bytes::{Buf, BytesMut};
use tokio::sync::mpsc;

/// Mock byte source for testing the decoder without hardware.
///
/// Bytes fed through the handle are buffered and drained by
/// `read_exact` exactly as the serial driver would, including reads
/// that span multiple fed chunks.
///
/// # Examples
///
/// ```
/// use taglock_hardware::mock::MockByteSource;
/// use taglock_hardware::traits::ByteSource;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> taglock_hardware::Result<()> {
///     let (mut source, handle) = MockByteSource::new();
///
///     handle.feed(vec![0x01, 0x02, 0x03, 0x04]).await;
///
///     let mut buf = [0u8; 4];
///     source.read_exact(&mut buf).await?;
///     assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockByteSource {
    chunk_rx: mpsc::Receiver<Vec<u8>>,
    buffer: BytesMut,
}

impl MockByteSource {
    /// Create a mock byte source and its feeding handle.
    pub fn new() -> (Self, MockByteSourceHandle) {
        let (chunk_tx, chunk_rx) = mpsc::channel(32);

        let source = Self {
            chunk_rx,
            buffer: BytesMut::new(),
        };

        (source, MockByteSourceHandle { chunk_tx })
    }
}

impl ByteSource for MockByteSource {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        while self.buffer.len() < buf.len() {
            let chunk = self
                .chunk_rx
                .recv()
                .await
                .ok_or_else(|| HardwareError::disconnected("mock byte source closed"))?;
            self.buffer.extend_from_slice(&chunk);
        }

        self.buffer.copy_to_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.buffer.clear();
        while self.chunk_rx.try_recv().is_ok() {}
        Ok(())
    }
}

/// Controller handle for a [`MockByteSource`].
#[derive(Debug, Clone)]
pub struct MockByteSourceHandle {
    chunk_tx: mpsc::Sender<Vec<u8>>,
}

impl MockByteSourceHandle {
    /// Feed a chunk of raw bytes into the stream.
    ///
    /// # Panics
    ///
    /// Panics if the source half has been dropped; tests are expected
    /// to keep it alive.
    pub async fn feed(&self, bytes: Vec<u8>) {
        self.chunk_tx
            .send(bytes)
            .await
            .expect("mock byte source dropped");
    }
}
