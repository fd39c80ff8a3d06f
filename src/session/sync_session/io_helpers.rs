// src/session/sync_session/io_helpers.rs

use super::SyncSession;
use crate::common::{
    error::KellerError,
    hal_traits::{KellerSerial, KellerTimer},
    timing,
};
use core::time::Duration;
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF> SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, KellerError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let start_time = self.interface.now();
        let deadline = start_time + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(KellerError::Timeout);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(KellerError::Io(e)),
            }
        }
    }

    /// Writes a complete request frame and waits for it to leave the transmitter.
    pub(super) fn send_frame_bytes(&mut self, frame: &[u8]) -> Result<(), KellerError<IF::Error>> {
        let write_duration = self.config.baud_rate.byte_duration() * frame.len() as u32;
        let write_timeout = write_duration + timing::WRITE_MARGIN;

        for byte in frame {
            self.execute_blocking_io_with_timeout(write_timeout, |iface| iface.write_byte(*byte))?;
        }

        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())?;
        Ok(())
    }

    /// Reads up to `buffer.len()` bytes within one overall deadline.
    ///
    /// The deadline is the configured response timeout plus the line time
    /// of `buffer.len()` bytes, counted from the call. Gaps between bytes do
    /// not end the read: on an echoing line the device's reply follows our
    /// own echo only after its turnaround. The read ends early once
    /// `is_complete` accepts the bytes received so far.
    ///
    /// Returns the number of bytes stored. A short count is not an error here.
    pub(super) fn read_bytes<C>(&mut self, buffer: &mut [u8], is_complete: C) -> Result<usize, KellerError<IF::Error>>
    where
        C: Fn(&[u8]) -> bool,
    {
        let deadline = self.interface.now() + self.config.read_window(buffer.len());
        let mut bytes_read = 0;

        while bytes_read < buffer.len() {
            let now = self.interface.now();
            if now >= deadline {
                break;
            }

            match self.execute_blocking_io_with_timeout(deadline - now, |iface| iface.read_byte()) {
                Ok(byte) => {
                    buffer[bytes_read] = byte;
                    bytes_read += 1;
                    if is_complete(&buffer[..bytes_read]) {
                        break;
                    }
                }
                Err(KellerError::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(bytes_read)
    }
}
