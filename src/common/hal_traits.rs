// src/common/hal_traits.rs

use super::config::BaudRate;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time as reported by a [`KellerTimer`].
pub trait KellerInstant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> KellerInstant for T where T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration> {}

/// Abstraction for the clock and delay operations the session needs to
/// bound its reads.
pub trait KellerTimer {
    type Instant: KellerInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current time.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for synchronous (non-blocking) half-duplex serial access.
pub trait KellerSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Acquires the underlying channel. Called once when a session starts.
    fn open(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Releases the underlying channel.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Changes the line speed.
    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Self::Error>;

    /// Drops any bytes still waiting in the receive buffer.
    fn clear_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}
