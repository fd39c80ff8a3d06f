// src/common/error.rs

use super::exception::ExceptionKind;
use crate::session::SessionState;

/// Every failure the bus engine reports. Nothing is retried internally;
/// recovery is the caller's decision.
#[derive(Debug, thiserror::Error)]
pub enum KellerError<E = ()>
where
    E: core::fmt::Debug, // Needed for the generic Io error
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Nothing at all arrived before the read timeout elapsed.
    #[error("Operation timed out")]
    Timeout,

    /// Requested baud rate is not one the device supports.
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    /// Device address outside 1..=250.
    #[error("Invalid device address: {0}")]
    InvalidAddress(u8),

    /// Caller supplied an argument the protocol cannot express.
    #[error("Invalid argument")]
    InvalidArgument,

    /// Received frame is malformed (too short to carry a checksum, bad field).
    #[error("Invalid response format")]
    InvalidFormat,

    /// The reply stopped before the expected number of bytes.
    #[error("Incomplete frame: expected {expected} bytes, got {got}")]
    IncompleteFrame { expected: usize, got: usize },

    /// Frame does not fit into the fixed-size buffers.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// Device answered with an exception frame.
    #[error("Device exception: {0}")]
    Exception(ExceptionKind),

    /// Got a valid frame, but not the one the request asked for
    /// (foreign address, other function, wrong byte count).
    #[error("Unexpected response received")]
    UnexpectedResponse,

    /// Business call on a session that has not reached `Ready`.
    #[error("Session not ready (state: {0:?})")]
    SessionNotReady(SessionState),
}

impl<E: core::fmt::Debug> KellerError<E> {
    /// True for failures raised before any I/O because of bad settings.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, KellerError::UnsupportedBaudRate(_) | KellerError::InvalidAddress(_))
    }
}
