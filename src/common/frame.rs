// src/common/frame.rs

use super::crc::{calculate_crc16, encode_crc, verify_frame_crc};
use super::error::KellerError;
use arrayvec::ArrayVec;

/// Largest frame the bus carries (Modbus RTU ADU limit).
pub const MAX_FRAME_LEN: usize = 256;

/// Address byte + function byte.
pub const HEADER_LEN: usize = 2;

/// Trailing checksum bytes.
pub const CRC_LEN: usize = 2;

/// Fixed-capacity byte frame, request or response.
pub type Frame = ArrayVec<u8, MAX_FRAME_LEN>;

/// Function codes above this value belong to the vendor dialect.
const STANDARD_FUNCTION_MAX: u8 = 16;

/// Bit set in the function byte of an exception reply.
pub const EXCEPTION_FLAG: u8 = 0x80;

/// The two checksum byte-order conventions sharing the bus.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Dialect {
    /// Register access (function <= 16), CRC sent low byte first.
    Standard,
    /// Device-specific commands (function > 16), CRC sent high byte first.
    Vendor,
}

impl Dialect {
    /// Selects the dialect from a function byte.
    ///
    /// The exception flag is masked off first, so an exception reply checks
    /// out in the dialect of the request it answers.
    #[inline]
    pub const fn of(function: u8) -> Self {
        if function & !EXCEPTION_FLAG > STANDARD_FUNCTION_MAX {
            Dialect::Vendor
        } else {
            Dialect::Standard
        }
    }
}

/// Builds a complete, ready-to-send frame: `address, function, payload, crc`.
///
/// # Returns
///
/// * `Ok(frame)` with the checksum appended in the function's dialect order.
/// * `Err(KellerError::BufferOverflow)` if the frame would not fit in
///   [`MAX_FRAME_LEN`] bytes.
pub fn encode_frame<E>(address: u8, function: u8, payload: &[u8]) -> Result<Frame, KellerError<E>>
where
    E: core::fmt::Debug,
{
    let needed = HEADER_LEN + payload.len() + CRC_LEN;
    if needed > MAX_FRAME_LEN {
        return Err(KellerError::BufferOverflow { needed, got: MAX_FRAME_LEN });
    }

    let mut frame = Frame::new();
    frame.push(address);
    frame.push(function);
    frame
        .try_extend_from_slice(payload)
        .map_err(|_| KellerError::BufferOverflow { needed, got: MAX_FRAME_LEN })?;
    append_crc(&mut frame)?;
    Ok(frame)
}

/// Appends the checksum of `frame` (address, function and payload already
/// in place) using the dialect of its function byte.
pub fn append_crc<E>(frame: &mut Frame) -> Result<(), KellerError<E>>
where
    E: core::fmt::Debug,
{
    if frame.len() < HEADER_LEN {
        return Err(KellerError::InvalidFormat);
    }
    let crc = calculate_crc16(frame);
    let crc_bytes = encode_crc(crc, Dialect::of(frame[1]));
    frame
        .try_extend_from_slice(&crc_bytes)
        .map_err(|_| KellerError::BufferOverflow { needed: frame.len() + CRC_LEN, got: MAX_FRAME_LEN })
}

/// Returns `true` when the trailing checksum matches the frame body.
///
/// Frames too short to hold a header and a checksum are never valid.
/// Nothing in a frame that fails this check may be trusted.
#[inline]
pub fn validate_frame(frame: &[u8]) -> bool {
    verify_frame_crc::<()>(frame).is_ok()
}

/// Splits a validated response into its payload (between header and CRC).
///
/// Returns `None` for frames shorter than header + checksum.
pub fn payload_of(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < HEADER_LEN + CRC_LEN {
        return None;
    }
    Some(&frame[HEADER_LEN..frame.len() - CRC_LEN])
}
