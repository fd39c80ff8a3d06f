// src/common/crc.rs

use super::error::KellerError;
use super::frame::Dialect;
use crc::{Crc, CRC_16_MODBUS};

// CRC-16/MODBUS from the crc catalogue:
// Polynomial: 0x8005 (normal representation of 0xA001 reflected)
// Initial Value: 0xFFFF
// Input/Output Reflected: true
// Final XOR: 0x0000
// Check Value: 0x4B37 (for "123456789")
const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Calculates the CRC-16/MODBUS checksum shared by both bus dialects.
///
/// The calculation covers everything from the address byte up to the byte
/// *before* the two checksum bytes.
///
/// # Arguments
///
/// * `data`: A slice of bytes for which to calculate the CRC.
///
/// # Returns
///
/// The calculated 16-bit CRC value.
#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Renders a CRC in vendor (function > 16) order: `[MSB, LSB]`.
#[inline]
pub fn encode_crc_vendor(crc_value: u16) -> [u8; 2] {
    crc_value.to_be_bytes()
}

/// Renders a CRC in standard Modbus (function <= 16) order: `[LSB, MSB]`.
#[inline]
pub fn encode_crc_standard(crc_value: u16) -> [u8; 2] {
    crc_value.to_le_bytes()
}

/// Renders a CRC in the byte order of the given dialect.
pub fn encode_crc(crc_value: u16, dialect: Dialect) -> [u8; 2] {
    match dialect {
        Dialect::Vendor => encode_crc_vendor(crc_value),
        Dialect::Standard => encode_crc_standard(crc_value),
    }
}

/// Decodes the two trailing checksum bytes of a frame back into a 16-bit value.
///
/// # Arguments
///
/// * `crc_bytes`: The two checksum bytes, in the order used by `dialect`.
/// * `dialect`: The dialect the bytes were rendered in.
pub fn decode_crc(crc_bytes: [u8; 2], dialect: Dialect) -> u16 {
    match dialect {
        Dialect::Vendor => u16::from_be_bytes(crc_bytes),
        Dialect::Standard => u16::from_le_bytes(crc_bytes),
    }
}

/// Verifies the checksum of a complete frame (body followed by two CRC bytes).
///
/// The dialect is taken from the frame's function byte, so the same rule
/// governs both building and checking a frame.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(KellerError::InvalidFormat)` if the frame cannot hold an address,
///   a function code and a checksum.
/// * `Err(KellerError::CrcMismatch)` if the CRCs don't match.
pub fn verify_frame_crc<E>(frame: &[u8]) -> Result<(), KellerError<E>>
where
    E: core::fmt::Debug,
{
    if frame.len() < 4 {
        return Err(KellerError::InvalidFormat);
    }
    let dialect = Dialect::of(frame[1]);
    let data_len = frame.len() - 2;
    let calculated_crc = calculate_crc16(&frame[..data_len]);
    let received_crc = decode_crc([frame[data_len], frame[data_len + 1]], dialect);

    if calculated_crc == received_crc {
        Ok(())
    } else {
        Err(KellerError::CrcMismatch { expected: received_crc, calculated: calculated_crc })
    }
}
