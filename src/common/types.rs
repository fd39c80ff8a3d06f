// src/common/types.rs

use super::error::KellerError;
use super::frame::MAX_FRAME_LEN;
use arrayvec::ArrayVec;

// --- Payload decoding ---
//
// Multi-byte values travel most significant byte first. The decoders reverse
// the wire bytes and then read them as little-endian, which is where the
// device documentation puts b0 (least significant byte).

/// Raw register bytes from a register read, in wire order.
pub type RegisterData = ArrayVec<u8, MAX_FRAME_LEN>;

/// Decodes an IEEE-754 single-precision value sent MSB first.
#[inline]
pub fn decode_float(wire: [u8; 4]) -> f32 {
    let mut bytes = wire;
    bytes.reverse();
    f32::from_le_bytes(bytes)
}

/// Decodes a 32-bit serial number sent MSB first (`SN3, SN2, SN1, SN0`).
///
/// Computes `SN0 + 256*SN1 + 256^2*SN2 + 256^3*SN3`.
pub fn decode_serial_number(wire: [u8; 4]) -> u32 {
    let mut bytes = wire;
    bytes.reverse();
    bytes
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &b)| acc + (u32::from(b) << (8 * i)))
}

/// Passes opaque register bytes through unchanged.
///
/// Fails with `BufferOverflow` for more than [`MAX_FRAME_LEN`] bytes, which
/// no single reply can carry.
pub fn decode_raw<E>(bytes: &[u8]) -> Result<RegisterData, KellerError<E>>
where
    E: core::fmt::Debug,
{
    let mut data = RegisterData::new();
    data.try_extend_from_slice(bytes)
        .map_err(|_| KellerError::BufferOverflow { needed: bytes.len(), got: MAX_FRAME_LEN })?;
    Ok(data)
}

/// Reads four wire bytes at `offset`, failing if the payload is too short.
pub(crate) fn word_at<E>(payload: &[u8], offset: usize) -> Result<[u8; 4], KellerError<E>>
where
    E: core::fmt::Debug,
{
    payload
        .get(offset..offset + 4)
        .and_then(|slice| <[u8; 4]>::try_from(slice).ok())
        .ok_or(KellerError::InvalidFormat)
}

// --- Typed results ---

/// Identity block returned by the initialisation command (function 48).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DeviceIdentity {
    pub address: u8,
    pub device_class: u8,
    pub device_group: u8,
    pub manufacture_year: u8,
    pub manufacture_week: u8,
    /// Size of the device's receive buffer in bytes.
    pub buffer_size: u8,
    pub status: u8,
}

impl DeviceIdentity {
    /// Number of payload bytes carried by an identity reply.
    pub const PAYLOAD_LEN: usize = 6;

    /// Builds the identity from the payload of a validated reply
    /// (`class, group, year, week, buffer, status`).
    pub fn from_payload<E>(address: u8, payload: &[u8]) -> Result<Self, KellerError<E>>
    where
        E: core::fmt::Debug,
    {
        if payload.len() < Self::PAYLOAD_LEN {
            return Err(KellerError::InvalidFormat);
        }
        Ok(DeviceIdentity {
            address,
            device_class: payload[0],
            device_group: payload[1],
            manufacture_year: payload[2],
            manufacture_week: payload[3],
            buffer_size: payload[4],
            status: payload[5],
        })
    }
}

/// Pressure (P1) and temperature (TOB1) taken from one register read.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PressureAndTemperature {
    /// Pressure in the device's configured unit (bar by default).
    pub pressure: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
}
