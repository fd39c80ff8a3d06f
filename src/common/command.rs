//! Request catalogue for the bus.
//!
//! Function 3 is plain Modbus RTU; functions above 16 are the vendor
//! extensions of the device family.

use core::fmt;

use super::address::DeviceAddress;
use super::error::KellerError;
use super::frame::{encode_frame, Frame, CRC_LEN, HEADER_LEN, MAX_FRAME_LEN};

/// Function code of the Modbus "read holding registers" request.
pub const FN_READ_REGISTERS: u8 = 3;
/// Function code of the Modbus diagnostic (loop-back) request.
pub const FN_ECHO_TEST: u8 = 8;
/// Function code of the vendor initialise/identify request.
pub const FN_INITIALISE: u8 = 48;
/// Function code of the vendor serial number request.
pub const FN_READ_SERIAL_NUMBER: u8 = 69;

/// Loop-back payload: sub-function 0 ("return query data") and a test word
/// with alternating bits.
pub const ECHO_TEST_PAYLOAD: [u8; 4] = [0x00, 0x00, 0xA5, 0x5A];

/// Largest register count whose reply still fits in one frame.
pub const MAX_REGISTER_COUNT: u16 = ((MAX_FRAME_LEN - HEADER_LEN - 1 - CRC_LEN) / 2) as u16;

/// Register holding pressure P1 (float, 2 registers).
pub const REG_PRESSURE_P1: u16 = 0x0002;
/// Register holding temperature TOB1 (float, 2 registers).
pub const REG_TEMPERATURE_TOB1: u16 = 0x0008;

/// A request the session can send.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Diagnostic loop-back; the device returns the request unchanged.
    EchoTest,
    /// Initialise the device and read its identity block.
    Initialise,
    /// Read the 32-bit factory serial number.
    ReadSerialNumber,
    /// Read `count` 16-bit holding registers starting at `start`.
    ReadRegisters { start: u16, count: u16 },
}

impl Command {
    /// Builds a register read, rejecting counts the protocol cannot carry.
    pub fn read_registers<E>(start: u16, count: u16) -> Result<Self, KellerError<E>>
    where
        E: fmt::Debug,
    {
        if count == 0 {
            return Err(KellerError::InvalidArgument);
        }
        if count > MAX_REGISTER_COUNT {
            return Err(KellerError::BufferOverflow {
                needed: HEADER_LEN + 1 + 2 * usize::from(count) + CRC_LEN,
                got: MAX_FRAME_LEN,
            });
        }
        Ok(Command::ReadRegisters { start, count })
    }

    pub const fn function_code(&self) -> u8 {
        match self {
            Command::EchoTest => FN_ECHO_TEST,
            Command::Initialise => FN_INITIALISE,
            Command::ReadSerialNumber => FN_READ_SERIAL_NUMBER,
            Command::ReadRegisters { .. } => FN_READ_REGISTERS,
        }
    }

    /// Payload bytes between the function code and the checksum.
    pub fn payload(&self) -> ([u8; 4], usize) {
        match self {
            Command::EchoTest => (ECHO_TEST_PAYLOAD, 4),
            Command::Initialise | Command::ReadSerialNumber => ([0; 4], 0),
            Command::ReadRegisters { start, count } => {
                let [start_hi, start_lo] = start.to_be_bytes();
                let [count_hi, count_lo] = count.to_be_bytes();
                ([start_hi, start_lo, count_hi, count_lo], 4)
            }
        }
    }

    /// Encodes the request for `address`, checksum included.
    pub fn encode<E>(&self, address: DeviceAddress) -> Result<Frame, KellerError<E>>
    where
        E: fmt::Debug,
    {
        let (payload, len) = self.payload();
        encode_frame(address.as_u8(), self.function_code(), &payload[..len])
    }

    /// Length of a successful reply, checksum included.
    pub fn expected_response_len(&self) -> usize {
        match self {
            Command::EchoTest => HEADER_LEN + ECHO_TEST_PAYLOAD.len() + CRC_LEN,
            // class, group, year, week, buffer, status
            Command::Initialise => HEADER_LEN + 6 + CRC_LEN,
            // SN3..SN0
            Command::ReadSerialNumber => HEADER_LEN + 4 + CRC_LEN,
            // byte count + 2 bytes per register
            Command::ReadRegisters { count, .. } => HEADER_LEN + 1 + 2 * usize::from(*count) + CRC_LEN,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::EchoTest => write!(f, "F{} echo test", FN_ECHO_TEST),
            Command::Initialise => write!(f, "F{} initialise", FN_INITIALISE),
            Command::ReadSerialNumber => write!(f, "F{} read serial number", FN_READ_SERIAL_NUMBER),
            Command::ReadRegisters { start, count } => {
                write!(f, "F{} read {} register(s) at {:#06x}", FN_READ_REGISTERS, count, start)
            }
        }
    }
}
