// src/common/exception.rs

use super::frame::EXCEPTION_FLAG;

/// Length of every exception reply: address, flagged function, code, CRC.
pub const EXCEPTION_FRAME_LEN: usize = 5;

/// Reason a device gave for rejecting a request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ExceptionKind {
    /// Code 1: function not implemented by the device.
    #[error("unsupported function")]
    UnsupportedFunction,
    /// Code 2: register address out of range.
    #[error("illegal data address")]
    IllegalDataAddress,
    /// Code 3: value or register count out of range.
    #[error("illegal data value")]
    IllegalDataValue,
    /// Code 4: device could not store the data.
    #[error("device save failure")]
    DeviceSaveFailure,
    /// Code 32: device must be initialised (function 48) first.
    #[error("device not initialized")]
    DeviceNotInitialized,
    /// Any code without a defined meaning.
    #[error("unknown protocol error (code {0})")]
    Unknown(u8),
}

impl ExceptionKind {
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => ExceptionKind::UnsupportedFunction,
            2 => ExceptionKind::IllegalDataAddress,
            3 => ExceptionKind::IllegalDataValue,
            4 => ExceptionKind::DeviceSaveFailure,
            32 => ExceptionKind::DeviceNotInitialized,
            other => ExceptionKind::Unknown(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            ExceptionKind::UnsupportedFunction => 1,
            ExceptionKind::IllegalDataAddress => 2,
            ExceptionKind::IllegalDataValue => 3,
            ExceptionKind::DeviceSaveFailure => 4,
            ExceptionKind::DeviceNotInitialized => 32,
            ExceptionKind::Unknown(code) => *code,
        }
    }
}

impl From<u8> for ExceptionKind {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// Recognises an exception reply to a request with function `request_function`.
///
/// A reply is an exception only when it is exactly [`EXCEPTION_FRAME_LEN`]
/// bytes long and carries `request_function | 0x80`. Checksum validation is
/// separate; call [`crate::common::frame::validate_frame`] before trusting
/// the decoded kind.
pub fn detect_exception(frame: &[u8], request_function: u8) -> Option<ExceptionKind> {
    if frame.len() != EXCEPTION_FRAME_LEN {
        return None;
    }
    if frame[1] != request_function | EXCEPTION_FLAG {
        return None;
    }
    Some(ExceptionKind::from_code(frame[2]))
}
