// src/common/config.rs

use super::address::DeviceAddress;
use super::error::KellerError;
use super::timing;
use core::convert::TryFrom;
use core::time::Duration;

/// Line speeds the devices accept.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum BaudRate {
    /// 9600 baud, factory default.
    #[default]
    Baud9600,
    /// 115200 baud.
    Baud115200,
}

impl BaudRate {
    /// Returns the numeric baud rate value.
    #[must_use]
    pub const fn as_baud(self) -> u32 {
        match self {
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud115200 => 115_200,
        }
    }

    /// Time one byte occupies on the line (8N1: start + 8 data + stop).
    pub fn byte_duration(self) -> Duration {
        let nanos = 10 * 1_000_000_000u64 / u64::from(self.as_baud());
        Duration::from_nanos(nanos)
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = KellerError<()>;

    fn try_from(baud: u32) -> Result<Self, Self::Error> {
        match baud {
            9600 => Ok(BaudRate::Baud9600),
            115_200 => Ok(BaudRate::Baud115200),
            other => Err(KellerError::UnsupportedBaudRate(other)),
        }
    }
}

/// Everything a session needs to know before it touches the line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SessionConfig {
    pub address: DeviceAddress,
    pub baud_rate: BaudRate,
    /// How long to wait for the first byte of a reply.
    pub response_timeout: Duration,
}

impl SessionConfig {
    /// Validates raw settings. Performs no I/O.
    pub fn new(address: u8, baud: u32) -> Result<Self, KellerError<()>> {
        Ok(SessionConfig {
            address: DeviceAddress::new(address)?,
            baud_rate: BaudRate::try_from(baud)?,
            response_timeout: timing::DEFAULT_RESPONSE_TIMEOUT,
        })
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Overall time allowed to collect `len` bytes: the response timeout
    /// plus the time those bytes occupy on the line.
    pub fn read_window(&self, len: usize) -> Duration {
        self.response_timeout + self.baud_rate.byte_duration() * len as u32
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            address: DeviceAddress::TRANSPARENT,
            baud_rate: BaudRate::Baud9600,
            response_timeout: timing::DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
