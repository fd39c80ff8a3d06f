// src/common/address.rs

use super::error::KellerError;
use core::convert::TryFrom;
use core::fmt;

/// Bus address of a single device (1..=250).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 250;

    /// Address every device answers to regardless of its configured one.
    /// Only usable with a single device on the line.
    pub const TRANSPARENT: DeviceAddress = DeviceAddress(250);

    /// Creates a new `DeviceAddress` if `address` is in range.
    /// Returns `Result<Self, KellerError<()>>` because validation itself
    /// cannot cause an I/O error.
    pub fn new(address: u8) -> Result<Self, KellerError<()>> {
        if Self::is_valid(address) {
            Ok(DeviceAddress(address))
        } else {
            Err(KellerError::InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.0 == Self::MAX
    }

    #[inline]
    pub const fn is_valid(address: u8) -> bool {
        address >= Self::MIN && address <= Self::MAX
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = KellerError<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddress> for u8 {
    fn from(value: DeviceAddress) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
