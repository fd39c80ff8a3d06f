// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless a host transport is wanted

pub mod common;
pub mod session;

#[cfg(feature = "native-serial")]
pub mod native_serial;

// Re-export key types for convenience
pub use common::{BaudRate, DeviceAddress, DeviceIdentity, KellerError, SessionConfig};
pub use session::{SessionState, SyncSession};
