// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod exception;
pub mod frame;
pub mod hal_traits;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::DeviceAddress;

// From command.rs
pub use command::Command;

// From config.rs
pub use config::{BaudRate, SessionConfig};

// From crc.rs
pub use crc::{
    calculate_crc16, decode_crc, encode_crc, encode_crc_standard, encode_crc_vendor,
    verify_frame_crc,
};

// From error.rs
pub use error::KellerError;

// From exception.rs
pub use exception::{detect_exception, ExceptionKind};

// From frame.rs
pub use frame::{append_crc, encode_frame, validate_frame, Dialect, Frame, MAX_FRAME_LEN};

// From hal_traits.rs
pub use hal_traits::{KellerInstant, KellerSerial, KellerTimer};

// From types.rs
pub use types::{
    decode_float, decode_raw, decode_serial_number, DeviceIdentity, PressureAndTemperature,
    RegisterData,
};
