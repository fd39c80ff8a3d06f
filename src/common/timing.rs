// src/common/timing.rs

use core::time::Duration;

// Byte-time based values depend on the configured baud rate and are derived
// through `BaudRate::byte_duration`; the constants here are the fixed parts.

/// Default wait for a reply, on top of its own byte times (the device
/// answers within a few milliseconds; 50 ms leaves room for USB-RS485
/// converters).
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(50);

/// Extra time granted to push a request out, on top of its byte times.
pub const WRITE_MARGIN: Duration = Duration::from_millis(20);

/// Maximum time to wait for the transmit buffer to drain.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(10);

/// Poll interval while a non-blocking transport reports `WouldBlock`.
pub const POLL_INTERVAL_US: u32 = 100;
