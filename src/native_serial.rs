// src/native_serial.rs
//
// Transport over a host serial port (USB/RS-485 converters and the like).

use crate::common::{
    config::BaudRate,
    hal_traits::{KellerSerial, KellerTimer},
};
use serialport::{ClearBuffer, DataBits, ErrorKind, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// Read timeout of the underlying port; short so `read_byte` behaves as
/// a non-blocking poll.
const PORT_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// A named serial port, opened when the session starts.
pub struct NativeSerial {
    port_name: String,
    baud_rate: BaudRate,
    port: Option<Box<dyn SerialPort>>,
}

impl NativeSerial {
    pub fn new(port_name: impl Into<String>, baud_rate: BaudRate) -> Self {
        NativeSerial {
            port_name: port_name.into(),
            baud_rate,
            port: None,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, serialport::Error> {
        self.port
            .as_mut()
            .ok_or_else(|| serialport::Error::new(ErrorKind::NoDevice, "port not open"))
    }
}

impl core::fmt::Debug for NativeSerial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeSerial")
            .field("port_name", &self.port_name)
            .field("baud_rate", &self.baud_rate)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// Maps "nothing yet" onto `WouldBlock`, everything else onto a port error.
fn poll_error(e: io::Error) -> nb::Error<serialport::Error> {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
            nb::Error::WouldBlock
        }
        _ => nb::Error::Other(serialport::Error::from(e)),
    }
}

impl KellerSerial for NativeSerial {
    type Error = serialport::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        let mut port = serialport::new(self.port_name.as_str(), self.baud_rate.as_baud())
            .timeout(PORT_POLL_TIMEOUT)
            .open()?;
        // 8N1, no handshake
        port.set_data_bits(DataBits::Eight)?;
        port.set_parity(Parity::None)?;
        port.set_stop_bits(StopBits::One)?;
        port.set_flow_control(FlowControl::None)?;
        port.clear(ClearBuffer::All)?;
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        // Dropping the handle closes the device.
        self.port = None;
        Ok(())
    }

    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Self::Error> {
        self.baud_rate = baud_rate;
        match self.port.as_mut() {
            Some(port) => port.set_baud_rate(baud_rate.as_baud()),
            None => Ok(()),
        }
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.port()?.clear(ClearBuffer::Input)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let port = self.port().map_err(nb::Error::Other)?;
        let mut byte = [0u8; 1];
        match port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) => Err(poll_error(e)),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        let port = self.port().map_err(nb::Error::Other)?;
        match port.write(&[byte]) {
            Ok(1) => Ok(()),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) => Err(poll_error(e)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        let port = self.port().map_err(nb::Error::Other)?;
        port.flush().map_err(poll_error)
    }
}

impl KellerTimer for NativeSerial {
    type Instant = Instant;

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopened_port_reports_no_device() {
        let mut serial = NativeSerial::new("/dev/null-keller", BaudRate::Baud9600);
        assert!(!serial.is_open());
        assert_eq!(serial.port_name(), "/dev/null-keller");
        match serial.read_byte() {
            Err(nb::Error::Other(e)) => assert_eq!(e.kind(), ErrorKind::NoDevice),
            other => panic!("expected NoDevice, got {:?}", other.map(|_| ())),
        }
        assert!(serial.clear_input().is_err());
    }

    #[test]
    fn test_baud_rate_before_open_is_remembered() {
        let mut serial = NativeSerial::new("COM7", BaudRate::Baud9600);
        serial.set_baud_rate(BaudRate::Baud115200).unwrap();
        assert_eq!(serial.baud_rate, BaudRate::Baud115200);
    }

    #[test]
    fn test_timeouts_poll_again() {
        assert!(matches!(poll_error(io::Error::from(io::ErrorKind::TimedOut)), nb::Error::WouldBlock));
        assert!(matches!(
            poll_error(io::Error::from(io::ErrorKind::BrokenPipe)),
            nb::Error::Other(_)
        ));
    }

    #[test]
    fn test_timer_moves_forward() {
        let mut serial = NativeSerial::new("COM7", BaudRate::Baud9600);
        let before = serial.now();
        serial.delay_us(50);
        assert!(serial.now() >= before);
    }
}
