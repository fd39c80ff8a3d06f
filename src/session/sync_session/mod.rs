// src/session/sync_session/mod.rs

use super::SessionState;
use crate::common::{
    address::DeviceAddress,
    command::{Command, REG_PRESSURE_P1, REG_TEMPERATURE_TOB1},
    config::SessionConfig,
    error::KellerError,
    frame::{payload_of, MAX_FRAME_LEN},
    hal_traits::{KellerSerial, KellerTimer},
    types::{
        decode_float, decode_raw, decode_serial_number, word_at, DeviceIdentity,
        PressureAndTemperature, RegisterData,
    },
};
use log::{debug, warn};

mod echo;
mod io_helpers;
mod protocol_helpers;
mod transaction;

#[cfg(test)]
mod mock;

/// Room for the longest reply plus its line echo.
const READ_BUFFER_LEN: usize = 2 * MAX_FRAME_LEN;

/// A session with one pressure transmitter, for SYNCHRONOUS operations.
///
/// The session owns the transport for its whole lifetime: [`start`](Self::start)
/// opens it and [`release`](Self::release) closes it and hands it back.
#[derive(Debug)]
pub struct SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    interface: IF,
    config: SessionConfig,
    state: SessionState,
    echo_mode: bool,
    identity: Option<DeviceIdentity>,
}

impl<IF> SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    /// Creates a session. Nothing is sent until [`start`](Self::start).
    pub fn new(interface: IF, config: SessionConfig) -> Self {
        SyncSession {
            interface,
            config,
            state: SessionState::Uninitialized,
            echo_mode: false,
            identity: None,
        }
    }

    /// Brings the device up: opens the transport, applies the baud rate,
    /// learns the line's echo behaviour and reads the identity block.
    ///
    /// Any failure leaves the session `Faulted`; a new session is needed to
    /// try again.
    pub fn start(&mut self) -> Result<&DeviceIdentity, KellerError<IF::Error>> {
        if self.state != SessionState::Uninitialized {
            return Err(KellerError::SessionNotReady(self.state));
        }

        match self.run_start_sequence() {
            Ok(identity) => {
                self.transition(SessionState::Ready);
                Ok(&*self.identity.insert(identity))
            }
            Err(e) => {
                warn!("session start at address {} failed: {}", self.config.address, e);
                self.transition(SessionState::Faulted);
                Err(e)
            }
        }
    }

    fn run_start_sequence(&mut self) -> Result<DeviceIdentity, KellerError<IF::Error>> {
        self.interface.open().map_err(KellerError::Io)?;
        self.interface
            .set_baud_rate(self.config.baud_rate)
            .map_err(KellerError::Io)?;

        self.echo_mode = self.probe_echo()?;
        self.transition(SessionState::EchoProbed);

        let mut read_buffer = [0u8; READ_BUFFER_LEN];
        let (start, end) = self.execute_transaction(&Command::Initialise, &mut read_buffer)?;
        let frame = &read_buffer[start..end];
        let payload = payload_of(frame).ok_or(KellerError::InvalidFormat)?;
        // The reply's own address is the one to keep, even on the transparent address.
        let identity = DeviceIdentity::from_payload::<IF::Error>(frame[0], payload)?;
        self.transition(SessionState::Identified);

        Ok(identity)
    }

    // --- Public Blocking Methods ---

    /// Reads the P1 pressure channel.
    pub fn read_pressure(&mut self) -> Result<f32, KellerError<IF::Error>> {
        let data = self.read_register_block(REG_PRESSURE_P1, 2)?;
        Ok(decode_float(word_at::<IF::Error>(&data, 0)?))
    }

    /// Reads the TOB1 temperature channel.
    pub fn read_temperature(&mut self) -> Result<f32, KellerError<IF::Error>> {
        let data = self.read_register_block(REG_TEMPERATURE_TOB1, 2)?;
        Ok(decode_float(word_at::<IF::Error>(&data, 0)?))
    }

    /// Reads P1 and TOB1 in a single exchange (registers `0x0002..0x000A`).
    pub fn read_pressure_and_temperature(
        &mut self,
    ) -> Result<PressureAndTemperature, KellerError<IF::Error>> {
        let data = self.read_register_block(REG_PRESSURE_P1, 8)?;
        Ok(PressureAndTemperature {
            pressure: decode_float(word_at::<IF::Error>(&data, 0)?),
            temperature: decode_float(word_at::<IF::Error>(&data, 12)?),
        })
    }

    pub fn read_serial_number(&mut self) -> Result<u32, KellerError<IF::Error>> {
        self.ensure_ready()?;
        let mut read_buffer = [0u8; READ_BUFFER_LEN];
        let (start, end) = self.execute_transaction(&Command::ReadSerialNumber, &mut read_buffer)?;
        let payload = payload_of(&read_buffer[start..end]).ok_or(KellerError::InvalidFormat)?;
        Ok(decode_serial_number(word_at::<IF::Error>(payload, 0)?))
    }

    /// Reads raw holding registers. Start and count go on the wire as given,
    /// high byte first.
    pub fn read_register(
        &mut self,
        start_hi: u8,
        start_lo: u8,
        count_hi: u8,
        count_lo: u8,
    ) -> Result<RegisterData, KellerError<IF::Error>> {
        let start = u16::from_be_bytes([start_hi, start_lo]);
        let count = u16::from_be_bytes([count_hi, count_lo]);
        self.read_register_block(start, count)
    }

    /// Closes the transport and gives it back.
    pub fn release(mut self) -> Result<IF, KellerError<IF::Error>> {
        self.interface.close().map_err(KellerError::Io)?;
        debug!("session at address {} released", self.config.address);
        Ok(self.interface)
    }

    // --- Accessors ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the line repeats our requests. Meaningful once started.
    pub fn echo_mode(&self) -> bool {
        self.echo_mode
    }

    /// Identity read during [`start`](Self::start), if it succeeded.
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    pub fn address(&self) -> DeviceAddress {
        self.config.address
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // --- Internal Helpers ---

    fn ensure_ready(&self) -> Result<(), KellerError<IF::Error>> {
        if self.state.is_ready() {
            Ok(())
        } else {
            Err(KellerError::SessionNotReady(self.state))
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("session at address {}: {:?} -> {:?}", self.config.address, self.state, next);
        self.state = next;
    }

    /// Function-3 read returning the data bytes after the byte count.
    fn read_register_block(
        &mut self,
        start: u16,
        count: u16,
    ) -> Result<RegisterData, KellerError<IF::Error>> {
        self.ensure_ready()?;
        let command = Command::read_registers::<IF::Error>(start, count)?;

        let mut read_buffer = [0u8; READ_BUFFER_LEN];
        let (begin, end) = self.execute_transaction(&command, &mut read_buffer)?;
        let payload = payload_of(&read_buffer[begin..end]).ok_or(KellerError::InvalidFormat)?;

        match payload.split_first() {
            Some((&byte_count, data))
                if usize::from(byte_count) == 2 * usize::from(count) && data.len() == usize::from(byte_count) =>
            {
                decode_raw::<IF::Error>(data)
            }
            _ => {
                warn!("{} answered with byte count {:?}", command, payload.first());
                Err(KellerError::UnexpectedResponse)
            }
        }
    }
}
