// src/session/sync_session/echo.rs

use super::SyncSession;
use crate::common::{
    command::Command,
    error::KellerError,
    frame::{CRC_LEN, HEADER_LEN},
    hal_traits::{KellerSerial, KellerTimer},
};
use log::{debug, trace};

/// Length of the loop-back probe frame.
const PROBE_LEN: usize = HEADER_LEN + 4 + CRC_LEN;

impl<IF> SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    /// Learns whether the line repeats our own bytes before the reply.
    ///
    /// Sends the loop-back request (`L` bytes) and reads up to `2 * L`. A
    /// missing or short reply is not an error: it simply means no echo.
    pub(super) fn probe_echo(&mut self) -> Result<bool, KellerError<IF::Error>> {
        let probe = Command::EchoTest.encode::<IF::Error>(self.config.address)?;
        let mut buffer = [0u8; 2 * PROBE_LEN];
        let wanted = 2 * probe.len();

        self.interface.clear_input().map_err(KellerError::Io)?;
        trace!("-> {}: {:02x?}", Command::EchoTest, probe.as_slice());
        self.send_frame_bytes(&probe)?;

        let received = self.read_bytes(&mut buffer[..wanted], |_| false)?;
        trace!("<- {} byte(s): {:02x?}", received, &buffer[..received]);

        let echo = classify_echo(&probe, &buffer[..received]);
        debug!("echo probe: {} of {} bytes back, line echo {}", received, wanted, if echo { "on" } else { "off" });
        Ok(echo)
    }
}

/// Decides echo mode from what came back after sending `sent`.
///
/// Echo is on only when more than `sent.len()` bytes arrived and both
/// `sent.len()`-sized halves equal `sent`: the line's copy followed by the
/// device's loop-back reply.
pub(crate) fn classify_echo(sent: &[u8], received: &[u8]) -> bool {
    let len = sent.len();
    if received.len() <= len {
        return false;
    }
    match received.get(len..2 * len) {
        Some(second) => received[..len] == *sent && second == sent,
        None => false,
    }
}
