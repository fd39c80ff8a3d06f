// src/session/sync_session/protocol_helpers.rs

use super::SyncSession;
use crate::common::{
    command::Command,
    crc::verify_frame_crc,
    error::KellerError,
    exception::detect_exception,
    hal_traits::{KellerSerial, KellerTimer},
};
use log::warn;

impl<IF> SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    /// Checks a received reply (line echo already stripped) against the
    /// request that produced it.
    ///
    /// Order matters: exception replies are recognised first, since they
    /// are shorter than any normal reply, but are only believed once their
    /// own checksum holds.
    pub(super) fn process_response(
        &self,
        response: &[u8],
        original_cmd: &Command,
    ) -> Result<(), KellerError<IF::Error>> {
        let function = original_cmd.function_code();

        // 1. Device rejected the request?
        if let Some(kind) = detect_exception(response, function) {
            verify_frame_crc::<IF::Error>(response).map_err(|e| {
                warn!("corrupted exception reply to {}: {:02x?}", original_cmd, response);
                e
            })?;
            self.check_address(response[0])?;
            warn!("{} rejected by device {}: {}", original_cmd, self.config.address, kind);
            return Err(KellerError::Exception(kind));
        }

        // 2. Complete?
        let expected = original_cmd.expected_response_len();
        if response.len() != expected {
            return Err(KellerError::IncompleteFrame { expected, got: response.len() });
        }

        // 3. Intact?
        verify_frame_crc::<IF::Error>(response).map_err(|e| {
            warn!("checksum failure on reply to {}: {}", original_cmd, e);
            e
        })?;

        // 4. Ours?
        self.check_address(response[0])?;
        if response[1] != function {
            return Err(KellerError::UnexpectedResponse);
        }

        Ok(())
    }

    /// A reply must come from the addressed device; on the transparent
    /// address any single device may answer.
    fn check_address(&self, received: u8) -> Result<(), KellerError<IF::Error>> {
        let expected = self.config.address;
        if expected.is_transparent() || received == expected.as_u8() {
            Ok(())
        } else {
            Err(KellerError::UnexpectedResponse)
        }
    }
}
