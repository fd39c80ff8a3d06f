// src/session/sync_session/transaction.rs

use super::SyncSession;
use crate::common::{
    command::Command,
    error::KellerError,
    exception::detect_exception,
    hal_traits::{KellerSerial, KellerTimer},
};
use log::trace;

impl<IF> SyncSession<IF>
where
    IF: KellerSerial + KellerTimer,
{
    /// Executes one request/reply exchange. No retries: every failure is
    /// handed back to the caller.
    ///
    /// Returns the start/end indices of the validated reply frame inside
    /// `read_buffer` (line echo already skipped).
    pub(super) fn execute_transaction(
        &mut self,
        command: &Command,
        read_buffer: &mut [u8],
    ) -> Result<(usize, usize), KellerError<IF::Error>> {
        // 1. Encode
        let request = command.encode::<IF::Error>(self.config.address)?;

        // 2. Size the read: our own bytes come back first on an echoing line
        let echo_len = if self.echo_mode { request.len() } else { 0 };
        let wanted = command.expected_response_len() + echo_len;
        if wanted > read_buffer.len() {
            return Err(KellerError::BufferOverflow { needed: wanted, got: read_buffer.len() });
        }

        // 3. Send
        self.interface.clear_input().map_err(KellerError::Io)?;
        trace!("-> {}: {:02x?}", command, request.as_slice());
        self.send_frame_bytes(&request)?;

        // 4. Read
        // An exception reply is shorter than the one asked for; stop once it is in.
        let function = command.function_code();
        let received = self.read_bytes(&mut read_buffer[..wanted], |bytes| {
            bytes.len() > echo_len && detect_exception(&bytes[echo_len..], function).is_some()
        })?;
        trace!("<- {} of {} byte(s): {:02x?}", received, wanted, &read_buffer[..received]);
        if received <= echo_len {
            // Nothing beyond our own echo
            return Err(KellerError::Timeout);
        }

        // 5. Check the reply itself
        let (start, end) = (echo_len, received);
        self.process_response(&read_buffer[start..end], command)?;

        Ok((start, end))
    }
}
