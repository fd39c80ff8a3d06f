// src/session/sync_session/mock.rs
//
// Scripted transport shared by the session tests.

use crate::common::{
    config::BaudRate,
    frame::encode_frame,
    hal_traits::{KellerSerial, KellerTimer},
};
use core::time::Duration;
use heapless::{Deque, Vec};
use nb::Result as NbResult;

pub(crate) const QUEUE_LEN: usize = 1024;
pub(crate) type Reply = Vec<u8, 300>;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

// --- Mock Interface ---
//
// Every flush ends a request: the next scripted reply (if any) becomes
// readable `turnaround_us` later on the simulated clock. With `line_echo`
// set, written bytes are looped back into the read queue at once, like a
// two-wire RS-485 adapter does.
pub(crate) struct MockInterface {
    pub now_us: u64,
    pub line_echo: bool,
    /// Device turnaround between the end of a request and its reply.
    pub turnaround_us: u64,
    pub fail_writes: bool,
    pub opened: bool,
    pub closed: bool,
    pub baud_rate: Option<BaudRate>,
    pub flushes: u32,
    pub written: Vec<u8, QUEUE_LEN>,
    read_queue: Deque<u8, QUEUE_LEN>,
    replies: Deque<Option<Reply>, 8>,
    /// Reply in flight and the time it becomes readable.
    pending: Option<(u64, Reply)>,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            now_us: 0,
            line_echo: false,
            turnaround_us: 0,
            fail_writes: false,
            opened: false,
            closed: false,
            baud_rate: None,
            flushes: 0,
            written: Vec::new(),
            read_queue: Deque::new(),
            replies: Deque::new(),
            pending: None,
        }
    }

    pub fn advance_time(&mut self, us: u64) {
        self.now_us = self.now_us.saturating_add(us);
    }

    /// Puts bytes straight into the receive queue.
    pub fn stage_read_data(&mut self, data: &[u8]) {
        for byte in data {
            self.read_queue.push_back(*byte).unwrap();
        }
    }

    /// Queues the device's answer to the next request.
    pub fn script_reply(&mut self, reply: Reply) {
        self.replies.push_back(Some(reply)).unwrap();
    }

    /// Queues "no answer" for the next request.
    pub fn script_silence(&mut self) {
        self.replies.push_back(None).unwrap();
    }

    /// Moves the reply in flight into the read queue once it is due.
    fn deliver_due_reply(&mut self) {
        match &self.pending {
            Some((due_us, _)) if *due_us <= self.now_us => {}
            _ => return,
        }
        if let Some((_, reply)) = self.pending.take() {
            for byte in reply.iter() {
                self.read_queue.push_back(*byte).unwrap();
            }
        }
    }

    /// Number of requests written so far (one flush per request).
    pub fn requests_sent(&self) -> u32 {
        self.flushes
    }
}

/// Copies raw bytes into a reply.
pub(crate) fn reply(bytes: &[u8]) -> Reply {
    Vec::from_slice(bytes).unwrap()
}

/// Builds a correctly checksummed reply.
pub(crate) fn framed_reply(address: u8, function: u8, payload: &[u8]) -> Reply {
    let frame = encode_frame::<()>(address, function, payload).unwrap();
    reply(&frame)
}

impl KellerTimer for MockInterface {
    type Instant = MockInstant;
    fn delay_us(&mut self, us: u32) { self.advance_time(us as u64); }
    fn delay_ms(&mut self, ms: u32) { self.advance_time((ms as u64) * 1000); }
    fn now(&self) -> Self::Instant { MockInstant(self.now_us) }
}

impl KellerSerial for MockInterface {
    type Error = MockCommError;

    fn open(&mut self) -> Result<(), Self::Error> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        Ok(())
    }

    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Self::Error> {
        self.baud_rate = Some(baud_rate);
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.read_queue.clear();
        self.pending = None;
        Ok(())
    }

    fn read_byte(&mut self) -> NbResult<u8, Self::Error> {
        self.deliver_due_reply();
        self.read_queue.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> NbResult<(), Self::Error> {
        if self.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        self.written.push(byte).map_err(|_| nb::Error::Other(MockCommError))?;
        if self.line_echo {
            self.read_queue.push_back(byte).map_err(|_| nb::Error::Other(MockCommError))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> NbResult<(), Self::Error> {
        self.flushes += 1;
        if let Some(Some(reply)) = self.replies.pop_front() {
            self.pending = Some((self.now_us + self.turnaround_us, reply));
            self.deliver_due_reply();
        }
        Ok(())
    }
}
