// src/session/mod.rs

pub mod sync_session;

pub use sync_session::SyncSession;

/// Lifecycle of a device session.
///
/// `Uninitialized → EchoProbed → Identified → Ready`; any failure while
/// starting ends in `Faulted`, which is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    /// Constructed, nothing sent yet.
    Uninitialized,
    /// Line echo behaviour learned.
    EchoProbed,
    /// Identity block received and validated.
    Identified,
    /// Business operations allowed.
    Ready,
    /// Start failed; a new session is required.
    Faulted,
}

impl SessionState {
    #[inline]
    pub const fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}
