//! Debug server binding
//!
//! Ties a debugger endpoint (a GDB port and its listening flag) to the session
//! controller. Only run control goes through here; no wire protocol is spoken.

use crate::session::{SessionState, SharedSession};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default GDB remote port
pub const DEFAULT_GDB_PORT: u16 = 2345;

/// Debugger endpoint bound to a session controller
pub struct DebugBinding {
    session: SharedSession,
    port: u16,
    listening: AtomicBool,
}

impl DebugBinding {
    pub fn new(session: SharedSession, port: u16) -> Self {
        tracing::info!("Debug binding created on port {}", port);
        Self {
            session,
            port,
            listening: AtomicBool::new(false),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    pub fn set_listening(&self, listening: bool) {
        if self.listening.swap(listening, Ordering::AcqRel) != listening {
            tracing::info!(
                "Debug endpoint on port {} {}",
                self.port,
                if listening { "listening" } else { "closed" }
            );
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.read().state()
    }

    pub fn frame_count(&self) -> u64 {
        self.session.read().frame_count()
    }

    /// Halt emulation. Returns whether the session was running.
    pub fn break_into(&self) -> bool {
        self.session.write().set_paused(true)
    }

    /// Continue after a break
    pub fn resume(&self) -> bool {
        self.session.write().set_paused(false)
    }

    /// Execute a single frame while halted
    pub fn step(&self) {
        self.session.write().frame_advance();
    }

    /// Whether this binding drives the given session
    pub fn is_bound_to(&self, session: &SharedSession) -> bool {
        std::sync::Arc::ptr_eq(&self.session, session)
    }
}
