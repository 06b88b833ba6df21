//! # Session - the host-facing interpreter boundary
//!
//! A [`Session`] exclusively owns one engine and moves through three states:
//!
//! ```text
//! Uninitialized --init()--> Live --close()--> Closed
//!       ^                   |  ^                 |
//!       |                   |  +----init()-------+
//!       +-------------------+ (init() on Live is a full reset)
//! ```
//!
//! Every accessor and execution call requires `Live`; otherwise it fails with
//! [`SessionError::Closed`] or [`SessionError::Uninitialized`] instead of
//! quietly returning defaults. `close()` is always allowed and idempotent.
//!
//! All operations take `&mut self`: the engine's stack is shared mutable
//! state, so one session serves one caller at a time. A session may be moved
//! to another thread; wrap it in a `Mutex` to share it.

pub mod exec;
pub mod globals;

#[cfg(test)]
mod tests;

pub use exec::ExecOutcome;

use serde::{Deserialize, Serialize};
use std::ffi::CString;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::{Engine, EngineHandle};
use crate::error::{Result, SessionError};

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Live,
    Closed,
}

/// Options applied every time the session creates an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Load the standard libraries into each new state.
    pub open_libs: bool,
    /// Chunk name used by `parse_line` diagnostics.
    pub chunk_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            open_libs: true,
            chunk_name: "line".to_string(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            open_libs: config.session.open_libs,
            chunk_name: config.session.chunk_name.clone(),
        }
    }
}

/// One embedded interpreter and its global namespace.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    options: SessionOptions,
    chunk_name: CString,
    state: SessionState,
    handle: EngineHandle,
}

impl Session {
    /// Create a live session with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(SessionOptions::default())
    }

    /// Create a live session.
    pub fn with_options(options: SessionOptions) -> Result<Self> {
        let mut session = Self::uninit(options)?;
        session.init()?;
        Ok(session)
    }

    /// Create a session without an engine; call [`Session::init`] before use.
    pub fn uninit(options: SessionOptions) -> Result<Self> {
        let chunk_name = CString::new(options.chunk_name.as_str())
            .map_err(|_| SessionError::InvalidChunkName(options.chunk_name.clone()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            options,
            chunk_name,
            state: SessionState::Uninitialized,
            handle: EngineHandle::null(),
        })
    }

    /// Identifier used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == SessionState::Live
    }

    /// Destroy any existing engine and start a fresh one.
    ///
    /// Valid in every state. All globals from the previous engine are gone
    /// afterwards. If allocation fails the session is left uninitialized.
    pub fn init(&mut self) -> Result<()> {
        if self.handle.destroy() {
            debug!(session = %self.id, "engine released for reset");
        }
        self.state = SessionState::Uninitialized;

        self.handle = EngineHandle::create(self.options.open_libs)?;
        self.state = SessionState::Live;

        debug!(
            session = %self.id,
            open_libs = self.options.open_libs,
            "engine created"
        );
        Ok(())
    }

    /// Release the engine. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.handle.destroy() {
            debug!(session = %self.id, "engine closed");
        }
        self.state = SessionState::Closed;
    }

    /// Current height of the engine stack; zero between operations.
    pub fn stack_depth(&mut self) -> Result<i32> {
        Ok(self.engine()?.top())
    }

    fn engine(&mut self) -> Result<&mut Engine> {
        match self.state {
            SessionState::Live => self.handle.get_mut().ok_or(SessionError::Closed),
            SessionState::Closed => Err(SessionError::Closed),
            SessionState::Uninitialized => Err(SessionError::Uninitialized),
        }
    }
}
