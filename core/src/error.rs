use thiserror::Error;

/// Errors surfaced by a [`Session`](crate::session::Session).
///
/// Script failures are not errors at this level: they are reported through
/// [`ExecOutcome`](crate::session::ExecOutcome) and leave the session usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session was closed; only `close()` and `init()` remain valid.
    #[error("Lua local object is destroyed")]
    Closed,

    /// The session was built without an engine and `init()` has not run yet.
    #[error("Lua session has not been initialized")]
    Uninitialized,

    /// The engine could not allocate a new interpreter state.
    #[error("failed to allocate a new Lua state")]
    EngineAllocation,

    /// The configured chunk name cannot be handed to the engine.
    #[error("invalid chunk name {0:?}: contains a NUL byte")]
    InvalidChunkName(String),
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
