pub mod benchmark;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod repl;
pub mod session;
pub mod value;

// Re-export main types
pub use config::Config;
pub use engine::{ExecStatus, TypeTag};
pub use error::{Result, SessionError};
pub use session::{ExecOutcome, Session, SessionOptions, SessionState};
pub use value::GlobalValue;
