//! # Engine - the embedded Lua interpreter
//!
//! Everything that touches the raw C API lives here. The rest of the crate
//! only sees:
//!
//! - [`EngineHandle`] / [`Engine`]: ownership and lifecycle of one state
//! - [`AccessSlot`] / [`PushedValue`]: the balanced one-slot stack protocol
//! - [`Engine::run_source`] / [`Engine::run_file`]: protected execution
//! - [`TypeTag`] / [`ExecStatus`]: the engine's numbering, as Rust enums

pub mod exec;
pub mod handle;
pub mod stack;
pub mod status;
pub mod types;

pub use handle::{Engine, EngineHandle};
pub use stack::{AccessSlot, PushedValue, StackIndex};
pub use status::ExecStatus;
pub use types::TypeTag;
