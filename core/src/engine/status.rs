//! Engine status codes returned by load and call

use mlua_sys as ffi;
use serde::{Deserialize, Serialize};
use std::ffi::c_int;
use std::fmt;

/// Outcome category of loading or running a chunk.
///
/// `Ok` is the only success; every other variant carries the engine's
/// diagnostic on top of the stack when it is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    Ok,
    Yield,
    Runtime,
    Syntax,
    Memory,
    ErrorHandler,
    File,
    Unknown(i32),
}

impl ExecStatus {
    pub fn from_code(code: c_int) -> Self {
        match code {
            ffi::LUA_OK => ExecStatus::Ok,
            ffi::LUA_YIELD => ExecStatus::Yield,
            ffi::LUA_ERRRUN => ExecStatus::Runtime,
            ffi::LUA_ERRSYNTAX => ExecStatus::Syntax,
            ffi::LUA_ERRMEM => ExecStatus::Memory,
            ffi::LUA_ERRERR => ExecStatus::ErrorHandler,
            ffi::LUA_ERRFILE => ExecStatus::File,
            other => ExecStatus::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ExecStatus::Ok => ffi::LUA_OK,
            ExecStatus::Yield => ffi::LUA_YIELD,
            ExecStatus::Runtime => ffi::LUA_ERRRUN,
            ExecStatus::Syntax => ffi::LUA_ERRSYNTAX,
            ExecStatus::Memory => ffi::LUA_ERRMEM,
            ExecStatus::ErrorHandler => ffi::LUA_ERRERR,
            ExecStatus::File => ffi::LUA_ERRFILE,
            ExecStatus::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ExecStatus::Ok
    }

    /// Category text used in diagnostics: `error(<category>) ...`
    pub fn category(self) -> &'static str {
        match self {
            ExecStatus::Ok => "ok",
            ExecStatus::Yield => "thread has been suspended",
            ExecStatus::Runtime => "runtime error",
            ExecStatus::Syntax => "syntax error during pre-compilation",
            ExecStatus::Memory => "memory allocation error",
            ExecStatus::ErrorHandler => "error while running the error handler function",
            ExecStatus::File => "cannot open or read file",
            ExecStatus::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecStatus::Unknown(code) => write!(f, "unknown ({})", code),
            other => f.write_str(other.category()),
        }
    }
}
