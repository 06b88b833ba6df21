//! luax CLI
//!
//! Runs Lua code in an embedded session and reads its globals back without
//! writing any host code. Useful for trying scripts, debugging diagnostics,
//! and benchmarking the global accessors.

use luax_core::cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
