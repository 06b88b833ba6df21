//! Script execution and error mapping

use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::path::Path;
use tracing::debug;

use super::Session;
use crate::engine::ExecStatus;
use crate::error::Result;

/// Result of running a chunk: the `(ok, message)` pair plus the raw status.
///
/// On failure `message` is the engine's diagnostic, verbatim after the
/// category prefix. Globals written before the failure stay written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutcome {
    pub ok: bool,
    pub status: ExecStatus,
    pub message: String,
}

impl ExecOutcome {
    pub(crate) fn new(status: ExecStatus, message: String) -> Self {
        Self {
            ok: status.is_ok(),
            status,
            message,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl From<ExecOutcome> for (bool, String) {
    fn from(outcome: ExecOutcome) -> Self {
        (outcome.ok, outcome.message)
    }
}

impl Session {
    /// Compile and run `text` as one chunk.
    pub fn parse_line(&mut self, text: &str) -> Result<ExecOutcome> {
        let id = self.id;
        let chunk_name = self.chunk_name.clone();
        let (status, message) = self.engine()?.run_source(text, &chunk_name);

        debug!(session = %id, %status, "line executed");
        Ok(ExecOutcome::new(status, message))
    }

    /// Compile and run the script file at `path`.
    ///
    /// A missing or unreadable file is a failed outcome with
    /// [`ExecStatus::File`], not an error.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ExecOutcome> {
        let id = self.id;
        let path = path.as_ref();
        let engine = self.engine()?;

        let outcome = match path.to_str().and_then(|p| CString::new(p).ok()) {
            Some(c_path) => {
                let (status, message) = engine.run_file(&c_path);
                ExecOutcome::new(status, message)
            }
            None => ExecOutcome::new(
                ExecStatus::File,
                format!(
                    "error({}) cannot open {}: path is not valid UTF-8 or contains a NUL byte",
                    ExecStatus::File.category(),
                    path.display()
                ),
            ),
        };

        debug!(session = %id, path = %path.display(), status = %outcome.status, "file executed");
        Ok(outcome)
    }
}
