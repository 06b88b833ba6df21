//! Chunk loading and execution

use mlua_sys as ffi;
use std::ffi::{c_char, CStr};

use super::handle::Engine;
use super::stack::StackIndex;
use super::status::ExecStatus;
use super::types::TypeTag;

/// Load mode for every chunk. The engine does not verify bytecode, so binary
/// chunks are refused at load time and reported as syntax errors.
const TEXT_ONLY: &CStr = c"t";

impl Engine {
    /// Compile and run `source` as one chunk named `chunk_name`.
    pub fn run_source(&mut self, source: &str, chunk_name: &CStr) -> (ExecStatus, String) {
        self.run_protected(|l| {
            // SAFETY: `source` is a valid buffer for its length and
            // `chunk_name` and the mode are NUL-terminated.
            unsafe {
                ffi::luaL_loadbufferx(
                    l,
                    source.as_ptr().cast::<c_char>(),
                    source.len(),
                    chunk_name.as_ptr(),
                    TEXT_ONLY.as_ptr(),
                )
            }
        })
    }

    /// Compile and run the script stored at `path`.
    pub fn run_file(&mut self, path: &CStr) -> (ExecStatus, String) {
        self.run_protected(|l| {
            // SAFETY: `path` and the mode are NUL-terminated.
            unsafe { ffi::luaL_loadfilex(l, path.as_ptr(), TEXT_ONLY.as_ptr()) }
        })
    }

    /// Load with `load`, then call the chunk under protection. The stack is
    /// restored to its entry height on every path, so chunk results and
    /// error objects never accumulate.
    fn run_protected(
        &mut self,
        load: impl FnOnce(*mut ffi::lua_State) -> std::ffi::c_int,
    ) -> (ExecStatus, String) {
        let base = self.top();
        let l = self.as_ptr();

        let mut status = ExecStatus::from_code(load(l));
        if status.is_ok() {
            // SAFETY: a successful load left exactly one function on top.
            status = ExecStatus::from_code(unsafe { ffi::lua_pcall(l, 0, ffi::LUA_MULTRET, 0) });
        }

        let message = self.error_message(status, base);
        self.restore(base);
        (status, message)
    }

    /// Diagnostic for `status`: empty on success, otherwise the category
    /// followed by the error object the engine left above `base`.
    pub fn error_message(&mut self, status: ExecStatus, base: StackIndex) -> String {
        if status.is_ok() {
            return String::new();
        }

        let detail = if self.top() > base {
            let position = self.top();
            self.read_string(position).unwrap_or_else(|| {
                format!("(error object is a {} value)", self.read_type(position))
            })
        } else {
            format!("(error object is a {} value)", TypeTag::None)
        };

        format!("error({}) {}", status.category(), detail)
    }

    fn restore(&mut self, base: StackIndex) {
        // SAFETY: `base` was the stack height on entry.
        unsafe { ffi::lua_settop(self.as_ptr(), base) };
    }
}
