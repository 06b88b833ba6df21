//! Engine ownership
//!
//! [`Engine`] is one live interpreter state. It is move-only and closes the
//! state exactly once when dropped. [`EngineHandle`] is the nullable slot a
//! session keeps it in: destroying the handle takes the engine out first, so
//! a second destroy finds nothing to release.

use mlua_sys as ffi;
use std::fmt;
use std::ptr::NonNull;

use crate::error::{Result, SessionError};

/// One exclusively-owned interpreter instance.
pub struct Engine {
    raw: NonNull<ffi::lua_State>,
}

// SAFETY: a Lua state has no thread affinity; it only must not be used from
// two threads at once, which `&mut self` on every operation and the absence
// of a `Sync` impl guarantee.
unsafe impl Send for Engine {}

impl Engine {
    /// Allocate a fresh interpreter, optionally with the standard libraries.
    pub fn create(open_libs: bool) -> Result<Self> {
        // SAFETY: luaL_newstate has no preconditions and returns null only
        // when the allocator fails.
        let raw = NonNull::new(unsafe { ffi::luaL_newstate() })
            .ok_or(SessionError::EngineAllocation)?;

        if open_libs {
            // SAFETY: `raw` is a live state created above.
            unsafe { ffi::luaL_openlibs(raw.as_ptr()) };
        }

        Ok(Engine { raw })
    }

    pub(crate) fn as_ptr(&self) -> *mut ffi::lua_State {
        self.raw.as_ptr()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // SAFETY: the state is owned by `self` and never closed elsewhere.
        unsafe { ffi::lua_close(self.raw.as_ptr()) };
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("raw", &self.raw)
            .field("top", &self.top())
            .finish()
    }
}

/// Nullable owner of an [`Engine`]. The null state means "no live engine".
#[derive(Debug, Default)]
pub struct EngineHandle {
    engine: Option<Engine>,
}

impl EngineHandle {
    /// The sentinel handle: nothing is live.
    pub fn null() -> Self {
        EngineHandle { engine: None }
    }

    pub fn create(open_libs: bool) -> Result<Self> {
        Ok(EngineHandle {
            engine: Some(Engine::create(open_libs)?),
        })
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    /// Release the engine if there is one. Returns whether anything was released.
    pub fn destroy(&mut self) -> bool {
        match self.engine.take() {
            Some(engine) => {
                drop(engine);
                true
            }
            None => false,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_mut()
    }
}
