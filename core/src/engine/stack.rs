//! Stack accessor protocol
//!
//! A single value moves between the globals table and the top of the engine
//! stack:
//!
//! - read: [`Engine::get_global`] places the value and hands back an
//!   [`AccessSlot`]; inspecting or converting happens through the slot, and
//!   dropping it pops the value on every exit path.
//! - write: a `push_*` call places a scalar and hands back a
//!   [`PushedValue`]; [`PushedValue::set_global`] consumes it, and dropping it
//!   unconsumed pops it.
//!
//! Globals are read and written raw, so metamethods on the globals table
//! never run inside these primitives.

use mlua_sys as ffi;
use std::ffi::{c_char, c_int};

use super::handle::Engine;
use super::types::TypeTag;

/// Absolute position on the engine stack (1-based).
pub type StackIndex = c_int;

impl Engine {
    /// Number of values currently on the stack.
    pub fn top(&self) -> StackIndex {
        // SAFETY: the state is live for as long as `self` exists.
        unsafe { ffi::lua_gettop(self.as_ptr()) }
    }

    /// Place the value bound to `name` (nil when unbound) at the access position.
    pub fn get_global(&mut self, name: &str) -> AccessSlot<'_> {
        let l = self.as_ptr();
        // SAFETY: pushes the globals table and the key, swaps the key for the
        // value, then removes the table; the net effect is one new value.
        unsafe {
            ffi::lua_rawgeti(l, ffi::LUA_REGISTRYINDEX, ffi::LUA_RIDX_GLOBALS);
            push_bytes(l, name.as_bytes());
            ffi::lua_rawget(l, -2);
            ffi::lua_remove(l, -2);
        }
        let position = self.top();
        AccessSlot {
            engine: self,
            position,
        }
    }

    pub fn push_string(&mut self, value: &str) -> PushedValue<'_> {
        // SAFETY: `value` is a valid slice; the engine copies it.
        unsafe { push_bytes(self.as_ptr(), value.as_bytes()) };
        self.pushed()
    }

    pub fn push_boolean(&mut self, value: bool) -> PushedValue<'_> {
        // SAFETY: plain push on a live state.
        unsafe { ffi::lua_pushboolean(self.as_ptr(), c_int::from(value)) };
        self.pushed()
    }

    pub fn push_integer(&mut self, value: i32) -> PushedValue<'_> {
        // SAFETY: plain push on a live state.
        unsafe { ffi::lua_pushinteger(self.as_ptr(), ffi::lua_Integer::from(value)) };
        self.pushed()
    }

    pub fn push_double(&mut self, value: f64) -> PushedValue<'_> {
        // SAFETY: plain push on a live state.
        unsafe { ffi::lua_pushnumber(self.as_ptr(), value) };
        self.pushed()
    }

    fn pushed(&mut self) -> PushedValue<'_> {
        let position = self.top();
        PushedValue {
            engine: self,
            position: Some(position),
        }
    }

    /// Bind the value at the top of the stack to `name`, consuming it.
    fn set_global_from_top(&mut self, name: &str) {
        let l = self.as_ptr();
        // SAFETY: stack goes [v] -> [G v] -> [G k v] -> [G] -> [], so the
        // value is consumed and nothing else is left behind.
        unsafe {
            ffi::lua_rawgeti(l, ffi::LUA_REGISTRYINDEX, ffi::LUA_RIDX_GLOBALS);
            ffi::lua_insert(l, -2);
            push_bytes(l, name.as_bytes());
            ffi::lua_insert(l, -2);
            ffi::lua_rawset(l, -3);
            ffi::lua_pop(l, 1);
        }
    }

    pub(crate) fn read_type(&self, position: StackIndex) -> TypeTag {
        // SAFETY: positions come from live slots, which are in range.
        TypeTag::from_raw(unsafe { ffi::lua_type(self.as_ptr(), position) })
    }

    /// Strings and numbers convert; numbers are rendered by the engine.
    pub(crate) fn read_string(&mut self, position: StackIndex) -> Option<String> {
        let l = self.as_ptr();
        // SAFETY: the returned buffer belongs to the value at `position`,
        // which stays on the stack until the bytes have been copied out.
        unsafe {
            if ffi::lua_isstring(l, position) == 0 {
                return None;
            }
            let mut len = 0usize;
            let ptr = ffi::lua_tolstring(l, position, &mut len);
            if ptr.is_null() {
                return None;
            }
            let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// Exact boolean only. Truthiness lives in [`Engine::read_truthy`].
    pub(crate) fn read_boolean(&self, position: StackIndex) -> Option<bool> {
        match self.read_type(position) {
            TypeTag::Boolean => Some(self.read_truthy(position)),
            _ => None,
        }
    }

    /// The engine's own rule: only nil and false are false.
    pub(crate) fn read_truthy(&self, position: StackIndex) -> bool {
        // SAFETY: positions come from live slots.
        unsafe { ffi::lua_toboolean(self.as_ptr(), position) != 0 }
    }

    /// Integers, integral floats and numeric strings; `None` otherwise.
    pub(crate) fn read_integer(&self, position: StackIndex) -> Option<i64> {
        let mut isnum: c_int = 0;
        // SAFETY: positions come from live slots; `isnum` outlives the call.
        let value = unsafe { ffi::lua_tointegerx(self.as_ptr(), position, &mut isnum) };
        (isnum != 0).then_some(value)
    }

    pub(crate) fn read_double(&self, position: StackIndex) -> Option<f64> {
        let mut isnum: c_int = 0;
        // SAFETY: positions come from live slots; `isnum` outlives the call.
        let value = unsafe { ffi::lua_tonumberx(self.as_ptr(), position, &mut isnum) };
        (isnum != 0).then_some(value)
    }

    /// True only for the engine's integer number subtype.
    pub(crate) fn read_is_integer(&self, position: StackIndex) -> bool {
        // SAFETY: positions come from live slots.
        unsafe { ffi::lua_isinteger(self.as_ptr(), position) != 0 }
    }

    /// Discard the value at `position` and everything above it.
    pub(crate) fn pop(&mut self, position: StackIndex) {
        // SAFETY: `position` was produced by a push on this state, so
        // `position - 1` is at or above the base of the stack.
        unsafe { ffi::lua_settop(self.as_ptr(), position - 1) };
    }
}

/// # Safety
/// `l` must be a live state with room for one more value.
unsafe fn push_bytes(l: *mut ffi::lua_State, bytes: &[u8]) {
    ffi::lua_pushlstring(l, bytes.as_ptr().cast::<c_char>(), bytes.len());
}

/// A global's value sitting at the access position. Popped on drop.
#[derive(Debug)]
#[must_use = "the value is popped as soon as the slot is dropped"]
pub struct AccessSlot<'e> {
    engine: &'e mut Engine,
    position: StackIndex,
}

impl AccessSlot<'_> {
    pub fn position(&self) -> StackIndex {
        self.position
    }

    pub fn type_tag(&self) -> TypeTag {
        self.engine.read_type(self.position)
    }

    pub fn string(&mut self, default: &str) -> String {
        self.engine
            .read_string(self.position)
            .unwrap_or_else(|| default.to_owned())
    }

    pub fn boolean(&self, default: bool) -> bool {
        self.engine.read_boolean(self.position).unwrap_or(default)
    }

    /// Falls back to `default` when the value is not an exact integer or
    /// does not fit in `i32`.
    pub fn integer(&self, default: i32) -> i32 {
        self.engine
            .read_integer(self.position)
            .and_then(|value| i32::try_from(value).ok())
            .unwrap_or(default)
    }

    pub fn integer64(&self) -> Option<i64> {
        self.engine.read_integer(self.position)
    }

    pub fn double(&self, default: f64) -> f64 {
        self.engine.read_double(self.position).unwrap_or(default)
    }

    pub fn is_integer(&self) -> bool {
        self.engine.read_is_integer(self.position)
    }

    pub fn truthy(&self) -> bool {
        self.engine.read_truthy(self.position)
    }
}

impl Drop for AccessSlot<'_> {
    fn drop(&mut self) {
        self.engine.pop(self.position);
    }
}

/// A scalar pushed for a pending `set_global`. Popped on drop if unused.
#[derive(Debug)]
#[must_use = "call set_global, otherwise the value is discarded"]
pub struct PushedValue<'e> {
    engine: &'e mut Engine,
    position: Option<StackIndex>,
}

impl PushedValue<'_> {
    /// Bind the pushed value to `name`, replacing any previous binding.
    pub fn set_global(mut self, name: &str) {
        if self.position.take().is_some() {
            self.engine.set_global_from_top(name);
        }
    }
}

impl Drop for PushedValue<'_> {
    fn drop(&mut self) {
        if let Some(position) = self.position.take() {
            self.engine.pop(position);
        }
    }
}
