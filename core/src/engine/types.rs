//! Engine type tags

use mlua_sys as ffi;
use serde::{Deserialize, Serialize};
use std::ffi::c_int;
use std::fmt;

/// Runtime category of a value, numbered exactly like the engine's own tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum TypeTag {
    /// No value at the inspected position.
    None = -1,
    Nil = 0,
    Boolean = 1,
    LightUserData = 2,
    Number = 3,
    String = 4,
    Table = 5,
    Function = 6,
    UserData = 7,
    Thread = 8,
}

impl TypeTag {
    /// Map a raw engine tag. Anything outside the known range reads as `None`.
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::LUA_TNIL => TypeTag::Nil,
            ffi::LUA_TBOOLEAN => TypeTag::Boolean,
            ffi::LUA_TLIGHTUSERDATA => TypeTag::LightUserData,
            ffi::LUA_TNUMBER => TypeTag::Number,
            ffi::LUA_TSTRING => TypeTag::String,
            ffi::LUA_TTABLE => TypeTag::Table,
            ffi::LUA_TFUNCTION => TypeTag::Function,
            ffi::LUA_TUSERDATA => TypeTag::UserData,
            ffi::LUA_TTHREAD => TypeTag::Thread,
            _ => TypeTag::None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Name as the engine reports it (`type()` in scripts).
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::None => "no value",
            TypeTag::Nil => "nil",
            TypeTag::Boolean => "boolean",
            TypeTag::LightUserData | TypeTag::UserData => "userdata",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Table => "table",
            TypeTag::Function => "function",
            TypeTag::Thread => "thread",
        }
    }

    /// Whether a typed getter can ever return something other than its default.
    pub fn is_scalar(self) -> bool {
        matches!(self, TypeTag::Boolean | TypeTag::Number | TypeTag::String)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
