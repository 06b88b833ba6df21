//! Host-side snapshot of a global's value

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::{AccessSlot, TypeTag};

/// A global read through one access slot, already converted by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum GlobalValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    /// Tables, functions, userdata and threads are reported by tag only.
    Other(TypeTag),
}

impl GlobalValue {
    pub(crate) fn read(slot: &mut AccessSlot<'_>) -> Self {
        match slot.type_tag() {
            TypeTag::None | TypeTag::Nil => GlobalValue::Nil,
            TypeTag::Boolean => GlobalValue::Boolean(slot.boolean(false)),
            TypeTag::Number => match slot.integer64() {
                Some(value) if slot.is_integer() => GlobalValue::Integer(value),
                _ => GlobalValue::Double(slot.double(f64::NAN)),
            },
            TypeTag::String => GlobalValue::String(slot.string("")),
            other => GlobalValue::Other(other),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            GlobalValue::Nil => TypeTag::Nil,
            GlobalValue::Boolean(_) => TypeTag::Boolean,
            GlobalValue::Integer(_) | GlobalValue::Double(_) => TypeTag::Number,
            GlobalValue::String(_) => TypeTag::String,
            GlobalValue::Other(tag) => *tag,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, GlobalValue::Nil)
    }
}

impl fmt::Display for GlobalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalValue::Nil => f.write_str("nil"),
            GlobalValue::Boolean(b) => write!(f, "{}", b),
            GlobalValue::Integer(n) => write!(f, "{}", n),
            GlobalValue::Double(n) => write!(f, "{:?}", n),
            GlobalValue::String(s) => f.write_str(s),
            GlobalValue::Other(tag) => write!(f, "<{}>", tag),
        }
    }
}
