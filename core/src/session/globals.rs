//! Typed global accessors
//!
//! Each getter is get-global, read-with-default, pop; the pop is the access
//! slot's drop, so it happens however the read goes. Getters never fail on
//! absent or mismatched values: they return the caller's default. Setters
//! always overwrite, creating the binding if needed.
//!
//! Booleans are strict: a number `0` is not `false` here, even though the
//! engine treats every non-nil, non-false value as true.

use tracing::trace;

use super::Session;
use crate::engine::TypeTag;
use crate::error::Result;
use crate::value::GlobalValue;

impl Session {
    /// Raw type of `name`; `Nil` when unbound.
    pub fn get_type(&mut self, name: &str) -> Result<TypeTag> {
        let tag = self.engine()?.get_global(name).type_tag();
        trace!(name, %tag, "get_type");
        Ok(tag)
    }

    pub fn get_string(&mut self, name: &str, default: &str) -> Result<String> {
        let value = self.engine()?.get_global(name).string(default);
        trace!(name, len = value.len(), "get_string");
        Ok(value)
    }

    pub fn get_boolean(&mut self, name: &str, default: bool) -> Result<bool> {
        let value = self.engine()?.get_global(name).boolean(default);
        trace!(name, value, "get_boolean");
        Ok(value)
    }

    /// `default` unless the value is an exact integer within `i32`.
    pub fn get_integer(&mut self, name: &str, default: i32) -> Result<i32> {
        let value = self.engine()?.get_global(name).integer(default);
        trace!(name, value, "get_integer");
        Ok(value)
    }

    pub fn get_double(&mut self, name: &str, default: f64) -> Result<f64> {
        let value = self.engine()?.get_global(name).double(default);
        trace!(name, value, "get_double");
        Ok(value)
    }

    /// Whether `name` holds a number of the engine's integer subtype.
    pub fn is_integer(&mut self, name: &str) -> Result<bool> {
        let value = self.engine()?.get_global(name).is_integer();
        trace!(name, value, "is_integer");
        Ok(value)
    }

    /// Read `name` once and convert it according to its own type.
    pub fn get_value(&mut self, name: &str) -> Result<GlobalValue> {
        let value = GlobalValue::read(&mut self.engine()?.get_global(name));
        trace!(name, ?value, "get_value");
        Ok(value)
    }

    pub fn set_string(&mut self, name: &str, value: &str) -> Result<()> {
        trace!(name, "set_string");
        self.engine()?.push_string(value).set_global(name);
        Ok(())
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> Result<()> {
        trace!(name, value, "set_boolean");
        self.engine()?.push_boolean(value).set_global(name);
        Ok(())
    }

    pub fn set_integer(&mut self, name: &str, value: i32) -> Result<()> {
        trace!(name, value, "set_integer");
        self.engine()?.push_integer(value).set_global(name);
        Ok(())
    }

    pub fn set_double(&mut self, name: &str, value: f64) -> Result<()> {
        trace!(name, value, "set_double");
        self.engine()?.push_double(value).set_global(name);
        Ok(())
    }
}
