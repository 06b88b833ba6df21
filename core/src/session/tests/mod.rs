//! Tests for the session boundary
//!
//! Organized by area: lifecycle, typed globals, execution

mod global_tests;
mod helpers;
