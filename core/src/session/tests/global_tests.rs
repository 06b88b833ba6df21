//! Typed global accessors: round-trips, defaults, mismatches, stack hygiene

use super::helpers::{assert_balanced, live_session, run_ok};
use crate::engine::TypeTag;
use crate::value::GlobalValue;

#[test]
fn test_string_round_trip() {
    let mut session = live_session();
    for value in ["", "hello", "ünïcødé ✓", "with\0nul", "multi\nline"] {
        session.set_string("s", value).unwrap();
        assert_eq!(session.get_string("s", "default").unwrap(), value);
    }
    assert_balanced(&mut session);
}

#[test]
fn test_boolean_round_trip() {
    let mut session = live_session();
    for value in [true, false] {
        session.set_boolean("b", value).unwrap();
        assert_eq!(session.get_boolean("b", !value).unwrap(), value);
    }
    assert_balanced(&mut session);
}

#[test]
fn test_integer_round_trip() {
    let mut session = live_session();
    for value in [0, 1, -1, 42, i32::MAX, i32::MIN] {
        session.set_integer("i", value).unwrap();
        assert_eq!(session.get_integer("i", 7).unwrap(), value);
    }
    assert_balanced(&mut session);
}

#[test]
fn test_double_round_trip() {
    let mut session = live_session();
    for value in [0.0, -0.5, 3.25, 1e300, f64::MIN_POSITIVE] {
        session.set_double("d", value).unwrap();
        assert_eq!(session.get_double("d", 9.9).unwrap(), value);
    }
    assert_balanced(&mut session);
}

#[test]
fn test_unbound_names_return_defaults() {
    let mut session = live_session();
    assert_eq!(session.get_string("nope", "dflt").unwrap(), "dflt");
    assert!(session.get_boolean("nope", true).unwrap());
    assert!(!session.get_boolean("nope", false).unwrap());
    assert_eq!(session.get_integer("nope", -5).unwrap(), -5);
    assert_eq!(session.get_double("nope", 2.5).unwrap(), 2.5);
    assert_balanced(&mut session);
}

#[test]
fn test_get_type() {
    let mut session = live_session();
    assert_eq!(session.get_type("unbound").unwrap(), TypeTag::Nil);

    session.set_integer("n", 5).unwrap();
    assert_eq!(session.get_type("n").unwrap(), TypeTag::Number);

    session.set_double("d", 0.5).unwrap();
    assert_eq!(session.get_type("d").unwrap(), TypeTag::Number);

    session.set_string("s", "x").unwrap();
    assert_eq!(session.get_type("s").unwrap(), TypeTag::String);

    session.set_boolean("b", false).unwrap();
    assert_eq!(session.get_type("b").unwrap(), TypeTag::Boolean);

    run_ok(&mut session, "t = {} f = function() end co = coroutine.create(f)");
    assert_eq!(session.get_type("t").unwrap(), TypeTag::Table);
    assert_eq!(session.get_type("f").unwrap(), TypeTag::Function);
    assert_eq!(session.get_type("co").unwrap(), TypeTag::Thread);
    assert_eq!(session.get_type("io").unwrap(), TypeTag::Table);
    assert_eq!(session.get_type("stdout_handle").unwrap(), TypeTag::Nil);

    run_ok(&mut session, "stdout_handle = io.stdout");
    assert_eq!(session.get_type("stdout_handle").unwrap(), TypeTag::UserData);

    assert_balanced(&mut session);
}

#[test]
fn test_zero_is_not_false() {
    let mut session = live_session();
    session.set_integer("z", 0).unwrap();
    assert!(session.get_boolean("z", true).unwrap());
    assert!(!session.get_boolean("z", false).unwrap());
}

#[test]
fn test_truthy_values_are_not_booleans() {
    let mut session = live_session();
    run_ok(&mut session, "s = 'yes' t = {}");
    assert!(!session.get_boolean("s", false).unwrap());
    assert!(!session.get_boolean("t", false).unwrap());
}

#[test]
fn test_integer_mismatches_fall_back() {
    let mut session = live_session();
    session.set_double("fraction", 2.5).unwrap();
    session.set_boolean("flag", true).unwrap();
    session.set_string("word", "abc").unwrap();
    run_ok(&mut session, "big = 2^40 // 1 tbl = {}");

    assert_eq!(session.get_integer("fraction", -1).unwrap(), -1);
    assert_eq!(session.get_integer("flag", -1).unwrap(), -1);
    assert_eq!(session.get_integer("word", -1).unwrap(), -1);
    assert_eq!(session.get_integer("big", -1).unwrap(), -1);
    assert_eq!(session.get_integer("tbl", -1).unwrap(), -1);
    assert_balanced(&mut session);
}

#[test]
fn test_integral_double_reads_as_integer() {
    let mut session = live_session();
    session.set_double("whole", 8.0).unwrap();
    assert_eq!(session.get_integer("whole", -1).unwrap(), 8);
    assert!(!session.is_integer("whole").unwrap());
}

#[test]
fn test_numeric_string_coercions() {
    let mut session = live_session();
    session.set_string("num", "42").unwrap();
    session.set_string("real", "0.25").unwrap();
    session.set_integer("n", 5).unwrap();
    session.set_double("d", 1.5).unwrap();

    assert_eq!(session.get_integer("num", 0).unwrap(), 42);
    assert_eq!(session.get_double("real", 0.0).unwrap(), 0.25);
    assert_eq!(session.get_string("n", "").unwrap(), "5");
    assert_eq!(session.get_string("d", "").unwrap(), "1.5");

    // Conversion happens on the access slot only; the binding keeps its type
    assert_eq!(session.get_type("n").unwrap(), TypeTag::Number);
    assert_eq!(session.get_type("num").unwrap(), TypeTag::String);
}

#[test]
fn test_string_mismatches_fall_back() {
    let mut session = live_session();
    session.set_boolean("flag", true).unwrap();
    run_ok(&mut session, "tbl = {}");
    assert_eq!(session.get_string("flag", "d").unwrap(), "d");
    assert_eq!(session.get_string("tbl", "d").unwrap(), "d");
}

#[test]
fn test_double_accepts_integers() {
    let mut session = live_session();
    session.set_integer("i", 3).unwrap();
    assert_eq!(session.get_double("i", 0.0).unwrap(), 3.0);
    session.set_boolean("b", true).unwrap();
    assert_eq!(session.get_double("b", -2.0).unwrap(), -2.0);
}

#[test]
fn test_set_overwrites_with_new_type() {
    let mut session = live_session();
    session.set_string("v", "text").unwrap();
    session.set_integer("v", 9).unwrap();
    assert_eq!(session.get_type("v").unwrap(), TypeTag::Number);
    assert_eq!(session.get_integer("v", 0).unwrap(), 9);

    session.set_boolean("v", true).unwrap();
    assert_eq!(session.get_type("v").unwrap(), TypeTag::Boolean);
}

#[test]
fn test_is_integer() {
    let mut session = live_session();
    run_ok(&mut session, "a = 1 + 1 b = 1 / 2 c = '3'");
    assert!(session.is_integer("a").unwrap());
    assert!(!session.is_integer("b").unwrap());
    assert!(!session.is_integer("c").unwrap());
    assert!(!session.is_integer("missing").unwrap());
}

#[test]
fn test_get_value() {
    let mut session = live_session();
    run_ok(&mut session, "i = 7 d = 7.5 s = 'str' b = true t = {} f = print");

    assert_eq!(session.get_value("i").unwrap(), GlobalValue::Integer(7));
    assert_eq!(session.get_value("d").unwrap(), GlobalValue::Double(7.5));
    assert_eq!(
        session.get_value("s").unwrap(),
        GlobalValue::String("str".to_string())
    );
    assert_eq!(session.get_value("b").unwrap(), GlobalValue::Boolean(true));
    assert_eq!(
        session.get_value("t").unwrap(),
        GlobalValue::Other(TypeTag::Table)
    );
    assert_eq!(
        session.get_value("f").unwrap(),
        GlobalValue::Other(TypeTag::Function)
    );
    assert_eq!(session.get_value("none").unwrap(), GlobalValue::Nil);
    assert_balanced(&mut session);
}

#[test]
fn test_script_sees_host_values() {
    let mut session = live_session();
    session.set_string("input", "abc").unwrap();
    session.set_integer("times", 3).unwrap();
    run_ok(&mut session, "output = string.rep(input, times)");
    assert_eq!(session.get_string("output", "").unwrap(), "abcabcabc");
}

#[test]
fn test_accessors_ignore_globals_metatable() {
    let mut session = live_session();
    run_ok(
        &mut session,
        "setmetatable(_G, { __index = function() error('no reads') end, \
                            __newindex = function() error('no writes') end })",
    );

    session.set_integer("fresh", 1).unwrap();
    assert_eq!(session.get_integer("fresh", 0).unwrap(), 1);
    assert_eq!(session.get_integer("absent", -1).unwrap(), -1);
    assert_balanced(&mut session);
}

#[test]
fn test_mixed_churn_does_not_leak_stack() {
    let mut session = live_session();
    for i in 0..10_000 {
        let name = format!("g{}", i % 17);
        match i % 5 {
            0 => {
                session.set_integer(&name, i).unwrap();
                assert_eq!(session.get_integer(&name, -1).unwrap(), i);
            }
            1 => {
                session.set_string(&name, "v").unwrap();
                assert_eq!(session.get_string(&name, "").unwrap(), "v");
            }
            2 => {
                session.set_boolean(&name, i % 2 == 0).unwrap();
                let _ = session.get_boolean(&name, false).unwrap();
            }
            3 => {
                session.set_double(&name, f64::from(i) / 4.0).unwrap();
                let _ = session.get_double(&name, 0.0).unwrap();
            }
            _ => {
                let _ = session.get_type(&name).unwrap();
                let _ = session.get_value(&name).unwrap();
            }
        }
    }
    assert_balanced(&mut session);
}
