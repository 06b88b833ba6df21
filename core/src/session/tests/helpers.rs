//! Shared helpers for session tests

use crate::session::{Session, SessionOptions};
use std::io::Write;

/// A live session with the standard libraries loaded.
pub fn live_session() -> Session {
    Session::new().expect("create session")
}

/// A live session without the standard libraries.
pub fn bare_session() -> Session {
    Session::with_options(SessionOptions {
        open_libs: false,
        ..Default::default()
    })
    .expect("create bare session")
}

/// Run `source` and assert that it succeeded.
pub fn run_ok(session: &mut Session, source: &str) {
    let outcome = session.parse_line(source).expect("session is live");
    assert!(
        outcome.ok,
        "script should succeed: {:?}\n{}",
        source, outcome.message
    );
}

/// Write `source` into a temporary `.lua` file.
pub fn script_file(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".lua")
        .tempfile()
        .expect("create temp script");
    file.write_all(source.as_bytes()).expect("write temp script");
    file.flush().expect("flush temp script");
    file
}

/// Assert that the engine stack is back at zero.
pub fn assert_balanced(session: &mut Session) {
    assert_eq!(
        session.stack_depth().expect("session is live"),
        0,
        "access position leaked a value"
    );
}
