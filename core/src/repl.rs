use anyhow::Result;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::error::SessionError;
use crate::session::Session;

const HELP: &str = "\
Enter a chunk to run it in the session.
  :type NAME    show the type of a global
  :get NAME     show the value of a global
  :reset        discard all globals and start a fresh engine
  :help         show this message
  :quit         leave (also :exit or Ctrl-D)";

/// What the loop should do with one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Print to stdout
    Output(String),
    /// Print to stderr
    Error(String),
    Silent,
    Quit,
}

pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Interpret one line: a `:` command or a chunk to run.
    pub fn handle_line(&mut self, line: &str) -> Result<Reply, SessionError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Reply::Silent);
        }

        let Some(command) = trimmed.strip_prefix(':') else {
            let outcome = self.session.parse_line(trimmed)?;
            return Ok(if outcome.ok {
                Reply::Silent
            } else {
                Reply::Error(outcome.message)
            });
        };

        let (word, arg) = match command.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (command, ""),
        };

        let reply = match (word, arg) {
            ("quit" | "exit", _) => Reply::Quit,
            ("help", _) => Reply::Output(HELP.to_string()),
            ("reset", _) => {
                self.session.init()?;
                Reply::Output("session reset".to_string())
            }
            ("type" | "get", "") => Reply::Error(format!(":{} needs a global name", word)),
            ("type", name) => Reply::Output(self.session.get_type(name)?.to_string()),
            ("get", name) => Reply::Output(self.session.get_value(name)?.to_string()),
            _ => Reply::Error(format!("unknown command :{} (try :help)", word)),
        };
        Ok(reply)
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    match self.handle_line(&line)? {
                        Reply::Output(text) => println!("{text}"),
                        Reply::Error(text) => eprintln!("{text}"),
                        Reply::Silent => {}
                        Reply::Quit => break,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
