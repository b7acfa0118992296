use crate::checker::correction::{Operator, CTRL_C};
use console::{Key, Term};
use dialoguer::Input;
use std::io;

/// Reads operator decisions from the controlling terminal.
#[derive(Debug, Clone)]
pub struct ConsoleOperator {
    term: Term,
}

impl ConsoleOperator {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

fn not_a_terminal() -> io::Error {
    io::Error::new(
        io::ErrorKind::NotConnected,
        "not a terminal; use --report-only for non-interactive runs",
    )
}

impl Operator for ConsoleOperator {
    fn read_key(&mut self) -> io::Result<char> {
        if !self.term.is_term() {
            return Err(not_a_terminal());
        }
        match self.term.read_key() {
            Ok(Key::Char(c)) => Ok(c),
            Ok(Key::Enter) => Ok('\n'),
            // Reported when the terminal cannot deliver keystrokes at all.
            Ok(Key::Unknown) => Err(not_a_terminal()),
            // Arrows, function keys and the like select nothing.
            Ok(_) => Ok('\0'),
            // The terminal is in raw mode, so Ctrl-C arrives as an interrupted read.
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(CTRL_C),
            Err(e) => Err(e),
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        if !self.term.is_term() {
            return Err(not_a_terminal());
        }
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map_err(|err| match err {
                dialoguer::Error::IO(e) => e,
            })
    }
}
