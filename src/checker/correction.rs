use super::descriptor::MatchDescriptor;
use super::{SourceFile, SpellChecker};
use crate::cli::output;
use crate::error::{Error, Result};
use aho_corasick::AhoCorasick;
use std::io;

pub const CTRL_C: char = '\x03';
pub const CTRL_D: char = '\x04';
pub const CTRL_Z: char = '\x1a';

pub fn is_abort_key(key: char) -> bool {
    matches!(key, CTRL_C | CTRL_D | CTRL_Z)
}

/// Source of operator decisions.
pub trait Operator {
    /// Block until a single key is pressed.
    fn read_key(&mut self) -> io::Result<char>;

    /// Read a line of free text after showing `prompt`.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Operator choices for an escalated token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ignore,
    IgnoreAll,
    Replace,
    ReplaceAll,
    Add,
    ShowContext,
}

impl Action {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'i' | '\r' | '\n' => Some(Action::Ignore),
            'I' => Some(Action::IgnoreAll),
            'r' => Some(Action::Replace),
            'R' => Some(Action::ReplaceAll),
            'a' => Some(Action::Add),
            'c' => Some(Action::ShowContext),
            _ => None,
        }
    }
}

/// Operator choices for one sub-word in the dictionary add flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddChoice {
    Ignore,
    FileType,
    Natural,
}

impl AddChoice {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'i' | '\r' | '\n' => Some(AddChoice::Ignore),
            'p' => Some(AddChoice::FileType),
            'n' => Some(AddChoice::Natural),
            _ => None,
        }
    }
}

/// Where scanning continues once a token has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume {
    /// Buffer unchanged; continue at this offset.
    Continue(usize),
    /// The buffer was rewritten; continue in `data` at `offset`.
    Rewritten { data: Vec<u8>, offset: usize },
}

fn input_error(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::Interrupted {
        Error::Aborted
    } else {
        Error::Input(err)
    }
}

fn read_key<O: Operator + ?Sized>(operator: &mut O) -> Result<char> {
    let key = operator.read_key().map_err(input_error)?;
    if is_abort_key(key) {
        return Err(Error::Aborted);
    }
    Ok(key)
}

fn read_replacement<O: Operator + ?Sized>(operator: &mut O) -> Result<String> {
    let line = operator
        .read_line("      Replacement text")
        .map_err(input_error)?;
    if line.chars().any(is_abort_key) {
        return Err(Error::Aborted);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Substitute the first occurrence of the token at or after the match.
///
/// Returns the new buffer and the offset just past the inserted text.
pub fn replace_first(desc: &MatchDescriptor<'_>, replacement: &str) -> Result<(Vec<u8>, usize)> {
    let matcher = AhoCorasick::new([desc.token()])?;
    let tail = desc.remainder();

    let mut data = desc.prefix().to_vec();
    match matcher.find(tail) {
        Some(m) => {
            data.extend_from_slice(&tail[..m.start()]);
            data.extend_from_slice(replacement.as_bytes());
            data.extend_from_slice(&tail[m.end()..]);
        }
        None => data.extend_from_slice(tail),
    }

    Ok((data, desc.offset() + replacement.len()))
}

/// Substitute every occurrence of the token from the match onwards.
///
/// Text before the match is left alone.
pub fn replace_all(desc: &MatchDescriptor<'_>, replacement: &str) -> Result<(Vec<u8>, usize)> {
    let matcher = AhoCorasick::new([desc.token()])?;

    let mut data = desc.prefix().to_vec();
    data.extend(matcher.replace_all_bytes(desc.remainder(), &[replacement]));

    Ok((data, desc.offset() + replacement.len()))
}

impl SpellChecker {
    /// Escalate a failing token to the operator and carry out the decision.
    pub(crate) fn handle_failed_check<O: Operator + ?Sized>(
        &mut self,
        desc: &MatchDescriptor<'_>,
        source: &SourceFile<'_>,
        unmatched: &[String],
        operator: &mut O,
    ) -> Result<Resume> {
        let token = desc.token();
        output::print_unmatched(
            &source.name(),
            desc.line_num(),
            token,
            unmatched,
            self.colored,
        );

        loop {
            output::print_action_menu(self.colored);
            match Action::from_key(read_key(operator)?) {
                Some(Action::Ignore) => break,
                Some(Action::IgnoreAll) => {
                    self.ignores.insert(token.to_lowercase());
                    break;
                }
                Some(action @ (Action::Replace | Action::ReplaceAll)) => {
                    let replacement = read_replacement(operator)?;
                    if replacement.is_empty() {
                        output::print_not_replaced(self.colored);
                        break;
                    }
                    self.ignores.insert(replacement.to_lowercase());

                    let (data, offset) = if action == Action::Replace {
                        replace_first(desc, &replacement)?
                    } else {
                        replace_all(desc, &replacement)?
                    };
                    log::debug!(
                        "replaced '{}' with '{}' at offset {}",
                        token,
                        replacement,
                        desc.offset()
                    );
                    println!();
                    return Ok(Resume::Rewritten { data, offset });
                }
                Some(Action::Add) => {
                    self.handle_add(unmatched, source, operator)?;
                    break;
                }
                Some(Action::ShowContext) => {
                    output::print_context(desc.context(), desc.line_num(), self.colored);
                }
                None => {}
            }
        }

        println!();
        Ok(Resume::Continue(desc.end()))
    }

    /// Offer each unmatched sub-word for addition to a dictionary tier.
    fn handle_add<O: Operator + ?Sized>(
        &mut self,
        unmatched: &[String],
        source: &SourceFile<'_>,
        operator: &mut O,
    ) -> Result<()> {
        for subword in unmatched {
            let choice = loop {
                output::print_add_menu(subword, self.colored);
                if let Some(choice) = AddChoice::from_key(read_key(operator)?) {
                    break choice;
                }
            };

            let added = match choice {
                AddChoice::Ignore => continue,
                AddChoice::FileType => self.corpora.add_to_filetype(subword, source.key()),
                AddChoice::Natural => self.corpora.add_to_natural(subword),
            };
            if let Err(e) = added {
                log::error!("{}", e);
                output::print_error(&e.to_string(), self.colored);
            }
        }
        Ok(())
    }
}
