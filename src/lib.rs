//! scspell -- an interactive, conservative spell checker for source code.
//!
//! Identifier-like tokens are split into sub-words at underscore, digit and
//! camel-case boundaries and checked against a layered dictionary: a
//! natural-language wordlist, a global keyword list and per-file-type keyword
//! lists. Unknown tokens are escalated to an operator who can ignore, replace
//! or extend the dictionaries.

pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;

pub use checker::SpellChecker;
pub use config::Config;
pub use dict::corpus::Corpora;
pub use error::{Error, Result};

/// Outcome of checking one file.
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub escalations: usize,
    pub rewritten: bool,
    pub skipped: bool,
    pub errors: Vec<SpellError>,
}

/// A token that failed the dictionary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellError {
    pub word: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub unmatched: Vec<String>,
}
