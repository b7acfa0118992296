use crate::error::{Error, Result};
use fst::Set;
use std::fs;
use std::path::Path;

/// Bundled wordlist used to seed a fresh data directory.
pub const EMBEDDED_WORDLIST: &str = include_str!("../../data/english-words.txt");

/// The natural-language wordlist. Read-only for the whole run.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load a newline-delimited wordlist from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_words(String::from_utf8_lossy(&content).lines())
    }

    /// Build from any sequence of words. Case is folded, blanks dropped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort();
        words.dedup();

        let set = Set::from_iter(words)?;
        Ok(Self { set })
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.to_lowercase().as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &self.set.len())
            .finish()
    }
}
