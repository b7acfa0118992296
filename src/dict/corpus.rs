use crate::dict::natural::Dictionary;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const NATURAL_HEADER: &str = "NATURAL:";
const FILETYPE_HEADER: &str = "FILETYPE:";

/// Bundled keyword dictionary used to seed a fresh data directory.
pub const EMBEDDED_KEYWORDS: &str = include_str!("../../data/keywords.txt");

/// A case-preserving word list with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
    index: HashSet<String>,
}

impl WordList {
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(&word.to_lowercase())
    }

    /// Returns false if the word was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.index.insert(word.to_lowercase()) {
            self.words.push(word.to_string());
            true
        } else {
            false
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Map a source path to the key of its file-type keyword list.
pub fn file_type_key(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// The keyword dictionary file: the global keyword list plus one list per
/// file extension.
///
/// ```text
/// NATURAL:
/// println
///
/// FILETYPE: py
/// kwargs
/// ```
#[derive(Debug, Clone)]
pub struct KeywordStore {
    path: PathBuf,
    global: WordList,
    filetypes: BTreeMap<String, WordList>,
}

impl KeywordStore {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| Error::io(path, e))?;
        // Strict: the store is rewritten in full on every add.
        let content = String::from_utf8(content).map_err(|e| {
            Error::Config(format!(
                "keyword dictionary \"{}\" is not valid UTF-8: {}",
                path.display(),
                e.utf8_error()
            ))
        })?;
        Ok(Self::parse(path, &content))
    }

    pub fn parse(path: &Path, content: &str) -> Self {
        let mut store = Self {
            path: path.to_path_buf(),
            global: WordList::default(),
            filetypes: BTreeMap::new(),
        };

        let mut section: Option<String> = None;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == NATURAL_HEADER {
                section = None;
            } else if let Some(ext) = line.strip_prefix(FILETYPE_HEADER) {
                let key = ext.trim().trim_start_matches('.').to_lowercase();
                store.filetypes.entry(key.clone()).or_default();
                section = Some(key);
            } else {
                match &section {
                    Some(key) => store.filetypes.entry(key.clone()).or_default().insert(line),
                    None => store.global.insert(line),
                };
            }
        }

        store
    }

    pub fn global(&self) -> &WordList {
        &self.global
    }

    pub fn filetype(&self, key: &str) -> Option<&WordList> {
        self.filetypes.get(&key.to_lowercase())
    }

    pub fn filetypes(&self) -> impl Iterator<Item = (&str, &WordList)> {
        self.filetypes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whole-token match against the global list and the list for `key`.
    pub fn contains(&self, word: &str, key: &str) -> bool {
        self.global.contains(word) || self.filetype(key).is_some_and(|list| list.contains(word))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(NATURAL_HEADER);
        out.push('\n');
        for word in self.global.words() {
            out.push_str(word);
            out.push('\n');
        }
        for (key, list) in &self.filetypes {
            out.push('\n');
            out.push_str(&format!("{} {}\n", FILETYPE_HEADER, key));
            for word in list.words() {
                out.push_str(word);
                out.push('\n');
            }
        }
        out
    }

    /// Rewrite the backing file and sync it before returning.
    pub fn save(&self) -> Result<()> {
        let persist = |source| Error::Persist {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(persist)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.render().as_bytes()).map_err(persist)?;
        let file = writer.into_inner().map_err(|e| persist(e.into_error()))?;
        file.sync_all().map_err(persist)?;

        Ok(())
    }

    fn insert_global(&mut self, word: &str) -> bool {
        self.global.insert(word)
    }

    fn insert_filetype(&mut self, word: &str, key: &str) -> bool {
        self.filetypes
            .entry(key.to_lowercase())
            .or_default()
            .insert(word)
    }
}

/// The layered dictionary: natural-language wordlist, global keywords and
/// per-file-type keywords.
#[derive(Debug)]
pub struct Corpora {
    natural: Dictionary,
    keywords: KeywordStore,
}

impl Corpora {
    pub fn new(natural: Dictionary, keywords: KeywordStore) -> Self {
        Self { natural, keywords }
    }

    pub fn open(natural_path: &Path, keyword_path: &Path) -> Result<Self> {
        let natural = Dictionary::load_from_path(natural_path)?;
        let keywords = KeywordStore::load(keyword_path)?;
        log::debug!(
            "loaded {} natural words and {} global keywords",
            natural.len(),
            keywords.global().len()
        );
        Ok(Self::new(natural, keywords))
    }

    /// Whole-token check against the keyword tiers for file type `key`.
    pub fn match_keyword(&self, token: &str, key: &str) -> bool {
        self.keywords.contains(token, key)
    }

    /// True if `word` is in any tier applicable to file type `key`.
    pub fn is_known(&self, word: &str, key: &str) -> bool {
        self.natural.contains(word) || self.keywords.contains(word, key)
    }

    /// Add to the keyword list for file type `key`, creating it if needed.
    ///
    /// Returns `Ok(false)` without touching the disk if already present.
    pub fn add_to_filetype(&mut self, word: &str, key: &str) -> Result<bool> {
        if !self.keywords.insert_filetype(word, key) {
            return Ok(false);
        }
        self.keywords.save()?;
        log::info!("added '{}' to the .{} keyword list", word, key);
        Ok(true)
    }

    /// Add to the global list that holds operator-accepted natural words.
    pub fn add_to_natural(&mut self, word: &str) -> Result<bool> {
        if !self.keywords.insert_global(word) {
            return Ok(false);
        }
        self.keywords.save()?;
        log::info!("added '{}' to the global word list", word);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const KEYWORDS: &str = "\
NATURAL:
println
Malloc

FILETYPE: py
kwargs
FILETYPE: .RS
impl
";

    fn corpora_in(dir: &Path) -> Corpora {
        let path = dir.join("keywords.txt");
        fs::write(&path, KEYWORDS).unwrap();
        let natural = Dictionary::from_words(["count", "retry", "hello"]).unwrap();
        Corpora::new(natural, KeywordStore::load(&path).unwrap())
    }

    fn occurrences(path: &Path, word: &str) -> usize {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|line| *line == word)
            .count()
    }

    #[test]
    fn test_parse_sections() {
        let store = KeywordStore::parse(Path::new("k.txt"), KEYWORDS);
        assert_eq!(store.global().words(), ["println", "Malloc"]);
        assert_eq!(store.filetype("py").unwrap().words(), ["kwargs"]);
        assert_eq!(store.filetype("rs").unwrap().words(), ["impl"]);
        assert!(store.filetype("go").is_none());
    }

    #[test]
    fn test_words_before_any_header_are_global() {
        let store = KeywordStore::parse(Path::new("k.txt"), "alpha\nbeta\nFILETYPE: c\ngamma\n");
        assert!(store.contains("alpha", "txt"));
        assert!(store.contains("gamma", "c"));
        assert!(!store.contains("gamma", "h"));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_and_keyed() {
        let dir = tempdir().unwrap();
        let corpora = corpora_in(dir.path());

        assert!(corpora.match_keyword("MALLOC", "c"));
        assert!(corpora.match_keyword("Kwargs", "py"));
        assert!(corpora.match_keyword("kwargs", "PY"));
        assert!(!corpora.match_keyword("kwargs", "rs"));
        assert!(!corpora.match_keyword("kwargs", ""));
        // Natural words are not whole-token keyword matches.
        assert!(!corpora.match_keyword("hello", "py"));
    }

    #[test]
    fn test_is_known_spans_all_tiers() {
        let dir = tempdir().unwrap();
        let corpora = corpora_in(dir.path());

        assert!(corpora.is_known("Retry", "py"));
        assert!(corpora.is_known("println", "py"));
        assert!(corpora.is_known("impl", "rs"));
        assert!(!corpora.is_known("impl", "py"));
        assert!(!corpora.is_known("frobnicate", "py"));
    }

    #[test]
    fn test_add_to_filetype_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut corpora = corpora_in(dir.path());
        let path = dir.path().join("keywords.txt");

        assert!(corpora.add_to_filetype("frobnicate", "py").unwrap());
        assert!(!corpora.add_to_filetype("Frobnicate", "py").unwrap());
        assert_eq!(occurrences(&path, "frobnicate"), 1);
        assert_eq!(occurrences(&path, "Frobnicate"), 0);

        assert!(corpora.is_known("frobnicate", "py"));
        assert!(!corpora.is_known("frobnicate", "rs"));
    }

    #[test]
    fn test_add_to_filetype_creates_new_list() {
        let dir = tempdir().unwrap();
        let mut corpora = corpora_in(dir.path());
        let path = dir.path().join("keywords.txt");

        corpora.add_to_filetype("goroutine", "GO").unwrap();

        let reloaded = KeywordStore::load(&path).unwrap();
        assert_eq!(reloaded.filetype("go").unwrap().words(), ["goroutine"]);
        assert_eq!(reloaded.filetype("py").unwrap().words(), ["kwargs"]);
        assert!(fs::read_to_string(&path).unwrap().contains("FILETYPE: go\n"));
    }

    #[test]
    fn test_add_to_natural_persists_globally() {
        let dir = tempdir().unwrap();
        let mut corpora = corpora_in(dir.path());
        let path = dir.path().join("keywords.txt");

        assert!(corpora.add_to_natural("serde").unwrap());
        assert!(!corpora.add_to_natural("serde").unwrap());
        assert_eq!(occurrences(&path, "serde"), 1);

        let reloaded = KeywordStore::load(&path).unwrap();
        assert!(reloaded.contains("serde", "anything"));
    }

    #[test]
    fn test_persistence_failure_is_reported() {
        let dir = tempdir().unwrap();
        let natural = Dictionary::from_words(["hello"]).unwrap();
        let store = KeywordStore::parse(&dir.path().join("missing/dir/keywords.txt"), "");
        let mut corpora = Corpora::new(natural, store);

        let err = corpora.add_to_natural("serde").unwrap_err();
        assert!(matches!(err, Error::Persist { .. }));
        // The word stays accepted for the rest of the run.
        assert!(corpora.is_known("serde", "rs"));
    }

    #[test]
    fn test_non_utf8_store_is_rejected_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        let content = b"NATURAL:\ncaf\xe9\nprintln\n".to_vec();
        fs::write(&path, &content).unwrap();

        let err = KeywordStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("keywords.txt"));
        assert_eq!(fs::read(&path).unwrap(), content);
    }

    #[test]
    fn test_file_type_key() {
        assert_eq!(file_type_key(Path::new("src/main.RS")), "rs");
        assert_eq!(file_type_key(Path::new("Makefile")), "");
        assert_eq!(file_type_key(Path::new("archive.tar.gz")), "gz");
    }

    #[test]
    fn test_embedded_keywords_parse() {
        let store = KeywordStore::parse(Path::new("k.txt"), EMBEDDED_KEYWORDS);
        assert!(store.contains("println", "c"));
        assert!(store.contains("kwargs", "py"));
        assert!(store.filetype("rs").is_some());
    }
}
