use regex::bytes::Regex as BytesRegex;
use regex::Regex;

/// A maximal run of ASCII word characters found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub text: String,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Lexical scanner and identifier decomposer.
///
/// All patterns are compiled once in [`Tokenizer::new`]; a single instance is
/// shared by reference for the whole run.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    token: BytesRegex,
    hex: Regex,
    boundary: Regex,
    camel_word: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        // The patterns are literals; failure here is a programming error.
        Self {
            token: BytesRegex::new(r"(?-u:\w)+").expect("token pattern"),
            hex: Regex::new(r"^0x[0-9a-fA-F]+").expect("hex pattern"),
            boundary: Regex::new(r"[_0-9]+").expect("boundary pattern"),
            camel_word: Regex::new(r"[A-Z][a-z]*").expect("camel pattern"),
        }
    }

    /// Find the next token starting at or after `pos`.
    pub fn next_token(&self, data: &[u8], pos: usize) -> Option<Token> {
        if pos > data.len() {
            return None;
        }
        self.token.find_at(data, pos).map(|m| Token {
            start: m.start(),
            // Word characters are ASCII, so this never substitutes anything.
            text: String::from_utf8_lossy(m.as_bytes()).into_owned(),
        })
    }

    /// Tokens like `0x1F` look word-like but are numeric literals.
    pub fn is_hex_literal(&self, token: &str) -> bool {
        self.hex.is_match(token)
    }

    /// Divide a token into lower-cased sub-words.
    ///
    /// Runs of underscores and digits separate fragments. A fragment written
    /// entirely in capitals (`MAX` in `MAX_RETRY`) is kept whole; any other
    /// fragment is further split before each capital letter.
    pub fn decompose(&self, token: &str) -> Vec<String> {
        let mut subwords = Vec::new();

        for fragment in self.boundary.split(token).filter(|f| !f.is_empty()) {
            if is_all_caps(fragment) {
                subwords.push(fragment.to_lowercase());
            } else {
                subwords.extend(self.split_camel(fragment).map(str::to_lowercase));
            }
        }

        subwords
    }

    fn split_camel<'t>(&self, fragment: &'t str) -> impl Iterator<Item = &'t str> {
        let mut pieces = Vec::new();
        let mut last = 0;

        for m in self.camel_word.find_iter(fragment) {
            pieces.push(&fragment[last..m.start()]);
            pieces.push(m.as_str());
            last = m.end();
        }
        pieces.push(&fragment[last..]);

        pieces.into_iter().filter(|p| !p.is_empty())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_all_caps(fragment: &str) -> bool {
    fragment.chars().any(|c| c.is_uppercase()) && !fragment.chars().any(|c| c.is_lowercase())
}

/// Remove duplicates while keeping first-occurrence order.
pub fn make_unique(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
