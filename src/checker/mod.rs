pub mod correction;
pub mod descriptor;
pub mod tokenizer;

use crate::cli::output;
use crate::dict::corpus::{file_type_key, Corpora};
use crate::error::{Error, Result};
use crate::{Config, FileReport, SpellError};
use correction::{Operator, Resume};
use descriptor::MatchDescriptor;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tokenizer::{make_unique, Tokenizer};

/// A source file being checked, with its file-type key.
#[derive(Debug, Clone)]
pub struct SourceFile<'p> {
    path: &'p Path,
    key: String,
}

impl<'p> SourceFile<'p> {
    pub fn new(path: &'p Path) -> Self {
        Self {
            path,
            key: file_type_key(path),
        }
    }

    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

pub struct SpellChecker {
    tokenizer: Tokenizer,
    corpora: Corpora,
    /// Lower-cased words accepted for the rest of the run.
    ignores: HashSet<String>,
    len_threshold: usize,
    context_size: usize,
    colored: bool,
    /// Tokens escalated to the operator so far.
    escalations: usize,
}

impl SpellChecker {
    pub fn new(config: &Config, corpora: Corpora) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            corpora,
            ignores: HashSet::new(),
            len_threshold: config.checker.len_threshold,
            context_size: config.checker.context_size,
            colored: true,
            escalations: 0,
        }
    }

    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// The sub-words of `token` that no applicable tier knows about.
    ///
    /// Empty when the token is session-ignored, a hex literal, or a keyword
    /// for file type `key`. Short sub-words are presumed abbreviations.
    pub fn unmatched_subwords(&self, token: &str, key: &str) -> Vec<String> {
        if self.ignores.contains(&token.to_lowercase()) || self.tokenizer.is_hex_literal(token) {
            return Vec::new();
        }
        if self.corpora.match_keyword(token, key) {
            return Vec::new();
        }

        let unmatched = self
            .tokenizer
            .decompose(token)
            .into_iter()
            .filter(|st| {
                st.len() > self.len_threshold
                    && !self.ignores.contains(st)
                    && !self.corpora.is_known(st, key)
            })
            .collect();

        make_unique(unmatched)
    }

    /// Check one token, escalating to the operator if it fails.
    pub fn check_token<O: Operator + ?Sized>(
        &mut self,
        desc: &MatchDescriptor<'_>,
        source: &SourceFile<'_>,
        operator: &mut O,
    ) -> Result<Resume> {
        let unmatched = self.unmatched_subwords(desc.token(), source.key());
        if unmatched.is_empty() {
            return Ok(Resume::Continue(desc.end()));
        }
        self.escalations += 1;
        log::debug!(
            "{}: escalating '{}' at offset {}",
            source.name(),
            desc.token(),
            desc.offset()
        );
        self.handle_failed_check(desc, source, &unmatched, operator)
    }

    /// Run the interactive loop over a whole buffer.
    ///
    /// Returns the final buffer and the number of escalations.
    pub fn check_buffer<O: Operator + ?Sized>(
        &mut self,
        mut data: Vec<u8>,
        source: &SourceFile<'_>,
        operator: &mut O,
    ) -> Result<(Vec<u8>, usize)> {
        let mut pos = 0;
        let before = self.escalations;

        while let Some(token) = self.tokenizer.next_token(&data, pos) {
            let resume = {
                let desc = MatchDescriptor::with_context_size(
                    &data,
                    token.start,
                    token.text,
                    self.context_size,
                );
                self.check_token(&desc, source, operator)?
            };
            match resume {
                Resume::Continue(next) => pos = next,
                Resume::Rewritten { data: rewritten, offset } => {
                    data = rewritten;
                    pos = offset;
                }
            }
        }

        Ok((data, self.escalations - before))
    }

    /// Interactively check a file and write it back if anything changed.
    ///
    /// Read and write failures are reported and do not stop the run; only an
    /// operator abort is returned as an error.
    pub fn check_file<O: Operator + ?Sized>(
        &mut self,
        path: &Path,
        operator: &mut O,
    ) -> Result<FileReport> {
        log::debug!("checking {}", path.display());
        let source = SourceFile::new(path);

        let original = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                let err = Error::io(path, e);
                log::warn!("{}", err);
                output::print_read_error(path, &err, self.colored);
                return Ok(FileReport {
                    skipped: true,
                    ..Default::default()
                });
            }
        };

        let (data, escalations) = self.check_buffer(original.clone(), &source, operator)?;
        let mut report = FileReport {
            escalations,
            ..Default::default()
        };

        if data != original {
            match fs::write(path, &data) {
                Ok(()) => report.rewritten = true,
                Err(e) => {
                    let err = Error::io(path, e);
                    log::error!("{}", err);
                    output::print_error(&err.to_string(), self.colored);
                }
            }
        }

        Ok(report)
    }

    /// Collect failing tokens without prompting or rewriting.
    pub fn report_buffer(&self, data: &[u8], source: &SourceFile<'_>) -> Vec<SpellError> {
        let mut errors = Vec::new();
        let mut pos = 0;

        while let Some(token) = self.tokenizer.next_token(data, pos) {
            pos = token.end();
            let unmatched = self.unmatched_subwords(&token.text, source.key());
            if unmatched.is_empty() {
                continue;
            }

            let desc =
                MatchDescriptor::with_context_size(data, token.start, token.text, self.context_size);
            errors.push(SpellError {
                word: desc.token().to_string(),
                line: desc.line_num(),
                column: desc.column(),
                context: desc.line_text().trim().to_string(),
                unmatched,
            });
        }

        errors
    }

    pub fn report_file(&self, path: &Path) -> FileReport {
        let source = SourceFile::new(path);
        match fs::read(path) {
            Ok(data) => {
                let errors = self.report_buffer(&data, &source);
                FileReport {
                    escalations: errors.len(),
                    errors,
                    ..Default::default()
                }
            }
            Err(e) => {
                let err = Error::io(path, e);
                log::warn!("{}", err);
                output::print_read_error(path, &err, self.colored);
                FileReport {
                    skipped: true,
                    ..Default::default()
                }
            }
        }
    }
}
