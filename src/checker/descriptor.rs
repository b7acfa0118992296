use std::cell::OnceCell;

/// Default number of lines shown around a match on request.
pub const CONTEXT_SIZE: usize = 4;

/// One token occurrence inside a text buffer.
///
/// The descriptor borrows the buffer, so it cannot outlive a rewrite of that
/// buffer: a rewritten buffer is always a new allocation, and a fresh
/// descriptor has to be taken against it.
#[derive(Debug)]
pub struct MatchDescriptor<'a> {
    data: &'a [u8],
    pos: usize,
    token: String,
    context_size: usize,
    location: OnceCell<Location>,
}

#[derive(Debug)]
struct Location {
    line_num: usize,
    line_start: usize,
    context: Vec<(usize, String)>,
}

impl<'a> MatchDescriptor<'a> {
    pub fn new(data: &'a [u8], pos: usize, token: impl Into<String>) -> Self {
        Self::with_context_size(data, pos, token, CONTEXT_SIZE)
    }

    pub fn with_context_size(
        data: &'a [u8],
        pos: usize,
        token: impl Into<String>,
        context_size: usize,
    ) -> Self {
        Self {
            data,
            pos,
            token: token.into(),
            context_size,
            location: OnceCell::new(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Offset just past the end of the token.
    pub fn end(&self) -> usize {
        self.pos + self.token.len()
    }

    /// Everything preceding the match.
    pub fn prefix(&self) -> &'a [u8] {
        &self.data[..self.pos]
    }

    /// The match and everything after it.
    pub fn remainder(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// 1-based line number of the match.
    pub fn line_num(&self) -> usize {
        self.location().line_num
    }

    /// 1-based byte column of the match within its line.
    pub fn column(&self) -> usize {
        self.pos - self.location().line_start + 1
    }

    /// Lines surrounding the match as `(line_num, text)` pairs.
    pub fn context(&self) -> &[(usize, String)] {
        &self.location().context
    }

    /// Text of the line holding the match.
    pub fn line_text(&self) -> &str {
        let line_num = self.line_num();
        self.context()
            .iter()
            .find(|(num, _)| *num == line_num)
            .map(|(_, text)| text.as_str())
            .unwrap_or_default()
    }

    fn location(&self) -> &Location {
        self.location.get_or_init(|| self.compute_location())
    }

    fn compute_location(&self) -> Location {
        let lines: Vec<&[u8]> = self.data.split(|&b| b == b'\n').collect();

        let mut offsets = Vec::with_capacity(lines.len());
        let mut ofs = 0;
        for line in &lines {
            offsets.push(ofs);
            ofs += line.len() + 1;
        }

        // The first line starting beyond the match is the one after it.
        let line_num = offsets
            .iter()
            .position(|&start| start > self.pos)
            .unwrap_or(lines.len());
        let line_start = offsets[line_num - 1];

        let half = (self.context_size / 2) as isize;
        let context = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let distance = (*i + 1) as isize - line_num as isize;
                (-half..=half).contains(&distance)
            })
            .map(|(i, line)| {
                let text = String::from_utf8_lossy(line);
                (i + 1, text.trim_end_matches(['\r', '\n']).to_string())
            })
            .collect();

        Location {
            line_num,
            line_start,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &[u8] = b"one\ntwo\nthree\nfour\nfive\nsix\nseven\n";

    fn at(token: &str) -> MatchDescriptor<'static> {
        let text = std::str::from_utf8(SOURCE).unwrap();
        MatchDescriptor::new(SOURCE, text.find(token).unwrap(), token)
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        assert_eq!(at("one").line_num(), 1);
        assert_eq!(at("four").line_num(), 4);
        assert_eq!(at("seven").line_num(), 7);
    }

    #[test]
    fn test_column() {
        let data = b"fn main() {\n    let x = frobnicate;\n}";
        let desc = MatchDescriptor::new(data, 24, "frobnicate");
        assert_eq!(desc.line_num(), 2);
        assert_eq!(desc.column(), 13);
        assert_eq!(desc.line_text(), "    let x = frobnicate;");
    }

    #[test]
    fn test_context_window_is_centered() {
        let desc = at("four");
        let lines: Vec<usize> = desc.context().iter().map(|(n, _)| *n).collect();
        assert_eq!(lines, vec![2, 3, 4, 5, 6]);
        assert_eq!(desc.context()[2], (4, "four".to_string()));
    }

    #[test]
    fn test_context_is_clipped_at_buffer_edges() {
        let first: Vec<usize> = at("one").context().iter().map(|(n, _)| *n).collect();
        assert_eq!(first, vec![1, 2, 3]);

        // The trailing newline produces an empty final line.
        let last: Vec<usize> = at("seven").context().iter().map(|(n, _)| *n).collect();
        assert_eq!(last, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_match_on_final_line_without_newline() {
        let data = b"alpha\nbeta";
        let desc = MatchDescriptor::new(data, 6, "beta");
        assert_eq!(desc.line_num(), 2);
        assert_eq!(desc.column(), 1);
    }

    #[test]
    fn test_carriage_returns_are_stripped() {
        let data = b"alpha\r\nbeta\r\n";
        let desc = MatchDescriptor::new(data, 7, "beta");
        assert_eq!(desc.line_text(), "beta");
        assert_eq!(desc.context()[0], (1, "alpha".to_string()));
    }

    #[test]
    fn test_prefix_and_remainder() {
        let data = b"let fooBar = 1;";
        let desc = MatchDescriptor::new(data, 4, "fooBar");
        assert_eq!(desc.prefix(), b"let ");
        assert_eq!(desc.remainder(), b"fooBar = 1;");
        assert_eq!(desc.end(), 10);
    }

    #[test]
    fn test_custom_context_size() {
        let text = std::str::from_utf8(SOURCE).unwrap();
        let desc = MatchDescriptor::with_context_size(SOURCE, text.find("four").unwrap(), "four", 2);
        let lines: Vec<usize> = desc.context().iter().map(|(n, _)| *n).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }
}
