//! Source preparation ahead of extraction.
//!
//! # Overview
//!
//! Every extraction pass works on [`SourceLine`]s produced here in one go:
//!
//! 1. The text is split into lines, remembering each line's byte span in the
//!    original source so diagnostics can point back at it.
//! 2. Comments are blanked out. `//` runs to the end of the line and `/*`
//!    opens a block comment that may span lines. Neither is recognized on
//!    lines starting with `url` or inside an open `url(` clause, where paths
//!    routinely contain both.
//! 3. A second copy of every line is produced with pipeline `{ ... }` bodies
//!    blanked, for the passes that must not see pipeline children. Braces
//!    anywhere else are ordinary text.
//!
//! Blanking replaces text with spaces of equal byte length, so byte offsets
//! inside a prepared line are offsets inside the original line too.

use log::debug;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    extract::strip_keyword,
    span::Span,
};

/// One prepared line of map source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    number: usize,
    text: String,
    blanked: String,
    span: Span,
}

impl SourceLine {
    /// Creates a stand-alone line whose span starts at offset zero.
    ///
    /// Useful for running a single extraction pass outside a document.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let span = Span::new(0..text.len());
        Self {
            number,
            blanked: text.clone(),
            text,
            span,
        }
    }

    /// 1-based line number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Line text with comments blanked.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line text with comments and pipeline bodies blanked.
    pub fn blanked(&self) -> &str {
        &self.blanked
    }

    /// Byte span of the line in the original source, without its terminator.
    pub fn span(&self) -> Span {
        self.span
    }

    /// `true` when nothing but whitespace survived comment stripping.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A whole source text prepared for extraction.
#[derive(Debug, Clone, Default)]
pub struct PreparedSource {
    lines: Vec<SourceLine>,
}

impl AsRef<str> for SourceLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PreparedSource {
    /// Splits, strips and blanks `source`.
    ///
    /// An unterminated block comment is a warning. An unclosed pipeline
    /// body is an error on the line that opens it. Neither stops
    /// preparation.
    pub(crate) fn prepare(source: &str, diagnostics: &mut DiagnosticCollector) -> Self {
        let raw = split_lines(source);

        let mut stripper = CommentStripper::default();
        let stripped: Vec<String> = raw.iter().map(|(_, text)| stripper.strip(text)).collect();
        if let Some(opened) = stripper.opened_at {
            let (span, _) = raw[opened];
            diagnostics.emit(
                Diagnostic::warning("unterminated block comment")
                    .with_code(ErrorCode::E001)
                    .with_line(opened + 1)
                    .with_label(span, "comment starts here")
                    .with_help("close the comment with `*/`"),
            );
        }

        let mut blanked = stripped.clone();
        let mut index = 0;
        while index < stripped.len() {
            let body = strip_keyword(&stripped[index], "pipeline")
                .and_then(|_| find_body(&stripped, index));
            let Some((open, close)) = body else {
                index += 1;
                continue;
            };

            let end = close.unwrap_or(stripped.len() - 1);
            let mut blanker = BlockBlanker::default();
            for line in open..=end {
                blanked[line] = blanker.blank(&stripped[line]);
            }
            if close.is_none() {
                let (span, _) = raw[open];
                diagnostics.emit(
                    Diagnostic::error("unclosed pipeline body")
                        .with_code(ErrorCode::E002)
                        .with_line(open + 1)
                        .with_label(span, "body opens here")
                        .with_help("close the body with `}`; the rest of the file was read as pipeline components"),
                );
            }
            index = end + 1;
        }

        let lines: Vec<SourceLine> = raw
            .iter()
            .zip(stripped.into_iter().zip(blanked))
            .enumerate()
            .map(|(index, ((span, _), (text, blanked)))| SourceLine {
                number: index + 1,
                text,
                blanked,
                span: *span,
            })
            .collect();

        debug!(lines = lines.len(); "Prepared map source");
        Self { lines }
    }

    /// All prepared lines in source order.
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }
}

impl From<Vec<SourceLine>> for PreparedSource {
    fn from(lines: Vec<SourceLine>) -> Self {
        Self { lines }
    }
}

/// Finds the body opened by the pipeline header at `header`.
///
/// The body opens with a `{` ending the header line itself, or with a `{`
/// starting the next non-blank line. Returns the index of the line holding
/// that `{` and the index of the line holding the matching `}`, or `None` for
/// the close when the body runs to the end of the source.
pub(crate) fn find_body<S: AsRef<str>>(lines: &[S], header: usize) -> Option<(usize, Option<usize>)> {
    let open = if lines[header].as_ref().trim_end().ends_with('{') {
        header
    } else {
        let next = lines[header + 1..]
            .iter()
            .position(|line| !line.as_ref().trim().is_empty())
            .map(|i| header + 1 + i)?;
        if !lines[next].as_ref().trim_start().starts_with('{') {
            return None;
        }
        next
    };

    let mut depth = 0usize;
    for (index, line) in lines.iter().enumerate().skip(open) {
        for c in line.as_ref().chars() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((open, Some(index)));
                    }
                }
                _ => {}
            }
        }
    }
    Some((open, None))
}

/// Splits `source` on `\n`, dropping a trailing `\r` from each line.
fn split_lines(source: &str) -> Vec<(Span, &str)> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for piece in source.split('\n') {
        let text = piece.strip_suffix('\r').unwrap_or(piece);
        lines.push((Span::new(offset..offset + text.len()), text));
        offset += piece.len() + 1;
    }
    lines
}

/// Blanks every character of `text` in place with same-width spaces.
fn blank(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars()
        .flat_map(|c| std::iter::repeat_n(' ', c.len_utf8()))
}

/// Line-by-line comment remover carrying the "inside block comment" flag.
#[derive(Debug, Default)]
struct CommentStripper {
    line: usize,
    /// Line index of the currently open block comment.
    opened_at: Option<usize>,
}

impl CommentStripper {
    fn strip(&mut self, text: &str) -> String {
        let line = self.line;
        self.line += 1;

        let url_statement = text.trim_start().starts_with("url");
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        loop {
            if self.opened_at.is_some() {
                match rest.find("*/") {
                    Some(end) => {
                        out.extend(blank(&rest[..end + 2]));
                        rest = &rest[end + 2..];
                        self.opened_at = None;
                    }
                    None => {
                        out.extend(blank(rest));
                        return out;
                    }
                }
            }

            let (block, line_comment) = if url_statement {
                (None, None)
            } else {
                (find_comment(rest, "/*"), find_comment(rest, "//"))
            };

            match (block, line_comment) {
                (Some(b), Some(l)) if l < b => {
                    out.push_str(&rest[..l]);
                    return out;
                }
                (Some(b), _) => {
                    out.push_str(&rest[..b]);
                    out.extend(blank(&rest[b..b + 2]));
                    rest = &rest[b + 2..];
                    self.opened_at = Some(line);
                }
                (None, Some(l)) => {
                    out.push_str(&rest[..l]);
                    return out;
                }
                (None, None) => {
                    out.push_str(rest);
                    return out;
                }
            }
        }
    }
}

/// Finds `pattern` in `text`, skipping occurrences inside an open `url(`
/// clause.
fn find_comment(text: &str, pattern: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = text[from..].find(pattern).map(|i| from + i) {
        if !inside_url_clause(&text[..found]) {
            return Some(found);
        }
        from = found + pattern.len();
    }
    None
}

fn inside_url_clause(before: &str) -> bool {
    match before.rfind('(') {
        Some(open) => before[..open].trim_end().ends_with("url") && !before[open..].contains(')'),
        None => false,
    }
}

/// Blanks one pipeline body, tracking `{ ... }` nesting across its lines.
#[derive(Debug, Default)]
struct BlockBlanker {
    depth: usize,
}

impl BlockBlanker {
    fn blank(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '{' => {
                    self.depth += 1;
                    out.push(' ');
                }
                '}' if self.depth > 0 => {
                    self.depth -= 1;
                    out.push(' ');
                }
                _ if self.depth > 0 => out.extend(std::iter::repeat_n(' ', c.len_utf8())),
                _ => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepare(source: &str) -> (PreparedSource, Vec<Diagnostic>) {
        let mut diagnostics = DiagnosticCollector::new();
        let prepared = PreparedSource::prepare(source, &mut diagnostics);
        (prepared, diagnostics.into_diagnostics())
    }

    fn texts(prepared: &PreparedSource) -> Vec<&str> {
        prepared.lines().iter().map(|l| l.text().trim_end()).collect()
    }

    #[test]
    fn test_line_comment_removed() {
        let (prepared, diagnostics) = prepare("title T // comment\ncomponent A [0.5,0.5]");
        assert_eq!(texts(&prepared), vec!["title T", "component A [0.5,0.5]"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_url_line_keeps_double_slash() {
        let (prepared, _) = prepare("url X [http://example.com]");
        assert_eq!(texts(&prepared), vec!["url X [http://example.com]"]);
    }

    #[test]
    fn test_block_comment_across_lines_preserves_numbering() {
        let source = "title T\n/* first\nsecond */ component A [0.1, 0.2]\nanchor B [0.9, 0.3]";
        let (prepared, diagnostics) = prepare(source);
        let lines = prepared.lines();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_blank());
        assert_eq!(lines[2].text().trim(), "component A [0.1, 0.2]");
        assert_eq!(lines[3].number(), 4);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_inline_block_comment() {
        let (prepared, _) = prepare("component /* old */ A [0.1, 0.2]");
        let text = prepared.lines()[0].text();
        assert_eq!(text.len(), "component /* old */ A [0.1, 0.2]".len());
        assert_eq!(text.split_whitespace().collect::<Vec<_>>(), vec!["component", "A", "[0.1,", "0.2]"]);
    }

    #[test]
    fn test_unterminated_block_comment_warns() {
        let (prepared, diagnostics) = prepare("title T\n/* never closed\ncomponent A [0.1, 0.2]");
        assert!(prepared.lines()[2].is_blank());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E001));
        assert_eq!(diagnostics[0].line(), Some(2));
        assert!(diagnostics[0].severity().is_warning());
    }

    #[test]
    fn test_blocks_blanked_only_in_blanked_copy() {
        let source = "pipeline P {\n  component X [0.3]\n}\ncomponent Y [0.5, 0.5]";
        let (prepared, diagnostics) = prepare(source);
        let lines = prepared.lines();

        assert_eq!(lines[0].blanked().trim(), "pipeline P");
        assert!(lines[1].blanked().trim().is_empty());
        assert_eq!(lines[1].text().trim(), "component X [0.3]");
        assert!(lines[2].blanked().trim().is_empty());
        assert_eq!(lines[3].blanked(), "component Y [0.5, 0.5]");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unclosed_pipeline_body_is_an_error() {
        let (prepared, diagnostics) = prepare("pipeline P {\n  component X [0.3]");
        assert!(prepared.lines()[1].blanked().trim().is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
        assert_eq!(diagnostics[0].line(), Some(1));
        assert!(!diagnostics[0].severity().is_warning());
    }

    #[test]
    fn test_pipeline_body_on_next_line_is_blanked() {
        let source = "pipeline P\n\n{\n  component X [0.3]\n}\ncomponent Y [0.5, 0.5]";
        let (prepared, diagnostics) = prepare(source);
        let lines = prepared.lines();

        assert_eq!(lines[0].blanked(), "pipeline P");
        assert!(lines[3].blanked().trim().is_empty());
        assert_eq!(lines[5].blanked(), "component Y [0.5, 0.5]");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_braces_outside_pipelines_are_text() {
        let source = "annotation 1 [0.1, 0.2] Config {draft\ncomponent Cup [0.73, 0.78]\nnote a } b [0.3, 0.4]";
        let (prepared, diagnostics) = prepare(source);
        let lines = prepared.lines();

        assert_eq!(lines[0].blanked(), "annotation 1 [0.1, 0.2] Config {draft");
        assert_eq!(lines[1].blanked(), "component Cup [0.73, 0.78]");
        assert_eq!(lines[2].blanked(), "note a } b [0.3, 0.4]");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_url_clause_keeps_double_slash() {
        let (prepared, _) = prepare("component Site [0.5, 0.5] url(https://example.com) // owner");
        assert_eq!(texts(&prepared), vec!["component Site [0.5, 0.5] url(https://example.com)"]);
    }

    #[test]
    fn test_url_line_does_not_open_block_comment() {
        let (prepared, diagnostics) = prepare("url X [http://h/*x]\ncomponent A [0.5, 0.5]");
        assert_eq!(texts(&prepared), vec!["url X [http://h/*x]", "component A [0.5, 0.5]"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_spans_cover_original_lines() {
        let source = "title T\r\ncomponent A [0.5, 0.5]\r\n";
        let (prepared, _) = prepare(source);
        let second = &prepared.lines()[1];

        assert_eq!(&source[second.span().range()], "component A [0.5, 0.5]");
        assert_eq!(second.text(), "component A [0.5, 0.5]");
    }
}
