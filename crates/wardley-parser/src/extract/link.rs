//! Links between named entities.
//!
//! Operators are tried from the most specific to the least specific, so
//! `+'5'<>` is not mistaken for `+<` and `+>` is not mistaken for `->`:
//!
//! | operator | meaning |
//! |----------|---------|
//! | `+'v'<>`, `+'v'<`, `+'v'>` | flow with a value |
//! | `+<>`, `+<`, `+>` | flow |
//! | `->` | dependency |
//!
//! `>` marks a future flow, `<` a past flow and `<>` both.

use wardley_core::document::{Flow, Link};

use super::{PassResult, is_reserved, statement_span};
use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// A link operator found on a line.
#[derive(Debug, Clone, PartialEq)]
struct Operator<'a> {
    /// Byte range of the whole operator.
    range: std::ops::Range<usize>,
    flow: Option<Flow>,
    value: Option<&'a str>,
}

/// Maps a flow direction suffix to `(future, past)`.
fn direction(suffix: &str) -> Option<(bool, bool, usize)> {
    if suffix.starts_with("<>") {
        Some((true, true, 2))
    } else if suffix.starts_with('<') {
        Some((false, true, 1))
    } else if suffix.starts_with('>') {
        Some((true, false, 1))
    } else {
        None
    }
}

/// `+'<value>'` followed by a direction.
fn valued_flow(text: &str) -> Option<Operator<'_>> {
    let mut search = 0;
    while let Some(found) = text[search..].find("+'") {
        let start = search + found;
        let value_start = start + 2;
        if let Some(quote) = text[value_start..].find('\'') {
            let value_end = value_start + quote;
            if let Some((future, past, len)) = direction(&text[value_end + 1..]) {
                return Some(Operator {
                    range: start..value_end + 1 + len,
                    flow: Some(Flow::new(future, past)),
                    value: Some(&text[value_start..value_end]),
                });
            }
        }
        search = start + 2;
    }
    None
}

fn find_operator(text: &str) -> Option<Operator<'_>> {
    if let Some(operator) = valued_flow(text) {
        return Some(operator);
    }
    for (symbol, future, past) in [("+<>", true, true), ("+<", false, true), ("+>", true, false)] {
        if let Some(start) = text.find(symbol) {
            return Some(Operator {
                range: start..start + symbol.len(),
                flow: Some(Flow::new(future, past)),
                value: None,
            });
        }
    }
    text.find("->").map(|start| Operator {
        range: start..start + 2,
        flow: None,
        value: None,
    })
}

/// `<start><op><end>[; <context>]`
///
/// Lines starting with a statement keyword are never links. A non-blank
/// line with no operator gets an advisory warning.
pub fn link(line: usize, text: &str) -> PassResult<Link> {
    if text.trim().is_empty() || is_reserved(text) {
        return None;
    }

    let Some(operator) = find_operator(text) else {
        return Some(Err(Diagnostic::warning(format!(
            "unrecognized statement `{}`",
            text.trim()
        ))
        .with_code(ErrorCode::E300)
        .with_line(line)
        .with_label(statement_span(text), "ignored")
        .with_help("statements start with a keyword such as `component`, links look like `A->B`")));
    };

    let start = text[..operator.range.start].trim();
    let tail = &text[operator.range.end..];
    let (end, context) = match tail.split_once(';') {
        Some((end, context)) => (end.trim(), Some(context.trim()).filter(|c| !c.is_empty())),
        None => (tail.trim(), None),
    };

    if start.is_empty() || end.is_empty() {
        let side = if start.is_empty() { "start" } else { "end" };
        return Some(Err(Diagnostic::error(format!("link is missing its {side} name"))
            .with_code(ErrorCode::E102)
            .with_line(line)
            .with_label(Span::new(operator.range.clone()), format!("no {side} name for this operator"))
            .with_secondary_label(statement_span(text), "link skipped")
            .with_help("write `<start>-><end>`")));
    }

    let link = match operator.flow {
        None => Link::dependency(start, end, line),
        Some(flow) => {
            let flow = match operator.value {
                Some(value) => flow.with_value(value),
                None => flow,
            };
            Link::flow(start, end, line, flow)
        }
    };
    Some(Ok(link.with_context(context.map(str::to_string))))
}
