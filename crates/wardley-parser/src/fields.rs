//! Field parsers shared by the extraction passes.
//!
//! Statements are recognized by keyword, but the pieces inside them are
//! read with small winnow parsers:
//!
//! - coordinate brackets: `[0.4, 0.7]`, `[0.1, 0.2, 0.3, 0.4]`
//! - annotation occurrences: `[0.4, 0.7]` or `[[0.4, 0.7], [0.5, 0.2]]`
//! - trailing clauses: `label [x, y]`, `url(<ref>)`, `(build, market)`,
//!   `evolve <m>`, `inertia` and free words
//!
//! Every entry point takes the full statement text plus the byte offset to
//! start at, and reports spans relative to the statement text.

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::{alpha1, float, multispace0, multispace1},
    combinator::{alt, cut_err, delimited, peek, preceded, repeat, separated, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{take_until, take_while},
};

use wardley_core::document::{Decorator, Decorators, LabelOffset};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Rich diagnostic information for field errors.
///
/// Attached to winnow errors via `.context()`; the innermost context wins.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<FieldDiagnostic>>;

/// A field that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldError {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    span: Span,
}

impl FieldError {
    pub(crate) fn code(&self) -> ErrorCode {
        self.code
    }

    pub(crate) fn span(&self) -> Span {
        self.span
    }

    /// Turns the field error into a statement diagnostic.
    ///
    /// `subject` names the statement, e.g. ``component `Kettle` ``.
    pub(crate) fn into_diagnostic(self, line: usize, subject: &str) -> Diagnostic {
        let diagnostic = Diagnostic::error(format!("{} in {}", self.message, subject))
            .with_code(self.code)
            .with_line(line)
            .with_label(self.span, self.code.description());
        match self.help {
            Some(help) => diagnostic.with_help(help),
            None => diagnostic,
        }
    }
}

/// Trailing clauses of a statement, merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Clauses {
    pub(crate) label: Option<LabelOffset>,
    pub(crate) url: Option<String>,
    pub(crate) decorators: Decorators,
    pub(crate) evolve: Option<f64>,
    pub(crate) inertia: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Clause<'a> {
    Label(LabelOffset),
    Url(&'a str),
    Decorators(Vec<Decorator>),
    Evolve(f64),
    Word(&'a str),
}

/// A finite decimal. Rejects `inf` and `nan`, which `float` accepts.
fn decimal_value(input: &mut Input<'_>) -> IResult<f64> {
    float.verify(|value: &f64| value.is_finite()).parse_next(input)
}

/// A decimal with surrounding whitespace.
fn number(input: &mut Input<'_>) -> IResult<f64> {
    delimited(multispace0, decimal_value, multispace0).parse_next(input)
}

/// `[a, b, ...]` with at least one value.
fn bracket(input: &mut Input<'_>) -> IResult<Vec<f64>> {
    preceded('[', cut_err(terminated(separated(1.., number, ','), ']'))).parse_next(input)
}

/// A bracket holding exactly two values.
fn pair(input: &mut Input<'_>) -> IResult<(f64, f64)> {
    bracket
        .verify_map(|values: Vec<f64>| match values[..] {
            [a, b] => Some((a, b)),
            _ => None,
        })
        .parse_next(input)
}

/// `[[v, m], [v, m], ...]` or a single `[v, m]`.
fn occurrences(input: &mut Input<'_>) -> IResult<Vec<(f64, f64)>> {
    alt((
        preceded(
            ('[', multispace0, peek('[')),
            cut_err(terminated(
                separated(1.., delimited(multispace0, pair, multispace0), ','),
                ']',
            )),
        ),
        pair.map(|p| vec![p]),
    ))
    .parse_next(input)
}

fn label_clause<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    let start = input.current_token_start();
    preceded(
        ("label", multispace0, peek('[')),
        cut_err(pair).context(FieldDiagnostic {
            code: ErrorCode::E103,
            message: "malformed label clause",
            help: Some("write `label [<x>, <y>]`"),
            start,
        }),
    )
    .map(|(x, y)| Clause::Label(LabelOffset::new(x, y)))
    .parse_next(input)
}

fn url_clause<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    let start = input.current_token_start();
    preceded(
        ("url", multispace0, '('),
        cut_err(terminated(take_until(0.., ')'), ')')).context(FieldDiagnostic {
            code: ErrorCode::E103,
            message: "unterminated url clause",
            help: Some("write `url(<name>)`"),
            start,
        }),
    )
    .map(|reference: &str| Clause::Url(reference.trim()))
    .parse_next(input)
}

fn decorator_clause<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    delimited(
        '(',
        separated(
            1..,
            delimited(
                multispace0,
                alpha1.verify_map(Decorator::from_keyword),
                multispace0,
            ),
            ',',
        ),
        ')',
    )
    .map(Clause::Decorators)
    .parse_next(input)
}

fn evolve_clause<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    let start = input.current_token_start();
    preceded(
        ("evolve", multispace1),
        cut_err(decimal_value).context(FieldDiagnostic {
            code: ErrorCode::E103,
            message: "malformed evolve clause",
            help: Some("write `evolve <maturity>`"),
            start,
        }),
    )
    .map(Clause::Evolve)
    .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    take_while(1.., |c: char| !c.is_whitespace())
        .map(Clause::Word)
        .parse_next(input)
}

fn clause<'a>(input: &mut Input<'a>) -> IResult<Clause<'a>> {
    alt((label_clause, url_clause, decorator_clause, evolve_clause, word)).parse_next(input)
}

fn clause_list<'a>(input: &mut Input<'a>) -> IResult<Vec<Clause<'a>>> {
    terminated(repeat(0.., preceded(multispace0, clause)), multispace0).parse_next(input)
}

/// Runs `parser` over `text[from..]`.
///
/// On success returns the output and the absolute offset where parsing
/// stopped. On failure builds a [`FieldError`] from the innermost
/// [`FieldDiagnostic`], falling back to `fallback`.
fn run<'a, O>(
    text: &'a str,
    from: usize,
    mut parser: impl FnMut(&mut Input<'a>) -> IResult<O>,
    fallback: FieldDiagnostic,
) -> Result<(O, usize), FieldError> {
    let from = from.min(text.len());
    let mut input = LocatingSlice::new(&text[from..]);
    match parser(&mut input) {
        Ok(output) => Ok((output, from + input.current_token_start())),
        Err(err) => {
            let error_pos = input.current_token_start();
            let context_error = match err {
                ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
                ErrMode::Incomplete(_) => ContextError::new(),
            };
            let FieldDiagnostic {
                code,
                message,
                help,
                start,
            } = context_error.context().next().cloned().unwrap_or(fallback);
            let end = error_pos.max(start + 1);
            Err(FieldError {
                code,
                message,
                help,
                span: Span::new(from + start..(from + end).min(text.len())),
            })
        }
    }
}

/// Reads the coordinate bracket starting at `text[from]`.
///
/// Returns the values and the offset just past the closing `]`.
pub(crate) fn coordinates(text: &str, from: usize) -> Result<(Vec<f64>, usize), FieldError> {
    run(
        text,
        from,
        bracket,
        FieldDiagnostic {
            code: ErrorCode::E100,
            message: "malformed coordinates",
            help: Some("write comma separated decimals such as `[0.5, 0.7]`"),
            start: 0,
        },
    )
}

/// Reads annotation occurrences starting at `text[from]`.
pub(crate) fn annotation_occurrences(
    text: &str,
    from: usize,
) -> Result<(Vec<(f64, f64)>, usize), FieldError> {
    run(
        text,
        from,
        occurrences,
        FieldDiagnostic {
            code: ErrorCode::E100,
            message: "malformed annotation coordinates",
            help: Some("write `[<visibility>, <maturity>]` or `[[<v1>, <m1>], [<v2>, <m2>]]`"),
            start: 0,
        },
    )
}

/// Reads every trailing clause in `text[from..]`.
///
/// Unknown words are accepted and ignored, so this only fails on a clause
/// that started but could not be completed.
pub(crate) fn clauses(text: &str, from: usize) -> Result<Clauses, FieldError> {
    let (list, _) = run(
        text,
        from,
        clause_list,
        FieldDiagnostic {
            code: ErrorCode::E103,
            message: "malformed clause",
            help: None,
            start: 0,
        },
    )?;

    let mut clauses = Clauses::default();
    for clause in list {
        match clause {
            Clause::Label(label) => clauses.label = Some(label),
            Clause::Url(reference) => clauses.url = Some(reference.to_string()),
            Clause::Decorators(decorators) => {
                for decorator in decorators {
                    clauses.decorators.insert(decorator.into());
                }
            }
            Clause::Evolve(maturity) => clauses.evolve = Some(maturity),
            Clause::Word("inertia") => clauses.inertia = true,
            Clause::Word(_) => {}
        }
    }
    Ok(clauses)
}

/// Parses a standalone token as a finite decimal.
pub(crate) fn decimal(token: &str) -> Option<f64> {
    decimal_value.parse(LocatingSlice::new(token)).ok()
}

/// Whitespace separated tokens with their byte ranges.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> + '_ {
    text.split_whitespace().map(move |token| {
        let start = token.as_ptr() as usize - text.as_ptr() as usize;
        (start..start + token.len(), token)
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_coordinates_whitespace_tolerant() {
        let text = "component A [ 0.5 ,0.25 ] label [1, 2]";
        let (values, end) = coordinates(text, 12).unwrap();
        assert_eq!(values.len(), 2);
        assert_approx_eq!(f64, values[0], 0.5);
        assert_approx_eq!(f64, values[1], 0.25);
        assert_eq!(&text[end..], " label [1, 2]");
    }

    #[test]
    fn test_coordinates_four_values() {
        let (values, _) = coordinates("[0.1, 0.2, 0.3, 0.4]", 0).unwrap();
        assert_eq!(values, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_coordinates_out_of_range_kept() {
        let (values, _) = coordinates("[1.5, -0.2]", 0).unwrap();
        assert_eq!(values, vec![1.5, -0.2]);
    }

    #[test]
    fn test_coordinates_malformed() {
        let text = "component A [0.5, oops]";
        let err = coordinates(text, 12).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.span().start(), 12);
        assert!(err.span().end() <= text.len());
    }

    #[test]
    fn test_coordinates_unclosed() {
        let err = coordinates("[0.5, 0.5", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
    }

    #[test]
    fn test_coordinates_reject_non_finite() {
        assert!(coordinates("[nan, 0.5]", 0).is_err());
        assert!(coordinates("[0.5, inf]", 0).is_err());
    }

    #[test]
    fn test_annotation_occurrences() {
        let (single, _) = annotation_occurrences("[0.4, 0.7] text", 0).unwrap();
        assert_eq!(single, vec![(0.4, 0.7)]);

        let (many, end) = annotation_occurrences("[[0.4, 0.7], [0.5,0.2]] text", 0).unwrap();
        assert_eq!(many, vec![(0.4, 0.7), (0.5, 0.2)]);
        assert_eq!(end, 23);
    }

    #[test]
    fn test_annotation_occurrences_bad_pair() {
        let err = annotation_occurrences("[[0.4, 0.7, 0.1]] text", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
    }

    #[test]
    fn test_clauses_all_kinds() {
        let clauses =
            clauses(" label [-57, 4] inertia (buy, market) evolve 0.8 url(tea)", 0).unwrap();

        let label = clauses.label.unwrap();
        assert_approx_eq!(f64, label.x(), -57.0);
        assert_approx_eq!(f64, label.y(), 4.0);
        assert!(clauses.inertia);
        assert!(clauses.decorators.contains(Decorators::BUY));
        assert!(clauses.decorators.contains(Decorators::MARKET));
        assert_eq!(clauses.evolve, Some(0.8));
        assert_eq!(clauses.url.as_deref(), Some("tea"));
    }

    #[test]
    fn test_clauses_ignore_free_words() {
        let clauses = clauses(" some trailing words (unknown) labelled", 0).unwrap();
        assert_eq!(clauses, Clauses::default());
    }

    #[test]
    fn test_clauses_malformed_label() {
        let err = clauses(" label [1, 2, 3]", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E103);
        assert_eq!(err.span().start(), 1);
    }

    #[test]
    fn test_clauses_malformed_evolve() {
        let err = clauses(" evolve soon", 0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E103);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("0.62"), Some(0.62));
        assert_eq!(decimal("1"), Some(1.0));
        assert_eq!(decimal("0.6x"), None);
        assert_eq!(decimal("nan"), None);
    }

    #[test]
    fn test_tokens_offsets() {
        let text = "  Kettle->Electric  Kettle 0.62";
        let found: Vec<_> = tokens(text).collect();
        assert_eq!(found[0], (2..18, "Kettle->Electric"));
        assert_eq!(found[2], (27..31, "0.62"));
    }
}
