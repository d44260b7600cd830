//! The extractor pipeline.
//!
//! # Overview
//!
//! A document is built by a fixed, ordered list of passes over the prepared
//! source. Every pass looks for one statement kind and is independent of the
//! others, with two exceptions:
//!
//! - `evolve` and `buy|build|outsource` run first. What they find is frozen
//!   into an [`ElementContext`] that the element passes read, so elements are
//!   created with their final `evolving` and method flags.
//! - The component and link passes read the body-blanked text, so pipeline
//!   bodies neither declare components nor raise link warnings.
//!
//! Single-line passes are plain functions of `(line_number, text)` returning
//! `None` when the line is not theirs, `Some(Ok(_))` for an entity and
//! `Some(Err(_))` for a diagnostic. Spans in those diagnostics are relative
//! to `text`; the driver rebases them onto the source.

mod annotation;
mod context;
mod element;
mod header;
mod link;
mod pipeline;

pub use annotation::{annotation, attitude, url};
pub use context::{ElementContext, evolve, method};
pub(crate) use context::evolve_maturity_token;
pub use element::{accelerator, anchor, element, note};
pub use header::{annotations_position, evolution, size, style, title};
pub use link::link;
pub use pipeline::{PipelineHeader, pipeline_component, pipeline_header, pipelines};

use std::collections::HashMap;

use log::{debug, trace};

use wardley_core::document::{Accelerator, Anchor, Document, Element, ElementKind, Presentation};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    source::{PreparedSource, SourceLine},
    span::Span,
};

/// What a single-line pass makes of one line.
pub type PassResult<T> = Option<Result<T, Diagnostic>>;

/// Statement keywords. A line starting with one of these is never a link.
pub const RESERVED_KEYWORDS: [&str; 21] = [
    "title",
    "evolution",
    "style",
    "size",
    "annotations",
    "annotation",
    "component",
    "anchor",
    "submap",
    "evolve",
    "pipeline",
    "note",
    "url",
    "pioneers",
    "settlers",
    "townplanners",
    "accelerator",
    "deaccelerator",
    "buy",
    "build",
    "outsource",
];

/// Strips a leading statement keyword.
///
/// The keyword must be followed by whitespace, `[` or the end of the line,
/// so `annotation` does not match `annotations` and `build` does not match
/// `builder->x`. Returns the text after the keyword.
///
/// # Example
///
/// ```
/// # use wardley_parser::extract::strip_keyword;
/// assert_eq!(strip_keyword("  note some text", "note"), Some(" some text"));
/// assert_eq!(strip_keyword("annotations [0.1, 0.2]", "annotation"), None);
/// assert_eq!(strip_keyword("size[800, 600]", "size"), Some("[800, 600]"));
/// ```
pub fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.trim_start().strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '[' => Some(rest),
        Some(_) => None,
    }
}

/// `true` if the line starts with any statement keyword.
pub fn is_reserved(text: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| strip_keyword(text, keyword).is_some())
}

/// Byte offset of `rest` inside `text`, for slices produced from `text`.
fn offset_in(text: &str, rest: &str) -> usize {
    rest.as_ptr() as usize - text.as_ptr() as usize
}

/// Span of the non-blank part of `text`.
fn statement_span(text: &str) -> Span {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    Span::new(start..end.max(start))
}

/// A missing-token diagnostic covering the whole statement.
fn missing(line: usize, text: &str, message: String, help: &str) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E101)
        .with_line(line)
        .with_label(statement_span(text), ErrorCode::E101.description())
        .with_help(help.to_string())
}

/// Runs one single-line pass over every line.
fn run_pass<T>(
    name: &'static str,
    lines: &[SourceLine],
    view: fn(&SourceLine) -> &str,
    mut pass: impl FnMut(usize, &str) -> PassResult<T>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<T> {
    let mut entities = Vec::new();
    let mut reported = 0;
    for line in lines {
        match pass(line.number(), view(line)) {
            None => {}
            Some(Ok(entity)) => entities.push(entity),
            Some(Err(diagnostic)) => {
                reported += 1;
                diagnostics.emit(diagnostic.shifted(line.span().start()));
            }
        }
    }
    debug!(pass = name, entities = entities.len(), diagnostics = reported; "Extraction pass finished");
    entities
}

/// Drops every declaration whose name was already declared earlier in the
/// source by the same kind, reporting each one as an `E104` error.
///
/// The survivors keep their pass order.
fn unique_by_name<T>(
    kind: &str,
    entities: Vec<T>,
    name: fn(&T) -> &str,
    line: fn(&T) -> usize,
    lines: &[SourceLine],
    diagnostics: &mut DiagnosticCollector,
) -> Vec<T> {
    let mut by_line: Vec<usize> = (0..entities.len()).collect();
    by_line.sort_by_key(|&i| line(&entities[i]));

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicate = vec![false; entities.len()];
    for i in by_line {
        let entity = &entities[i];
        let Some(&first) = first_seen.get(name(entity)) else {
            first_seen.insert(name(entity), line(entity));
            continue;
        };
        duplicate[i] = true;

        let number = line(entity);
        let mut diagnostic = Diagnostic::error(format!("duplicate {kind} `{}`", name(entity)))
            .with_code(ErrorCode::E104)
            .with_line(number)
            .with_help("names must be unique; rename or remove one declaration");
        if let Some(source_line) = lines.get(number - 1) {
            diagnostic = diagnostic.with_label(
                statement_span(source_line.text()).shifted(source_line.span().start()),
                "declaration skipped",
            );
        }
        if let Some(first_line) = lines.get(first - 1) {
            diagnostic = diagnostic.with_secondary_label(
                statement_span(first_line.text()).shifted(first_line.span().start()),
                "first declared here",
            );
        }
        diagnostics.emit(diagnostic);
    }

    entities
        .into_iter()
        .zip(duplicate)
        .filter_map(|(entity, duplicate)| (!duplicate).then_some(entity))
        .collect()
}

/// Builds a document from prepared source, reporting into `diagnostics`.
///
/// Every error diagnostic with a line, including those emitted before this
/// call, becomes one of the document's line errors.
pub(crate) fn extract(source: &PreparedSource, diagnostics: &mut DiagnosticCollector) -> Document {
    let lines = source.lines();
    let text = SourceLine::text as fn(&SourceLine) -> &str;
    let blanked = SourceLine::blanked as fn(&SourceLine) -> &str;

    let mut doc = Document::builder();

    if let Some(title) = run_pass("title", lines, text, title, diagnostics).pop() {
        doc.title(title);
    }
    if let Some(stages) = run_pass("evolution", lines, text, evolution, diagnostics).pop() {
        doc.evolution(stages);
    }

    let mut presentation = Presentation::default();
    if let Some(style) = run_pass("style", lines, text, style, diagnostics).pop() {
        presentation = presentation.with_style(style);
    }
    let canvas = run_pass("size", lines, text, size, diagnostics).pop();
    let annotations_at =
        run_pass("annotations", lines, text, annotations_position, diagnostics).pop();
    doc.presentation(
        presentation
            .with_size(canvas)
            .with_annotations_position(annotations_at),
    );

    let evolved = run_pass("evolve", lines, text, evolve, diagnostics);
    let methods = run_pass("method", lines, text, method, diagnostics);
    let context = ElementContext::new(&evolved, &methods);

    let mut elements = Vec::new();
    for kind in [ElementKind::Component, ElementKind::Submap] {
        elements.extend(run_pass(
            kind.keyword(),
            lines,
            blanked,
            |line, text| element(kind, line, text, &context),
            diagnostics,
        ));
    }
    for element in unique_by_name("element", elements, Element::name, Element::line, lines, diagnostics) {
        doc.element(element);
    }

    let anchors = run_pass("anchor", lines, text, anchor, diagnostics);
    for anchor in unique_by_name("anchor", anchors, Anchor::name, Anchor::line, lines, diagnostics) {
        doc.anchor(anchor);
    }

    let (pipelines, pipeline_diagnostics) = pipelines(lines);
    debug!(pass = "pipeline", entities = pipelines.len(), diagnostics = pipeline_diagnostics.len(); "Extraction pass finished");
    for diagnostic in pipeline_diagnostics {
        diagnostics.emit(diagnostic);
    }
    for pipeline in pipelines {
        doc.pipeline(pipeline);
    }

    for note in run_pass("note", lines, text, note, diagnostics) {
        doc.note(note);
    }
    for annotation in run_pass("annotation", lines, text, annotation, diagnostics) {
        doc.annotation(annotation);
    }
    for attitude in run_pass("attitude", lines, text, attitude, diagnostics) {
        doc.attitude(attitude);
    }
    let accelerators = run_pass("accelerator", lines, text, accelerator, diagnostics);
    for accelerator in unique_by_name(
        "accelerator",
        accelerators,
        Accelerator::name,
        Accelerator::line,
        lines,
        diagnostics,
    ) {
        doc.accelerator(accelerator);
    }
    for url in run_pass("url", lines, text, url, diagnostics) {
        doc.url(url);
    }
    for link in run_pass("link", lines, blanked, link, diagnostics) {
        doc.link(link);
    }

    for evolved in evolved {
        doc.evolved(evolved);
    }
    for method in methods {
        doc.method(method);
    }

    let mut errors: Vec<_> = diagnostics
        .diagnostics()
        .iter()
        .filter_map(Diagnostic::to_parse_error)
        .collect();
    errors.sort_by_key(|error| error.line());
    for error in errors {
        doc.error(error);
    }

    let doc = doc.build();
    trace!(doc:?; "Extracted document");
    doc
}
