//! Pipelines, the one statement that spans several lines.
//!
//! A header `pipeline <name> [<m1>, <m2>]` (or a bare `pipeline <name>`)
//! may open a `{ ... }` body, either on the header line itself or on the
//! next non-blank line. Every `component <name> [<maturity>]` line inside
//! the body becomes a child.

use log::trace;

use wardley_core::document::{Pipeline, PipelineComponent};

use super::{PassResult, element::positioned, strip_keyword};
use crate::{
    error::{Diagnostic, ErrorCode},
    fields,
    source::{SourceLine, find_body},
};

/// Header of a pipeline before its body is read.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineHeader {
    name: String,
    span: Option<(f64, f64)>,
    opens_block: bool,
}

impl PipelineHeader {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit `[m1, m2]` span, if one was written.
    pub fn span(&self) -> Option<(f64, f64)> {
        self.span
    }

    /// `true` when the header line itself ends with `{`.
    pub fn opens_block(&self) -> bool {
        self.opens_block
    }
}

/// `pipeline <name> [<m1>, <m2>]` or `pipeline <name>`, optionally ending
/// with `{`.
pub fn pipeline_header(line: usize, text: &str) -> PassResult<PipelineHeader> {
    let rest = strip_keyword(text, "pipeline")?;
    let trimmed = rest.trim_end();
    let (body, opens_block) = match trimmed.strip_suffix('{') {
        Some(body) => (body, true),
        None => (trimmed, false),
    };

    if !body.contains('[') {
        let name = body.trim();
        if name.is_empty() {
            return Some(Err(super::missing(
                line,
                text,
                "missing name in `pipeline` statement".to_string(),
                "write `pipeline <name> [<maturity1>, <maturity2>]`",
            )));
        }
        return Some(Ok(PipelineHeader {
            name: name.to_string(),
            span: None,
            opens_block,
        }));
    }

    Some(positioned(line, text, body, "pipeline", 2).map(|p| PipelineHeader {
        name: p.name.to_string(),
        span: Some((p.values[0], p.values[1])),
        opens_block,
    }))
}

/// `component <name> [<maturity>] [label [x, y]]` inside a pipeline body.
pub fn pipeline_component(line: usize, text: &str) -> PassResult<PipelineComponent> {
    let rest = strip_keyword(text, "component")?;
    let p = match positioned(line, text, rest, "component", 1) {
        Ok(p) => p,
        Err(diagnostic) => return Some(Err(diagnostic)),
    };
    let clauses = match fields::clauses(text, p.end) {
        Ok(clauses) => clauses,
        Err(err) => {
            return Some(Err(
                err.into_diagnostic(line, &format!("pipeline component `{}`", p.name))
            ));
        }
    };

    let mut child = PipelineComponent::new(p.name, p.values[0], line);
    if let Some(label) = clauses.label {
        child = child.with_label(label);
    }
    Some(Ok(child))
}

/// Extracts every pipeline with its children.
///
/// Diagnostics come back already rebased onto the original source.
pub fn pipelines(lines: &[SourceLine]) -> (Vec<Pipeline>, Vec<Diagnostic>) {
    let mut pipelines = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let header = match pipeline_header(line.number(), line.text()) {
            None => continue,
            Some(Err(diagnostic)) => {
                diagnostics.push(diagnostic.shifted(line.span().start()));
                continue;
            }
            Some(Ok(header)) => header,
        };

        let mut children = Vec::new();
        if let Some((open, close)) = find_body(lines, index) {
            let end = close.unwrap_or(lines.len());
            for body_line in &lines[open + 1..end.max(open + 1)] {
                if body_line.is_blank() {
                    continue;
                }
                match pipeline_component(body_line.number(), body_line.text()) {
                    Some(Ok(child)) => children.push(child),
                    Some(Err(diagnostic)) => {
                        diagnostics.push(diagnostic.shifted(body_line.span().start()));
                    }
                    None => {
                        let text = body_line.text();
                        let start = text.len() - text.trim_start().len();
                        let span = body_line
                            .span()
                            .sub(start..text.trim_end().len().max(start));
                        diagnostics.push(
                            Diagnostic::warning(format!(
                                "ignored statement in pipeline `{}`",
                                header.name
                            ))
                            .with_code(ErrorCode::E300)
                            .with_line(body_line.number())
                            .with_label(span, "not a pipeline component")
                            .with_help("pipeline bodies hold `component <name> [<maturity>]` lines"),
                        );
                    }
                }
            }
        }

        let (maturity1, maturity2, hidden) = match header.span {
            Some((m1, m2)) => (m1, m2, false),
            None => (0.0, 1.0, true),
        };
        trace!(name = header.name.as_str(), children = children.len(); "Pipeline extracted");
        pipelines.push(
            Pipeline::new(header.name, maturity1, maturity2, hidden, line.number())
                .with_children(children),
        );
    }

    (pipelines, diagnostics)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{error::DiagnosticCollector, source::PreparedSource};

    fn run(source: &str) -> (Vec<Pipeline>, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let prepared = PreparedSource::prepare(source, &mut collector);
        pipelines(prepared.lines())
    }

    #[test]
    fn test_header_with_span() {
        let header = pipeline_header(1, "pipeline Kettle [0.3, 0.8]").unwrap().unwrap();
        assert_eq!(header.name(), "Kettle");
        assert_eq!(header.span(), Some((0.3, 0.8)));
        assert!(!header.opens_block());
    }

    #[test]
    fn test_bare_header_opening_block() {
        let header = pipeline_header(1, "pipeline Kettle {").unwrap().unwrap();
        assert_eq!(header.name(), "Kettle");
        assert_eq!(header.span(), None);
        assert!(header.opens_block());
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(
            pipeline_header(1, "pipeline").unwrap().unwrap_err().code(),
            Some(ErrorCode::E101)
        );
        assert_eq!(
            pipeline_header(1, "pipeline Kettle [0.3]").unwrap().unwrap_err().code(),
            Some(ErrorCode::E100)
        );
    }

    #[test]
    fn test_pipeline_without_body() {
        let (pipelines, diagnostics) = run("pipeline Kettle [0.3, 0.8]\ncomponent X [0.1, 0.2]");
        assert_eq!(pipelines.len(), 1);
        assert!(!pipelines[0].hidden());
        assert!(pipelines[0].children().is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bare_pipeline_is_hidden() {
        let (pipelines, _) = run("pipeline Kettle");
        assert!(pipelines[0].hidden());
    }

    #[test]
    fn test_body_on_next_line_refits_span() {
        let source = "pipeline Kettle\n\n{\n  component Campfire Kettle [0.50] label [-60, 35]\n  component Electric Kettle [0.63]\n}\n";
        let (pipelines, diagnostics) = run(source);

        assert!(diagnostics.is_empty());
        let kettle = &pipelines[0];
        assert!(!kettle.hidden());
        assert_eq!(kettle.children().len(), 2);
        assert_eq!(kettle.children()[0].name(), "Campfire Kettle");
        assert_eq!(kettle.children()[0].line(), 4);
        assert_approx_eq!(f64, kettle.children()[0].label().x(), -60.0);
        assert_approx_eq!(f64, kettle.maturity1(), 0.50);
        assert_approx_eq!(f64, kettle.maturity2(), 0.63);
    }

    #[test]
    fn test_body_child_errors_are_reported() {
        let source = "pipeline Kettle [0.3, 0.8] {\n  component Broken [0.5, 0.6]\n  frobnicate\n  component Fine [0.4]\n}";
        let (pipelines, diagnostics) = run(source);

        assert_eq!(pipelines[0].children().len(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
        assert_eq!(diagnostics[0].line(), Some(2));
        assert!(diagnostics[1].severity().is_warning());
        assert_eq!(diagnostics[1].line(), Some(3));
    }

    #[test]
    fn test_brace_not_following_is_no_body() {
        let (pipelines, _) = run("pipeline Kettle [0.3, 0.8]\ncomponent A [0.1, 0.2]\n{\n component B [0.4]\n}");
        assert!(pipelines[0].children().is_empty());
    }

    #[test]
    fn test_unclosed_body_runs_to_end() {
        let (pipelines, _) = run("pipeline Kettle {\n  component A [0.4]\n  component B [0.6]");
        assert_eq!(pipelines[0].children().len(), 2);
    }

    #[test]
    fn test_nested_braces_stay_in_body() {
        let source = "pipeline Kettle {\n  component A [0.4] label [1, 2]\n  { }\n}\ncomponent B [0.6, 0.6]";
        let mut collector = DiagnosticCollector::new();
        let prepared = PreparedSource::prepare(source, &mut collector);

        assert!(collector.diagnostics().is_empty());
        assert_eq!(prepared.lines()[4].blanked(), "component B [0.6, 0.6]");
        assert_eq!(pipelines(prepared.lines()).0[0].children().len(), 1);
    }
}
