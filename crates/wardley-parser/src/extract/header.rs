//! Document-level statements: title, evolution stages and presentation.

use wardley_core::{document::EvolutionStages, geometry::Size};

use super::{PassResult, missing, offset_in, statement_span, strip_keyword};
use crate::{
    error::{Diagnostic, ErrorCode},
    fields,
    span::Span,
};

/// `title <text>`
pub fn title(line: usize, text: &str) -> PassResult<String> {
    let rest = strip_keyword(text, "title")?;
    let title = rest.trim();
    if title.is_empty() {
        return Some(Err(missing(
            line,
            text,
            "missing text in `title` statement".to_string(),
            "write `title <text>`",
        )));
    }
    Some(Ok(title.to_string()))
}

/// `evolution <L1>-><L2>-><L3>-><L4>`
///
/// Anything but four non-empty stages is an error; the caller keeps the
/// default stages.
pub fn evolution(line: usize, text: &str) -> PassResult<EvolutionStages> {
    let rest = strip_keyword(text, "evolution")?;
    let stages: Vec<&str> = rest.split("->").map(str::trim).collect();
    match <[&str; 4]>::try_from(stages.as_slice()) {
        Ok(labels) if labels.iter().all(|label| !label.is_empty()) => {
            Some(Ok(EvolutionStages::new(labels.map(str::to_string))))
        }
        _ => Some(Err(Diagnostic::error(format!(
            "expected four evolution stages, found {}",
            stages.iter().filter(|stage| !stage.is_empty()).count()
        ))
        .with_code(ErrorCode::E200)
        .with_line(line)
        .with_label(statement_span(text), ErrorCode::E200.description())
        .with_help("write `evolution Genesis->Custom-Built->Product->Commodity`; default stages are used"))),
    }
}

/// `style <name>`
pub fn style(line: usize, text: &str) -> PassResult<String> {
    let rest = strip_keyword(text, "style")?;
    match rest.split_whitespace().next() {
        Some(name) => Some(Ok(name.to_string())),
        None => Some(Err(missing(
            line,
            text,
            "missing name in `style` statement".to_string(),
            "write `style <name>`, for example `style wardley`",
        ))),
    }
}

/// `size [<width>, <height>]`
pub fn size(line: usize, text: &str) -> PassResult<Size> {
    let rest = strip_keyword(text, "size")?;
    let invalid = |message: String| {
        Diagnostic::error(message)
            .with_code(ErrorCode::E201)
            .with_line(line)
            .with_label(statement_span(text), ErrorCode::E201.description())
            .with_help("write `size [<width>, <height>]` with positive values")
    };

    let Some(bracket) = rest.find('[') else {
        return Some(Err(invalid("missing dimensions in `size` statement".to_string())));
    };
    let from = offset_in(text, rest) + bracket;
    Some(match fields::coordinates(text, from) {
        Ok((values, _)) => match values[..] {
            [width, height] if width > 0.0 && height > 0.0 => Ok(Size::new(width, height)),
            _ => Err(invalid(format!(
                "canvas size must be two positive values, found `{}`",
                values
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        },
        Err(_) => Err(invalid("malformed dimensions in `size` statement".to_string())),
    })
}

/// `annotations [<visibility>, <maturity>]`, the annotation legend position.
pub fn annotations_position(line: usize, text: &str) -> PassResult<(f64, f64)> {
    let rest = strip_keyword(text, "annotations")?;
    let Some(bracket) = rest.find('[') else {
        return Some(Err(missing(
            line,
            text,
            "missing coordinates in `annotations` statement".to_string(),
            "write `annotations [<visibility>, <maturity>]`",
        )));
    };
    let from = offset_in(text, rest) + bracket;
    Some(match fields::coordinates(text, from) {
        Ok((values, end)) => match values[..] {
            [visibility, maturity] => Ok((visibility, maturity)),
            _ => Err(Diagnostic::error(format!(
                "expected 2 coordinates in `annotations` statement, found {}",
                values.len()
            ))
            .with_code(ErrorCode::E100)
            .with_line(line)
            .with_label(Span::new(from..end), "expected `[<visibility>, <maturity>]`")),
        },
        Err(err) => Err(err.into_diagnostic(line, "`annotations` statement")),
    })
}
