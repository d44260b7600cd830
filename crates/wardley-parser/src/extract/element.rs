//! Positioned statements: components, submaps, anchors, notes and
//! accelerators.

use wardley_core::document::{Accelerator, Anchor, Decorator, Element, ElementKind, Note};

use super::{ElementContext, PassResult, missing, offset_in, strip_keyword};
use crate::{
    error::{Diagnostic, ErrorCode},
    fields,
    span::Span,
};

/// `<keyword> <name> [<values>]` split into its parts.
#[derive(Debug)]
pub(crate) struct Positioned<'a> {
    pub(crate) name: &'a str,
    pub(crate) values: Vec<f64>,
    /// Offset just past the closing `]`.
    pub(crate) end: usize,
}

/// Reads a name followed by a bracket of exactly `arity` values.
///
/// `rest` must be a slice of `text` starting right after `keyword`; `noun`
/// names the statement in messages.
pub(crate) fn positioned<'a>(
    line: usize,
    text: &'a str,
    rest: &'a str,
    noun: &str,
    arity: usize,
) -> Result<Positioned<'a>, Diagnostic> {
    let offset = offset_in(text, rest);
    let expected = match arity {
        1 => "[<maturity>]",
        _ => "[<visibility>, <maturity>]",
    };

    let Some(bracket) = rest.find('[') else {
        let name = rest.trim();
        let message = if name.is_empty() {
            format!("missing name in `{noun}` statement")
        } else {
            format!("missing coordinates for {noun} `{name}`")
        };
        return Err(missing(
            line,
            text,
            message,
            &format!("write `{noun} <name> {expected}`"),
        ));
    };

    let name = rest[..bracket].trim();
    if name.is_empty() {
        return Err(missing(
            line,
            text,
            format!("missing name in `{noun}` statement"),
            &format!("write `{noun} <name> {expected}`"),
        ));
    }

    let from = offset + bracket;
    let subject = format!("{noun} `{name}`");
    let (values, end) =
        fields::coordinates(text, from).map_err(|err| err.into_diagnostic(line, &subject))?;
    if values.len() != arity {
        return Err(Diagnostic::error(format!(
            "expected {arity} coordinate{} for {subject}, found {}",
            if arity == 1 { "" } else { "s" },
            values.len()
        ))
        .with_code(ErrorCode::E100)
        .with_line(line)
        .with_label(Span::new(from..end), format!("expected `{expected}`")));
    }

    Ok(Positioned { name, values, end })
}

/// `component|submap <name> [<visibility>, <maturity>] <clauses>`
///
/// The element is created with the `evolving` flag and sourcing method that
/// `context` holds for its name, merged with its own clauses.
pub fn element(
    kind: ElementKind,
    line: usize,
    text: &str,
    context: &ElementContext,
) -> PassResult<Element> {
    let rest = strip_keyword(text, kind.keyword())?;
    Some(build_element(kind, line, text, rest, context))
}

fn build_element(
    kind: ElementKind,
    line: usize,
    text: &str,
    rest: &str,
    context: &ElementContext,
) -> Result<Element, Diagnostic> {
    let Positioned { name, values, end } = positioned(line, text, rest, kind.keyword(), 2)?;
    let clauses = fields::clauses(text, end)
        .map_err(|err| err.into_diagnostic(line, &format!("{} `{name}`", kind.keyword())))?;

    let mut element = Element::new(kind, name, values[0], values[1], line)
        .with_inertia(clauses.inertia)
        .with_decorators(clauses.decorators)
        .with_url(clauses.url)
        .with_evolving(context.is_evolving(name))
        .with_evolve_maturity(clauses.evolve);
    if let Some(label) = clauses.label {
        element = element.with_label(label);
    }
    if let Some(method) = context.method(name) {
        element = element.with_decorator(Decorator::from(method));
    }
    Ok(element)
}

/// `anchor <name> [<visibility>, <maturity>]`
pub fn anchor(line: usize, text: &str) -> PassResult<Anchor> {
    let rest = strip_keyword(text, "anchor")?;
    Some(
        positioned(line, text, rest, "anchor", 2)
            .map(|p| Anchor::new(p.name, p.values[0], p.values[1], line)),
    )
}

/// `note <text> [<visibility>, <maturity>]`
pub fn note(line: usize, text: &str) -> PassResult<Note> {
    let rest = strip_keyword(text, "note")?;
    Some(
        positioned(line, text, rest, "note", 2)
            .map(|p| Note::new(p.name, p.values[0], p.values[1], line)),
    )
}

/// `accelerator|deaccelerator <name> [<visibility>, <maturity>]`
pub fn accelerator(line: usize, text: &str) -> PassResult<Accelerator> {
    let (keyword, deaccelerator, rest) = [("accelerator", false), ("deaccelerator", true)]
        .into_iter()
        .find_map(|(keyword, flag)| strip_keyword(text, keyword).map(|rest| (keyword, flag, rest)))?;
    Some(
        positioned(line, text, rest, keyword, 2).map(|p| {
            Accelerator::new(p.name, p.values[0], p.values[1], line, deaccelerator)
        }),
    )
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use wardley_core::document::{Decorators, EvolvedElement, Method, MethodDecoration};

    use super::*;

    fn component(text: &str) -> PassResult<Element> {
        element(ElementKind::Component, 1, text, &ElementContext::default())
    }

    #[test]
    fn test_component_basic() {
        let cup = component("component Cup [0.73, 0.78]").unwrap().unwrap();
        assert_eq!(cup.name(), "Cup");
        assert_eq!(cup.kind(), ElementKind::Component);
        assert_approx_eq!(f64, cup.visibility(), 0.73);
        assert_approx_eq!(f64, cup.maturity(), 0.78);
        assert_approx_eq!(f64, cup.label().x(), 5.0);
        assert_approx_eq!(f64, cup.label().y(), -10.0);
        assert!(!cup.inertia());
        assert!(!cup.evolving());
    }

    #[test]
    fn test_component_with_clauses() {
        let kettle =
            component("component Kettle [0.43, 0.35] label [-57, 4] inertia (build) evolve 0.8")
                .unwrap()
                .unwrap();
        assert_approx_eq!(f64, kettle.label().x(), -57.0);
        assert!(kettle.inertia());
        assert!(kettle.decorators().contains(Decorators::BUILD));
        assert_eq!(kettle.evolve_maturity(), Some(0.8));
        assert!(kettle.evolving());
    }

    #[test]
    fn test_component_name_with_spaces() {
        let el = component("component  Hot Water  [0.52,0.80]").unwrap().unwrap();
        assert_eq!(el.name(), "Hot Water");
    }

    #[test]
    fn test_component_takes_context() {
        let context = ElementContext::new(
            &[EvolvedElement::new("Kettle", 0.62, 9)],
            &[MethodDecoration::new(Method::Outsource, "Kettle", 10)],
        );
        let kettle = element(ElementKind::Component, 2, "component Kettle [0.43, 0.35]", &context)
            .unwrap()
            .unwrap();
        assert!(kettle.evolving());
        assert!(kettle.decorators().contains(Decorators::OUTSOURCE));
    }

    #[test]
    fn test_submap_url() {
        let el = element(
            ElementKind::Submap,
            1,
            "submap Kettle [0.43, 0.35] url(kettleMap)",
            &ElementContext::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(el.kind(), ElementKind::Submap);
        assert_eq!(el.url(), Some("kettleMap"));
    }

    #[test]
    fn test_bare_component_is_one_error() {
        let err = component("component").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.message(), "missing name in `component` statement");
    }

    #[test]
    fn test_component_errors() {
        let err = component("component Cup").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = component("component [0.1, 0.2]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = component("component Cup [0.1, x]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));

        let err = component("component Cup [0.1, 0.2, 0.3]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(err.labels()[0].span(), Span::new(14..29));

        let err = component("component Cup [0.1, 0.2] label [1]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E103));
    }

    #[test]
    fn test_not_a_component() {
        assert!(component("anchor Business [0.95, 0.63]").is_none());
        assert!(component("componentry->x").is_none());
    }

    #[test]
    fn test_anchor_and_note() {
        let business = anchor(1, "anchor Business [0.95, 0.63]").unwrap().unwrap();
        assert_eq!(business.name(), "Business");

        let note = note(2, "note +a generally rising market [0.31, 0.53]").unwrap().unwrap();
        assert_eq!(note.text(), "+a generally rising market");
        assert_approx_eq!(f64, note.visibility(), 0.31);
    }

    #[test]
    fn test_accelerators() {
        let acc = accelerator(1, "accelerator Open Source [0.5, 0.6]").unwrap().unwrap();
        assert!(!acc.is_deaccelerator());
        assert_eq!(acc.name(), "Open Source");

        let dec = accelerator(2, "deaccelerator Regulation [0.5, 0.6]").unwrap().unwrap();
        assert!(dec.is_deaccelerator());

        let err = accelerator(3, "deaccelerator Regulation").unwrap().unwrap_err();
        assert_eq!(err.message(), "missing coordinates for deaccelerator `Regulation`");
    }
}
