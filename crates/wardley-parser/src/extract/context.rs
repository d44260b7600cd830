//! Statements that qualify elements declared elsewhere: `evolve` and the
//! sourcing methods `buy`, `build` and `outsource`.

use indexmap::{IndexMap, IndexSet};

use wardley_core::document::{EvolvedElement, Method, MethodDecoration};

use super::{PassResult, missing, offset_in, strip_keyword};
use crate::fields;

/// Clause keywords that end the name-and-maturity part of an `evolve`.
const EVOLVE_CLAUSE_STARTS: [&str; 4] = ["label", "(", "url", "inertia"];

/// Read-only facts gathered before elements are built.
#[derive(Debug, Clone, Default)]
pub struct ElementContext {
    evolving: IndexSet<String>,
    methods: IndexMap<String, Method>,
}

impl ElementContext {
    /// Indexes evolve targets and method decorations by element name.
    ///
    /// When one element has several method statements the last one wins.
    pub fn new(evolved: &[EvolvedElement], methods: &[MethodDecoration]) -> Self {
        Self {
            evolving: evolved.iter().map(|e| e.name().to_string()).collect(),
            methods: methods
                .iter()
                .map(|m| (m.target().to_string(), m.method()))
                .collect(),
        }
    }

    /// `true` if an `evolve` statement names `name`.
    pub fn is_evolving(&self, name: &str) -> bool {
        self.evolving.contains(name)
    }

    /// The sourcing method declared for `name`, if any.
    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.get(name).copied()
    }
}

/// Locates the maturity token of an `evolve` statement body.
///
/// The maturity is the last number before the first clause keyword. The
/// first token always belongs to the name, so `evolve 2 0.5` evolves `2`.
/// Returns the token's byte range within `rest`.
pub(crate) fn evolve_maturity_token(rest: &str) -> Option<std::ops::Range<usize>> {
    fields::tokens(rest)
        .skip(1)
        .take_while(|(_, token)| {
            !EVOLVE_CLAUSE_STARTS
                .iter()
                .any(|start| token.starts_with(start))
        })
        .filter(|(_, token)| fields::decimal(token).is_some())
        .map(|(range, _)| range)
        .last()
}

/// `evolve <name>[-><override>] <maturity> [label [x, y]] [(decorators)]`
pub fn evolve(line: usize, text: &str) -> PassResult<EvolvedElement> {
    let rest = strip_keyword(text, "evolve")?;
    let offset = offset_in(text, rest);

    let Some(token) = evolve_maturity_token(rest) else {
        let name = rest.trim();
        let message = if name.is_empty() {
            "missing name in `evolve` statement".to_string()
        } else {
            format!("missing maturity for evolved `{name}`")
        };
        return Some(Err(missing(
            line,
            text,
            message,
            "write `evolve <name> <maturity>`",
        )));
    };

    let head = rest[..token.start].trim();
    let (name, override_name) = match head.split_once("->") {
        Some((name, alias)) => (name.trim(), Some(alias.trim()).filter(|a| !a.is_empty())),
        None => (head, None),
    };
    if name.is_empty() {
        return Some(Err(missing(
            line,
            text,
            "missing name in `evolve` statement".to_string(),
            "write `evolve <name> <maturity>`",
        )));
    }
    let maturity = fields::decimal(&rest[token.clone()])?;

    let clauses = match fields::clauses(text, offset + token.end) {
        Ok(clauses) => clauses,
        Err(err) => return Some(Err(err.into_diagnostic(line, &format!("evolved `{name}`")))),
    };

    let mut evolved = EvolvedElement::new(name, maturity, line)
        .with_override_name(override_name.map(str::to_string))
        .with_decorators(clauses.decorators);
    if let Some(label) = clauses.label {
        evolved = evolved.with_label(label);
    }
    Some(Ok(evolved))
}

/// `buy|build|outsource <name>`
pub fn method(line: usize, text: &str) -> PassResult<MethodDecoration> {
    let (method, rest) = [Method::Buy, Method::Build, Method::Outsource]
        .into_iter()
        .find_map(|method| strip_keyword(text, method.keyword()).map(|rest| (method, rest)))?;

    let target = rest.trim();
    if target.is_empty() {
        return Some(Err(missing(
            line,
            text,
            format!("missing target in `{method}` statement"),
            "write `buy|build|outsource <component name>`",
        )));
    }
    Some(Ok(MethodDecoration::new(method, target, line)))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use wardley_core::document::Decorators;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_evolve_with_override_and_label() {
        let evolved = evolve(1, "evolve Kettle->Electric Kettle 0.62 label [16, 5]")
            .unwrap()
            .unwrap();

        assert_eq!(evolved.name(), "Kettle");
        assert_eq!(evolved.override_name(), Some("Electric Kettle"));
        assert_eq!(evolved.display_name(), "Electric Kettle");
        assert_approx_eq!(f64, evolved.maturity(), 0.62);
        assert_approx_eq!(f64, evolved.label().x(), 16.0);
        assert_approx_eq!(f64, evolved.label().y(), 5.0);
    }

    #[test]
    fn test_evolve_plain() {
        let evolved = evolve(3, "evolve Power 0.89").unwrap().unwrap();
        assert_eq!(evolved.name(), "Power");
        assert_eq!(evolved.override_name(), None);
        assert_eq!(evolved.line(), 3);
    }

    #[test]
    fn test_evolve_name_with_numbers() {
        let evolved = evolve(1, "evolve Web 2.0 0.8 (market)").unwrap().unwrap();
        assert_eq!(evolved.name(), "Web 2.0");
        assert_approx_eq!(f64, evolved.maturity(), 0.8);
        assert!(evolved.decorators().contains(Decorators::MARKET));
    }

    #[test]
    fn test_evolve_missing_maturity() {
        let err = evolve(2, "evolve Kettle").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.line(), Some(2));

        let err = evolve(2, "evolve").unwrap().unwrap_err();
        assert_eq!(err.message(), "missing name in `evolve` statement");
    }

    #[test]
    fn test_evolution_is_not_evolve() {
        assert!(evolve(1, "evolution A->B->C->D").is_none());
    }

    #[test]
    fn test_method() {
        let build = method(1, "build Kettle").unwrap().unwrap();
        assert_eq!(build.method(), Method::Build);
        assert_eq!(build.target(), "Kettle");

        assert!(method(1, "builder->Kettle").is_none());
        assert!(method(1, "outsource").unwrap().is_err());
    }

    #[test]
    fn test_context() {
        let evolved = vec![EvolvedElement::new("Kettle", 0.6, 1)];
        let methods = vec![
            MethodDecoration::new(Method::Buy, "Cup", 2),
            MethodDecoration::new(Method::Outsource, "Cup", 3),
        ];
        let context = ElementContext::new(&evolved, &methods);

        assert!(context.is_evolving("Kettle"));
        assert!(!context.is_evolving("Cup"));
        assert_eq!(context.method("Cup"), Some(Method::Outsource));
        assert_eq!(context.method("Kettle"), None);
    }
}
