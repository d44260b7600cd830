//! Positioned map entities: elements, anchors, notes, accelerators and
//! evolved projections.

use std::fmt;

use bitflags::bitflags;

/// The two element variants. A submap renders distinctly but is
/// positioned, linked and diffed exactly like a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Component,
    Submap,
}

impl ElementKind {
    /// The statement keyword declaring this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ElementKind::Component => "component",
            ElementKind::Submap => "submap",
        }
    }
}

/// A parenthesized decorator keyword such as `(buy)` or `(market)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decorator {
    Ecosystem,
    Market,
    Buy,
    Build,
    Outsource,
}

impl Decorator {
    const ALL: [Decorator; 5] = [
        Decorator::Ecosystem,
        Decorator::Market,
        Decorator::Buy,
        Decorator::Build,
        Decorator::Outsource,
    ];

    /// Looks up a decorator by its source keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.keyword() == keyword)
    }

    /// The source keyword for this decorator.
    pub fn keyword(self) -> &'static str {
        match self {
            Decorator::Ecosystem => "ecosystem",
            Decorator::Market => "market",
            Decorator::Buy => "buy",
            Decorator::Build => "build",
            Decorator::Outsource => "outsource",
        }
    }

    /// Returns `true` for the sourcing-method decorators.
    pub fn is_method(self) -> bool {
        matches!(self, Decorator::Buy | Decorator::Build | Decorator::Outsource)
    }

}

impl fmt::Display for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

bitflags! {
    /// Set of decorator flags carried by an element.
    ///
    /// ```
    /// # use wardley_core::document::{Decorator, Decorators};
    /// let decorators = Decorators::MARKET | Decorators::from(Decorator::Buy);
    ///
    /// assert!(decorators.contains(Decorators::BUY));
    /// assert_eq!(decorators.method(), Some(Decorator::Buy));
    /// ```
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Decorators: u8 {
        const ECOSYSTEM = 1;
        const MARKET = 1 << 1;
        const BUY = 1 << 2;
        const BUILD = 1 << 3;
        const OUTSOURCE = 1 << 4;
    }
}

impl From<Decorator> for Decorators {
    fn from(decorator: Decorator) -> Self {
        match decorator {
            Decorator::Ecosystem => Decorators::ECOSYSTEM,
            Decorator::Market => Decorators::MARKET,
            Decorator::Buy => Decorators::BUY,
            Decorator::Build => Decorators::BUILD,
            Decorator::Outsource => Decorators::OUTSOURCE,
        }
    }
}

impl Decorators {
    /// The set decorators as keywords, in a stable order.
    pub fn kinds(self) -> impl Iterator<Item = Decorator> {
        Decorator::ALL
            .into_iter()
            .filter(move |d| self.contains((*d).into()))
    }

    /// The first sourcing method set, if any.
    pub fn method(self) -> Option<Decorator> {
        self.kinds().find(|d| d.is_method())
    }
}

/// Offset of an element's label from its position, in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOffset {
    x: f64,
    y: f64,
}

impl LabelOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Default for LabelOffset {
    fn default() -> Self {
        Self { x: 5.0, y: -10.0 }
    }
}

/// A component or submap declaration.
///
/// # Examples
///
/// ```
/// # use wardley_core::document::{Decorator, Decorators, Element, ElementKind};
/// let kettle = Element::new(ElementKind::Component, "Kettle", 0.43, 0.35, 3)
///     .with_inertia(true)
///     .with_decorator(Decorator::Build);
///
/// assert_eq!(kettle.name(), "Kettle");
/// assert!(kettle.inertia());
/// assert!(kettle.decorators().contains(Decorators::BUILD));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    name: String,
    visibility: f64,
    maturity: f64,
    line: usize,
    label: LabelOffset,
    inertia: bool,
    evolving: bool,
    evolved: bool,
    decorators: Decorators,
    url: Option<String>,
    evolve_maturity: Option<f64>,
}

impl Element {
    pub fn new(
        kind: ElementKind,
        name: impl Into<String>,
        visibility: f64,
        maturity: f64,
        line: usize,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            visibility,
            maturity,
            line,
            label: LabelOffset::default(),
            inertia: false,
            evolving: false,
            evolved: false,
            decorators: Decorators::default(),
            url: None,
            evolve_maturity: None,
        }
    }

    pub fn with_label(mut self, label: LabelOffset) -> Self {
        self.label = label;
        self
    }

    pub fn with_inertia(mut self, inertia: bool) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn with_evolving(mut self, evolving: bool) -> Self {
        self.evolving = evolving;
        self
    }

    pub fn with_decorators(mut self, decorators: Decorators) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.insert(decorator.into());
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Sets an inline `evolve <m>` target. Such an element is also evolving.
    pub fn with_evolve_maturity(mut self, maturity: Option<f64>) -> Self {
        self.evolving |= maturity.is_some();
        self.evolve_maturity = maturity;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// 1-based source line of the declaring statement.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn label(&self) -> LabelOffset {
        self.label
    }

    pub fn inertia(&self) -> bool {
        self.inertia
    }

    /// Whether an evolved position exists for this element.
    pub fn evolving(&self) -> bool {
        self.evolving
    }

    /// Whether this element is itself an evolved projection.
    pub fn evolved(&self) -> bool {
        self.evolved
    }

    pub fn decorators(&self) -> Decorators {
        self.decorators
    }

    /// Name of the `url` entry this element refers to, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn evolve_maturity(&self) -> Option<f64> {
        self.evolve_maturity
    }
}

/// An anchor: a user or need at the top of the value chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    name: String,
    visibility: f64,
    maturity: f64,
    line: usize,
}

impl Anchor {
    pub fn new(name: impl Into<String>, visibility: f64, maturity: f64, line: usize) -> Self {
        Self {
            name: name.into(),
            visibility,
            maturity,
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Free text placed on the map. Its text doubles as its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    text: String,
    visibility: f64,
    maturity: f64,
    line: usize,
}

impl Note {
    pub fn new(text: impl Into<String>, visibility: f64, maturity: f64, line: usize) -> Self {
        Self {
            text: text.into(),
            visibility,
            maturity,
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// An accelerator (or, with the flag set, a deaccelerator) arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct Accelerator {
    name: String,
    visibility: f64,
    maturity: f64,
    line: usize,
    deaccelerator: bool,
}

impl Accelerator {
    pub fn new(
        name: impl Into<String>,
        visibility: f64,
        maturity: f64,
        line: usize,
        deaccelerator: bool,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            maturity,
            line,
            deaccelerator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_deaccelerator(&self) -> bool {
        self.deaccelerator
    }
}

/// A second, evolved position of an existing element.
///
/// It never replaces the element it names; the renderer draws both and
/// joins them with a dashed link.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolvedElement {
    name: String,
    override_name: Option<String>,
    maturity: f64,
    label: LabelOffset,
    line: usize,
    decorators: Decorators,
}

impl EvolvedElement {
    pub fn new(name: impl Into<String>, maturity: f64, line: usize) -> Self {
        Self {
            name: name.into(),
            override_name: None,
            maturity,
            label: LabelOffset::default(),
            line,
            decorators: Decorators::default(),
        }
    }

    pub fn with_override_name(mut self, override_name: Option<String>) -> Self {
        self.override_name = override_name;
        self
    }

    pub fn with_label(mut self, label: LabelOffset) -> Self {
        self.label = label;
        self
    }

    pub fn with_decorators(mut self, decorators: Decorators) -> Self {
        self.decorators = decorators;
        self
    }

    /// Name of the element being evolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn override_name(&self) -> Option<&str> {
        self.override_name.as_deref()
    }

    /// The name shown at the evolved position.
    pub fn display_name(&self) -> &str {
        self.override_name.as_deref().unwrap_or(&self.name)
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn label(&self) -> LabelOffset {
        self.label
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn decorators(&self) -> Decorators {
        self.decorators
    }

    /// Projects `source` onto the evolved maturity, keeping its visibility.
    ///
    /// The result is marked `evolved` and carries the display name.
    pub fn project(&self, source: &Element) -> Element {
        Element {
            kind: source.kind,
            name: self.display_name().to_string(),
            visibility: source.visibility,
            maturity: self.maturity,
            line: self.line,
            label: self.label,
            inertia: false,
            evolving: false,
            evolved: true,
            decorators: self.decorators,
            url: None,
            evolve_maturity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorator_keywords_roundtrip() {
        for keyword in ["ecosystem", "market", "buy", "build", "outsource"] {
            let decorator = Decorator::from_keyword(keyword).expect("known keyword");
            assert_eq!(decorator.keyword(), keyword);
        }
        assert_eq!(Decorator::from_keyword("rent"), None);
    }

    #[test]
    fn test_decorators_set() {
        let decorators = Decorators::MARKET | Decorators::OUTSOURCE;

        assert!(decorators.contains(Decorators::MARKET));
        assert!(!decorators.contains(Decorators::BUY));
        assert_eq!(decorators.method(), Some(Decorator::Outsource));
        assert_eq!(
            decorators.kinds().collect::<Vec<_>>(),
            vec![Decorator::Market, Decorator::Outsource]
        );
    }

    #[test]
    fn test_inline_evolve_marks_evolving() {
        let element = Element::new(ElementKind::Component, "Kettle", 0.4, 0.3, 1)
            .with_evolve_maturity(Some(0.7));
        assert!(element.evolving());
        assert_eq!(element.evolve_maturity(), Some(0.7));
    }

    #[test]
    fn test_evolved_projection() {
        let kettle = Element::new(ElementKind::Component, "Kettle", 0.43, 0.35, 2);
        let evolved = EvolvedElement::new("Kettle", 0.62, 5)
            .with_override_name(Some("Electric Kettle".to_string()));

        let projected = evolved.project(&kettle);
        assert_eq!(projected.name(), "Electric Kettle");
        assert_eq!(projected.visibility(), 0.43);
        assert_eq!(projected.maturity(), 0.62);
        assert!(projected.evolved());
        assert!(!projected.evolving());
    }

    #[test]
    fn test_default_label_offset() {
        let label = LabelOffset::default();
        assert_eq!((label.x(), label.y()), (5.0, -10.0));
    }
}
