//! Presentation hints and document-level settings.

use std::fmt;

use super::Decorator;
use crate::geometry::Size;

/// The four named stages of the maturity axis.
///
/// # Examples
///
/// ```
/// # use wardley_core::document::EvolutionStages;
/// let stages = EvolutionStages::default();
/// assert_eq!(stages.labels()[0], "Genesis");
/// assert_eq!(stages.labels()[3], "Commodity");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStages {
    labels: [String; 4],
}

impl EvolutionStages {
    pub fn new(labels: [String; 4]) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[String; 4] {
        &self.labels
    }
}

impl Default for EvolutionStages {
    fn default() -> Self {
        Self {
            labels: ["Genesis", "Custom-Built", "Product", "Commodity"].map(String::from),
        }
    }
}

/// Rendering hints declared in the map source.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    style: String,
    annotations_position: Option<(f64, f64)>,
    size: Option<Size>,
}

impl Presentation {
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_annotations_position(mut self, position: Option<(f64, f64)>) -> Self {
        self.annotations_position = position;
        self
    }

    pub fn with_size(mut self, size: Option<Size>) -> Self {
        self.size = size;
        self
    }

    /// Style name from `style <name>`, `plain` by default.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// `(visibility, maturity)` of the annotation legend box.
    pub fn annotations_position(&self) -> Option<(f64, f64)> {
        self.annotations_position
    }

    /// Canvas size override from `size [w, h]`.
    pub fn size(&self) -> Option<Size> {
        self.size
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            style: "plain".to_string(),
            annotations_position: None,
            size: None,
        }
    }
}

/// A standalone `buy|build|outsource <name>` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecoration {
    method: Method,
    target: String,
    line: usize,
}

/// The sourcing method of a [`MethodDecoration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Buy,
    Build,
    Outsource,
}

impl Method {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "buy" => Some(Self::Buy),
            "build" => Some(Self::Build),
            "outsource" => Some(Self::Outsource),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Build => "build",
            Self::Outsource => "outsource",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<Method> for Decorator {
    fn from(method: Method) -> Self {
        match method {
            Method::Buy => Decorator::Buy,
            Method::Build => Decorator::Build,
            Method::Outsource => Decorator::Outsource,
        }
    }
}

impl MethodDecoration {
    pub fn new(method: Method, target: impl Into<String>, line: usize) -> Self {
        Self {
            method,
            target: target.into(),
            line,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// A named external reference: `url <name> [<path>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReference {
    name: String,
    url: String,
    line: usize,
}

impl UrlReference {
    pub fn new(name: impl Into<String>, url: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn line(&self) -> usize {
        self.line
    }
}
