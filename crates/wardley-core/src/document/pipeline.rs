//! Pipelines: maturity bands grouping interchangeable components.

use super::LabelOffset;

/// A component declared inside a pipeline body. It only carries a maturity;
/// the visibility comes from the pipeline's own element.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineComponent {
    name: String,
    maturity: f64,
    label: LabelOffset,
    line: usize,
}

impl PipelineComponent {
    pub fn new(name: impl Into<String>, maturity: f64, line: usize) -> Self {
        Self {
            name: name.into(),
            maturity,
            label: LabelOffset::default(),
            line,
        }
    }

    pub fn with_label(mut self, label: LabelOffset) -> Self {
        self.label = label;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
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
}

/// A pipeline band spanning `[maturity1, maturity2]`.
///
/// # Examples
///
/// ```
/// # use wardley_core::document::{Pipeline, PipelineComponent};
/// let pipeline = Pipeline::new("Kettle", 0.2, 0.8, false, 4).with_children(vec![
///     PipelineComponent::new("Campfire Kettle", 0.35, 6),
///     PipelineComponent::new("Electric Kettle", 0.63, 7),
/// ]);
///
/// // Children always win over the declared span.
/// assert_eq!(pipeline.maturity1(), 0.35);
/// assert_eq!(pipeline.maturity2(), 0.63);
/// assert!(!pipeline.hidden());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    name: String,
    maturity1: f64,
    maturity2: f64,
    hidden: bool,
    line: usize,
    children: Vec<PipelineComponent>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, maturity1: f64, maturity2: f64, hidden: bool, line: usize) -> Self {
        Self {
            name: name.into(),
            maturity1,
            maturity2,
            hidden,
            line,
            children: Vec::new(),
        }
    }

    /// Attaches body components.
    ///
    /// With at least one child the span is refitted to the children's
    /// maturity range and the pipeline becomes visible.
    pub fn with_children(mut self, children: Vec<PipelineComponent>) -> Self {
        if !children.is_empty() {
            let (min, max) = children
                .iter()
                .map(PipelineComponent::maturity)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
                    (lo.min(m), hi.max(m))
                });
            self.maturity1 = min;
            self.maturity2 = max;
            self.hidden = false;
        }
        self.children = children;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maturity1(&self) -> f64 {
        self.maturity1
    }

    pub fn maturity2(&self) -> f64 {
        self.maturity2
    }

    /// Bare `pipeline Name` without a body is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn children(&self) -> &[PipelineComponent] {
        &self.children
    }
}
