//! The structured model of one parsed Wardley map.
//!
//! A [`Document`] is produced fresh by every parse and never mutated
//! afterwards, so an older snapshot can be diffed against a newer one.
//! Entities are kept in per-kind vectors in source order.
//!
//! # Overview
//!
//! - [`Element`] - components and submaps
//! - [`Anchor`], [`Note`], [`Accelerator`] - other positioned entities
//! - [`Link`] - dependencies and flows, referencing entities by name
//! - [`EvolvedElement`] - an evolved position of an existing element
//! - [`Pipeline`] - a maturity band of interchangeable components
//! - [`Annotation`], [`Attitude`], [`MethodDecoration`], [`UrlReference`]
//! - [`ParseError`] - one entry per malformed source line

mod annotation;
mod element;
mod link;
mod pipeline;
mod presentation;

pub use annotation::{Annotation, Attitude, AttitudeExtent, AttitudeKind};
pub use element::{
    Accelerator, Anchor, Decorator, Decorators, Element, ElementKind, EvolvedElement, LabelOffset,
    Note,
};
pub use link::{Flow, Link};
pub use pipeline::{Pipeline, PipelineComponent};
pub use presentation::{EvolutionStages, Method, MethodDecoration, Presentation, UrlReference};

use std::fmt;

/// Title used when the source has no `title` statement.
pub const DEFAULT_TITLE: &str = "Untitled Map";

/// A malformed source line. The line contributed no entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    line: usize,
    message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// 1-based source line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// The root of a parsed map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    title: String,
    evolution: EvolutionStages,
    presentation: Presentation,
    elements: Vec<Element>,
    anchors: Vec<Anchor>,
    links: Vec<Link>,
    evolved: Vec<EvolvedElement>,
    pipelines: Vec<Pipeline>,
    notes: Vec<Note>,
    annotations: Vec<Annotation>,
    attitudes: Vec<Attitude>,
    accelerators: Vec<Accelerator>,
    methods: Vec<MethodDecoration>,
    urls: Vec<UrlReference>,
    errors: Vec<ParseError>,
}

impl Document {
    /// Starts building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn evolution(&self) -> &EvolutionStages {
        &self.evolution
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Components and submaps in source order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn evolved(&self) -> &[EvolvedElement] {
        &self.evolved
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn attitudes(&self) -> &[Attitude] {
        &self.attitudes
    }

    pub fn accelerators(&self) -> &[Accelerator] {
        &self.accelerators
    }

    pub fn methods(&self) -> &[MethodDecoration] {
        &self.methods
    }

    pub fn urls(&self) -> &[UrlReference] {
        &self.urls
    }

    /// Per-line errors, in no particular pass order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Looks up an element (component or submap) by name.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.name() == name)
    }

    /// Resolves a `url(<name>)` reference to its target path.
    pub fn resolve_url(&self, name: &str) -> Option<&str> {
        self.urls
            .iter()
            .find(|u| u.name() == name)
            .map(UrlReference::url)
    }

    /// Resolves a link endpoint name to a `(visibility, maturity)` position.
    ///
    /// Elements, anchors and evolved display names are searched, in that
    /// order. `None` means the link is not drawn.
    pub fn position_of(&self, name: &str) -> Option<(f64, f64)> {
        if let Some(element) = self.element(name) {
            return Some((element.visibility(), element.maturity()));
        }
        if let Some(anchor) = self.anchor(name) {
            return Some((anchor.visibility(), anchor.maturity()));
        }
        self.evolved_positions()
            .find(|e| e.name() == name)
            .map(|e| (e.visibility(), e.maturity()))
    }

    /// Evolved projections whose source element exists.
    ///
    /// Projections naming an absent element are skipped, the same way links
    /// to absent names are.
    pub fn evolved_positions(&self) -> impl Iterator<Item = Element> + '_ {
        self.evolved
            .iter()
            .filter_map(|evolved| self.element(evolved.name()).map(|src| evolved.project(src)))
    }

    /// Returns `true` when the document declares nothing drawable.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.anchors.is_empty()
            && self.notes.is_empty()
            && self.pipelines.is_empty()
            && self.annotations.is_empty()
            && self.attitudes.is_empty()
            && self.accelerators.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::builder().build()
    }
}

/// Accumulates entities for a [`Document`].
///
/// Entities can only be appended; the built document is immutable.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    evolution: Option<EvolutionStages>,
    presentation: Presentation,
    elements: Vec<Element>,
    anchors: Vec<Anchor>,
    links: Vec<Link>,
    evolved: Vec<EvolvedElement>,
    pipelines: Vec<Pipeline>,
    notes: Vec<Note>,
    annotations: Vec<Annotation>,
    attitudes: Vec<Attitude>,
    accelerators: Vec<Accelerator>,
    methods: Vec<MethodDecoration>,
    urls: Vec<UrlReference>,
    errors: Vec<ParseError>,
}

impl DocumentBuilder {
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn evolution(&mut self, evolution: EvolutionStages) -> &mut Self {
        self.evolution = Some(evolution);
        self
    }

    pub fn presentation(&mut self, presentation: Presentation) -> &mut Self {
        self.presentation = presentation;
        self
    }

    pub fn element(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn anchor(&mut self, anchor: Anchor) -> &mut Self {
        self.anchors.push(anchor);
        self
    }

    pub fn link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }

    pub fn evolved(&mut self, evolved: EvolvedElement) -> &mut Self {
        self.evolved.push(evolved);
        self
    }

    pub fn pipeline(&mut self, pipeline: Pipeline) -> &mut Self {
        self.pipelines.push(pipeline);
        self
    }

    pub fn note(&mut self, note: Note) -> &mut Self {
        self.notes.push(note);
        self
    }

    pub fn annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn attitude(&mut self, attitude: Attitude) -> &mut Self {
        self.attitudes.push(attitude);
        self
    }

    pub fn accelerator(&mut self, accelerator: Accelerator) -> &mut Self {
        self.accelerators.push(accelerator);
        self
    }

    pub fn method(&mut self, method: MethodDecoration) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn url(&mut self, url: UrlReference) -> &mut Self {
        self.urls.push(url);
        self
    }

    pub fn error(&mut self, error: ParseError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn build(self) -> Document {
        Document {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            evolution: self.evolution.unwrap_or_default(),
            presentation: self.presentation,
            elements: self.elements,
            anchors: self.anchors,
            links: self.links,
            evolved: self.evolved,
            pipelines: self.pipelines,
            notes: self.notes,
            annotations: self.annotations,
            attitudes: self.attitudes,
            accelerators: self.accelerators,
            methods: self.methods,
            urls: self.urls,
            errors: self.errors,
        }
    }
}
