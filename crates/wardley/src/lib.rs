//! Wardley - A text language for Wardley maps with round-trip editing.
//!
//! Parsing, rendering and surgical source editing for Wardley maps. A map is
//! written one statement per line; moving an element rewrites only its
//! coordinate bracket, so hand-written formatting and comments survive.

pub mod config;

mod error;
mod export;
mod session;
mod watch;

pub use wardley_core::{color, document, geometry, glitch};
pub use wardley_parser::{Diagnostic, DiagnosticError, ErrorCode, Span, patch};

pub use error::WardleyError;
pub use export::{Error as ExportError, Exporter, svg::SvgBuilder};
pub use session::{MapSession, ParsedRevision, PendingParse};
pub use watch::{ChangeCallback, FileWatcher, NotifyWatcher};

use log::{debug, info, trace};

use wardley_core::{document::Document, geometry::CoordinateMapper};

use config::AppConfig;

/// Builder for parsing and rendering Wardley maps.
///
/// # Examples
///
/// ```rust
/// use wardley::{MapBuilder, config::AppConfig};
///
/// let source = "component Cup [0.73, 0.78]\ncomponent Tea [0.63, 0.81]\nCup->Tea";
///
/// let builder = MapBuilder::new(AppConfig::default());
/// let doc = builder.parse(source);
/// assert_eq!(doc.elements().len(), 2);
///
/// let svg = builder.render_svg(&doc).expect("Failed to render");
/// assert!(svg.contains("Tea"));
/// ```
#[derive(Default)]
pub struct MapBuilder {
    config: AppConfig,
}

impl MapBuilder {
    /// Create a new map builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder renders with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a document.
    ///
    /// Never fails; malformed lines are listed in [`Document::errors`].
    pub fn parse(&self, source: &str) -> Document {
        info!("Parsing map");
        let doc = wardley_parser::parse(source);
        debug!(errors = doc.errors().len(); "Map parsed");
        trace!(doc:?; "Parsed map");
        doc
    }

    /// Parse source code together with its rich diagnostics.
    pub fn parse_with_diagnostics(&self, source: &str) -> (Document, Vec<Diagnostic>) {
        info!("Parsing map with diagnostics");
        wardley_parser::parse_with_diagnostics(source)
    }

    /// Parse source code, refusing maps with errors.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Parse`] carrying every diagnostic and the
    /// source they point into.
    pub fn parse_strict(&self, source: &str) -> Result<Document, WardleyError> {
        info!("Parsing map strictly");
        wardley_parser::parse_strict(source)
            .map_err(|err| WardleyError::new_parse_error(err, source))
    }

    /// Coordinate mapper for `doc`, honouring its `size` statement.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Surface`] when the padding leaves no drawable
    /// area.
    pub fn mapper(&self, doc: &Document) -> Result<CoordinateMapper, WardleyError> {
        Ok(self.config.canvas().mapper(doc.presentation().size())?)
    }

    /// Render a document to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Export`] for an invalid configured background
    /// color or a surface with no drawable area.
    pub fn render_svg(&self, doc: &Document) -> Result<String, WardleyError> {
        info!(elements = doc.elements().len(); "Rendering map");
        let svg = SvgBuilder::in_memory()
            .with_canvas(self.config.canvas())
            .with_style(self.config.style())
            .build()?;
        let rendered = svg.render_document(doc)?;
        info!("SVG rendered successfully");
        Ok(rendered.to_string())
    }

    /// Render a document to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`WardleyError::Export`] when rendering or writing fails.
    pub fn export_svg(&self, doc: &Document, file_name: &str) -> Result<(), WardleyError> {
        let mut svg = SvgBuilder::new(file_name)
            .with_canvas(self.config.canvas())
            .with_style(self.config.style())
            .build()?;
        svg.export_document(doc)?;
        info!(file_name; "SVG exported successfully");
        Ok(())
    }

    /// Start an editing session over `source` using this builder's
    /// configuration.
    pub fn session(&self, source: impl Into<String>) -> MapSession {
        MapSession::new(self.config.clone(), source)
    }
}
