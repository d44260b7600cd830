//! SVG rendering of Wardley maps.
//!
//! Every entity is positioned through a [`CoordinateMapper`] built from the
//! canvas configuration, or from the map's own `size` statement when it has
//! one. Values outside `[0, 1]` are clamped here and nowhere else.

mod annotations;
mod axes;
mod entities;
mod links;

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{self, node::element as svg_element};

use wardley_core::{
    color::Color,
    document::Document,
    geometry::{CoordinateMapper, Point, clamp_unit},
};

use crate::{
    config::{CanvasConfig, StyleConfig},
    export,
};

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
const FONT_SIZE: f64 = 12.0;
const INK: &str = "black";
const MUTED_INK: &str = "grey";
const EVOLVE_COLOR: &str = "red";

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    file_name: Option<String>,
    canvas: CanvasConfig,
    style: StyleConfig,
}

impl SvgBuilder {
    /// Creates a builder writing to `file_name`.
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: Some(file_name.to_string()),
            ..Self::default()
        }
    }

    /// Renders in memory only; [`export::Exporter`] calls will fail.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: &CanvasConfig) -> Self {
        self.canvas = canvas.clone();
        self
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Validates the style and builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for an invalid background color.
    pub fn build(self) -> Result<Svg, export::Error> {
        let background = self
            .style
            .background_color()
            .map_err(export::Error::Render)?
            .unwrap_or_else(|| Color::new("white").unwrap_or_default());
        Ok(Svg {
            file_name: self.file_name,
            canvas: self.canvas,
            background,
        })
    }
}

/// SVG exporter for one map at a time.
#[derive(Debug)]
pub struct Svg {
    file_name: Option<String>,
    canvas: CanvasConfig,
    background: Color,
}

impl Svg {
    /// Renders `doc` into an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when the surface has no drawable
    /// area.
    pub fn render_document(&self, doc: &Document) -> Result<svg::Document, export::Error> {
        let mapper = self
            .canvas
            .mapper(doc.presentation().size())
            .map_err(|err| export::Error::Render(err.to_string()))?;
        let surface = mapper.surface();
        debug!(width = surface.width(), height = surface.height(); "Rendering map");

        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", surface.width())
            .set("height", surface.height())
            .set("fill", &self.background);

        let map = svg_element::Group::new()
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .add(self.render_attitudes(&mapper, doc))
            .add(self.render_axes(&mapper, doc))
            .add(self.render_pipelines(&mapper, doc))
            .add(self.render_links(&mapper, doc))
            .add(self.render_evolved(&mapper, doc))
            .add(self.render_elements(&mapper, doc))
            .add(self.render_anchors(&mapper, doc))
            .add(self.render_notes(&mapper, doc))
            .add(self.render_accelerators(&mapper, doc))
            .add(self.render_annotations(&mapper, doc));

        Ok(svg::Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", surface.width(), surface.height()),
            )
            .set("width", surface.width())
            .set("height", surface.height())
            .add(links::marker_definitions())
            .add(background)
            .add(map))
    }

    /// Writes an SVG document to the configured file.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when built with
    /// [`SvgBuilder::in_memory`], and [`export::Error::Io`] when the file
    /// cannot be written.
    pub fn write_document(&self, doc: svg::Document) -> Result<(), export::Error> {
        let Some(file_name) = self.file_name.as_deref() else {
            return Err(export::Error::Render(
                "no output file configured".to_string(),
            ));
        };
        info!(file_name; "Creating SVG file");
        let mut f = match File::create(file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(f, "{doc}") {
            error!(file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_document(&mut self, doc: &Document) -> Result<(), export::Error> {
        let rendered = self.render_document(doc)?;
        debug!("SVG document rendered");
        self.write_document(rendered)
    }
}

/// Surface position of a map coordinate, clamped into the map area.
fn place(mapper: &CoordinateMapper, visibility: f64, maturity: f64) -> Point {
    mapper.to_surface(clamp_unit(visibility), clamp_unit(maturity))
}

/// A text node anchored at `at`.
fn text(content: &str, at: Point) -> svg_element::Text {
    svg_element::Text::new(content)
        .set("x", at.x())
        .set("y", at.y())
}

#[cfg(test)]
mod tests {
    use wardley_parser::parse;

    use super::*;
    use crate::export::Exporter as _;

    fn render(source: &str) -> String {
        let svg = SvgBuilder::in_memory().build().unwrap();
        svg.render_document(&parse(source)).unwrap().to_string()
    }

    #[test]
    fn test_empty_map_has_axes() {
        let out = render("");
        assert!(out.starts_with("<svg"));
        assert!(out.contains("viewBox=\"0 0 800 600\""));
        assert!(out.contains("Genesis"));
        assert!(out.contains("Commodity"));
    }

    #[test]
    fn test_size_statement_overrides_canvas() {
        let out = render("size [1000, 700]");
        assert!(out.contains("viewBox=\"0 0 1000 700\""));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let out = render("component Far [1.5, -0.5]");
        // maturity -0.5 clamps to the left padding edge, visibility 1.5 to the top
        assert!(out.contains("cx=\"40\""));
        assert!(out.contains("cy=\"40\""));
    }

    #[test]
    fn test_invalid_background_fails_build() {
        let style = StyleConfig::new(Some("nope".to_string()));
        assert!(SvgBuilder::in_memory().with_style(&style).build().is_err());
    }

    #[test]
    fn test_in_memory_export_is_an_error() {
        let mut svg = SvgBuilder::in_memory().build().unwrap();
        assert!(matches!(
            svg.export_document(&Document::default()),
            Err(export::Error::Render(_))
        ));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");
        let mut svg = SvgBuilder::new(path.to_str().unwrap()).build().unwrap();

        svg.export_document(&parse("component Cup [0.5, 0.5]")).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Cup"));
    }
}
