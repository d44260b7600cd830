//! Numbered annotation markers and their legend box.

use svg::node::element as svg_element;

use wardley_core::{
    document::Document,
    geometry::{CoordinateMapper, Point},
};

use super::{INK, Svg, place, text};

/// Legend position used when the map has no `annotations [v, m]`.
const DEFAULT_LEGEND_POSITION: (f64, f64) = (0.98, 0.70);
const LINE_HEIGHT: f64 = 16.0;
/// Rough glyph width used to size the legend box.
const CHAR_WIDTH: f64 = 6.5;

impl Svg {
    pub(super) fn render_annotations(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "annotations");
        if doc.annotations().is_empty() {
            return group;
        }

        for annotation in doc.annotations() {
            let points: Vec<Point> = annotation
                .occurrences()
                .iter()
                .map(|&(visibility, maturity)| place(mapper, visibility, maturity))
                .collect();
            if points.len() > 1 {
                let path = points
                    .iter()
                    .map(|p| format!("{},{}", p.x(), p.y()))
                    .collect::<Vec<_>>()
                    .join(" ");
                group = group.add(
                    svg_element::Polyline::new()
                        .set("points", path)
                        .set("fill", "none")
                        .set("stroke", INK)
                        .set("stroke-dasharray", "2,2"),
                );
            }
            for point in points {
                group = group
                    .add(
                        svg_element::Circle::new()
                            .set("cx", point.x())
                            .set("cy", point.y())
                            .set("r", 10)
                            .set("fill", "white")
                            .set("stroke", INK),
                    )
                    .add(
                        text(&annotation.number().to_string(), Point::new(point.x(), point.y() + 4.0))
                            .set("text-anchor", "middle")
                            .set("font-weight", "bold"),
                    );
            }
        }

        let (visibility, maturity) = doc
            .presentation()
            .annotations_position()
            .unwrap_or(DEFAULT_LEGEND_POSITION);
        let corner = place(mapper, visibility, maturity);
        let lines: Vec<String> = doc
            .annotations()
            .iter()
            .map(|a| format!("{}. {}", a.number(), a.text()))
            .collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(12);

        group = group.add(
            svg_element::Rectangle::new()
                .set("x", corner.x())
                .set("y", corner.y())
                .set("width", widest as f64 * CHAR_WIDTH + 20.0)
                .set("height", (lines.len() + 1) as f64 * LINE_HEIGHT + 10.0)
                .set("fill", "white")
                .set("stroke", INK),
        );
        group = group.add(
            text("Annotations", Point::new(corner.x() + 10.0, corner.y() + LINE_HEIGHT))
                .set("font-weight", "bold"),
        );
        for (index, line) in lines.iter().enumerate() {
            let y = corner.y() + (index + 2) as f64 * LINE_HEIGHT;
            group = group.add(text(line, Point::new(corner.x() + 10.0, y)));
        }
        group
    }
}
