//! Map frame: value chain axis, evolution axis, stage dividers and title.

use svg::node::element as svg_element;

use wardley_core::{
    document::Document,
    geometry::{CoordinateMapper, Point},
};

use super::{INK, MUTED_INK, Svg, text};

/// Maturity values separating the four evolution stages.
const STAGE_BOUNDARIES: [f64; 3] = [0.174, 0.4, 0.7];

impl Svg {
    pub(super) fn render_axes(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let surface = mapper.surface();
        let left = mapper.to_surface_x(0.0);
        let right = mapper.to_surface_x(1.0);
        let top = mapper.to_surface_y(1.0);
        let bottom = mapper.to_surface_y(0.0);

        let mut group = svg_element::Group::new()
            .set("class", "axes")
            .add(axis_line(left, top, left, bottom))
            .add(axis_line(left, bottom, right, bottom));

        for boundary in STAGE_BOUNDARIES {
            let x = mapper.to_surface_x(boundary);
            group = group.add(
                svg_element::Line::new()
                    .set("x1", x)
                    .set("y1", top)
                    .set("x2", x)
                    .set("y2", bottom)
                    .set("stroke", MUTED_INK)
                    .set("stroke-dasharray", "2,2"),
            );
        }

        let edges = [0.0, STAGE_BOUNDARIES[0], STAGE_BOUNDARIES[1], STAGE_BOUNDARIES[2], 1.0];
        for (label, bounds) in doc.evolution().labels().iter().zip(edges.windows(2)) {
            let x = mapper.to_surface_x(bounds[0]) + 5.0;
            group = group.add(
                text(label, Point::new(x, bottom + 15.0))
                    .set("font-weight", "bold"),
            );
        }

        let rotate = format!("rotate(-90, {}, {})", left - 10.0, bottom);
        group = group
            .add(
                text("Invisible", Point::new(left - 10.0, bottom))
                    .set("transform", rotate),
            )
            .add(
                text(
                    "Value Chain",
                    Point::new(left - 10.0, bottom - (bottom - top) / 2.0),
                )
                .set("transform", format!("rotate(-90, {}, {})", left - 10.0, (top + bottom) / 2.0))
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
            )
            .add(
                text("Visible", Point::new(left - 10.0, top))
                    .set("transform", format!("rotate(-90, {}, {})", left - 10.0, top))
                    .set("text-anchor", "end"),
            )
            .add(
                text(
                    "Evolution",
                    Point::new(right, bottom + 30.0),
                )
                .set("text-anchor", "end")
                .set("font-weight", "bold"),
            );

        if !doc.title().is_empty() {
            group = group.add(
                text(
                    doc.title(),
                    Point::new(surface.width() / 2.0, top / 2.0 + 5.0),
                )
                .set("text-anchor", "middle")
                .set("font-size", 18)
                .set("font-weight", "bold"),
            );
        }
        group
    }
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", INK)
        .set("stroke-width", 1)
        .set("marker-end", "url(#arrow)")
}
