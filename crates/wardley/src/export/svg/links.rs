//! Dependency and flow links.
//!
//! Link endpoints are looked up by name at render time. A link naming an
//! absent entity is skipped rather than reported.

use log::trace;
use svg::node::element as svg_element;

use wardley_core::{
    document::{Document, Link},
    geometry::{CoordinateMapper, Point},
};

use super::{EVOLVE_COLOR, INK, MUTED_INK, Svg, place, text};

const FLOW_COLOR: &str = "#99c5ee";

/// Arrowheads shared by axes, flows and evolution lines.
pub(super) fn marker_definitions() -> svg_element::Definitions {
    svg_element::Definitions::new()
        .add(arrowhead("arrow", INK, "M 0 0 L 10 5 L 0 10 z"))
        .add(arrowhead("flow-future", FLOW_COLOR, "M 0 0 L 10 5 L 0 10 z"))
        .add(arrowhead("flow-past", FLOW_COLOR, "M 10 0 L 0 5 L 10 10 z"))
        .add(arrowhead("evolve-arrow", EVOLVE_COLOR, "M 0 0 L 10 5 L 0 10 z"))
}

fn arrowhead(id: &str, color: &str, path: &str) -> svg_element::Marker {
    let ref_x = if path.starts_with("M 10") { 1 } else { 9 };
    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", ref_x)
        .set("refY", 5)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(svg_element::Path::new().set("d", path).set("fill", color))
}

impl Svg {
    pub(super) fn render_links(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "links");
        for link in doc.links() {
            let (Some(start), Some(end)) = (doc.position_of(link.start()), doc.position_of(link.end()))
            else {
                trace!(start = link.start(), end = link.end(); "Skipping link with unresolved endpoint");
                continue;
            };
            let start = place(mapper, start.0, start.1);
            let end = place(mapper, end.0, end.1);
            group = group.add(render_link(link, start, end));
        }
        group
    }
}

fn render_link(link: &Link, start: Point, end: Point) -> svg_element::Group {
    let line = svg_element::Line::new()
        .set("x1", start.x())
        .set("y1", start.y())
        .set("x2", end.x())
        .set("y2", end.y());

    let mut group = svg_element::Group::new();
    if link.is_flow() {
        let mut flow = line
            .set("stroke", FLOW_COLOR)
            .set("stroke-width", 6)
            .set("stroke-opacity", 0.6);
        if link.is_future() {
            flow = flow.set("marker-end", "url(#flow-future)");
        }
        if link.is_past() {
            flow = flow.set("marker-start", "url(#flow-past)");
        }
        group = group.add(flow);
    } else {
        group = group.add(line.set("stroke", MUTED_INK).set("stroke-width", 1));
    }

    let middle = start.midpoint(end);
    if let Some(value) = link.flow_value() {
        group = group.add(
            text(value, Point::new(middle.x(), middle.y() - 8.0))
                .set("text-anchor", "middle")
                .set("font-style", "italic"),
        );
    }
    if let Some(context) = link.context() {
        group = group.add(
            text(context, Point::new(middle.x(), middle.y() + 14.0))
                .set("text-anchor", "middle")
                .set("fill", MUTED_INK),
        );
    }
    group
}
