//! Positioned entities: elements, evolved projections, anchors, pipelines,
//! notes, attitudes and accelerators.

use log::debug;
use svg::node::element as svg_element;

use wardley_core::{
    document::{AttitudeExtent, AttitudeKind, Decorator, Decorators, Document, Element, ElementKind},
    geometry::{CoordinateMapper, Point},
};

use super::{EVOLVE_COLOR, INK, MUTED_INK, Svg, place, text};

const ELEMENT_RADIUS: f64 = 5.0;
const PIPELINE_HEIGHT: f64 = 22.0;

impl Svg {
    pub(super) fn render_elements(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        doc.elements()
            .iter()
            .fold(svg_element::Group::new().set("class", "elements"), |group, element| {
                group.add(render_element(mapper, element, INK))
            })
    }

    /// Dashed arrows from each evolving element to its evolved position,
    /// plus the evolved element itself.
    pub(super) fn render_evolved(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "evolved");
        for evolved in doc.evolved() {
            let Some(source) = doc.element(evolved.name()) else {
                debug!(name = evolved.name(); "Evolve target not declared, skipping");
                continue;
            };
            let projected = evolved.project(source);
            let from = place(mapper, source.visibility(), source.maturity());
            let to = place(mapper, projected.visibility(), projected.maturity());
            group = group
                .add(
                    svg_element::Line::new()
                        .set("x1", from.x() + ELEMENT_RADIUS)
                        .set("y1", from.y())
                        .set("x2", to.x() - ELEMENT_RADIUS - 2.0)
                        .set("y2", to.y())
                        .set("stroke", EVOLVE_COLOR)
                        .set("stroke-dasharray", "5,5")
                        .set("marker-end", "url(#evolve-arrow)"),
                )
                .add(render_element(mapper, &projected, EVOLVE_COLOR));
        }
        group
    }

    pub(super) fn render_anchors(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        doc.anchors()
            .iter()
            .fold(svg_element::Group::new().set("class", "anchors"), |group, anchor| {
                let at = place(mapper, anchor.visibility(), anchor.maturity());
                group.add(
                    text(anchor.name(), at)
                        .set("text-anchor", "middle")
                        .set("font-weight", "bold")
                        .set("font-size", 14),
                )
            })
    }

    pub(super) fn render_notes(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        doc.notes()
            .iter()
            .fold(svg_element::Group::new().set("class", "notes"), |group, note| {
                let at = place(mapper, note.visibility(), note.maturity());
                group.add(text(note.text(), at).set("font-weight", "bold"))
            })
    }

    /// Pipelines hang below the element of the same name.
    pub(super) fn render_pipelines(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "pipelines");
        for pipeline in doc.pipelines().iter().filter(|p| !p.hidden()) {
            let Some(owner) = doc.element(pipeline.name()) else {
                debug!(name = pipeline.name(); "Pipeline has no matching element, skipping");
                continue;
            };
            let y = place(mapper, owner.visibility(), 0.0).y() + ELEMENT_RADIUS * 2.0;
            let x1 = place(mapper, 0.0, pipeline.maturity1()).x() - ELEMENT_RADIUS * 2.0;
            let x2 = place(mapper, 0.0, pipeline.maturity2()).x() + ELEMENT_RADIUS * 2.0;
            group = group.add(
                svg_element::Rectangle::new()
                    .set("x", x1)
                    .set("y", y)
                    .set("width", (x2 - x1).max(0.0))
                    .set("height", PIPELINE_HEIGHT)
                    .set("fill", "none")
                    .set("stroke", INK),
            );
            for child in pipeline.children() {
                let at = Point::new(place(mapper, 0.0, child.maturity()).x(), y + PIPELINE_HEIGHT / 2.0);
                group = group
                    .add(circle(at, ELEMENT_RADIUS, INK, "white"))
                    .add(text(
                        child.name(),
                        at.add_point(Point::new(child.label().x(), child.label().y())),
                    ));
            }
        }
        group
    }

    pub(super) fn render_attitudes(&self, mapper: &CoordinateMapper, doc: &Document) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "attitudes");
        for attitude in doc.attitudes() {
            let corner = place(mapper, attitude.visibility(), attitude.maturity());
            let (x, y, width, height) = match attitude.extent() {
                AttitudeExtent::Corner { visibility, maturity } => {
                    let other = place(mapper, visibility, maturity);
                    (
                        corner.x().min(other.x()),
                        corner.y().min(other.y()),
                        (other.x() - corner.x()).abs(),
                        (other.y() - corner.y()).abs(),
                    )
                }
                AttitudeExtent::Size { width, height } => (corner.x(), corner.y(), width, height),
            };
            let color = attitude_color(attitude.kind());
            group = group
                .add(
                    svg_element::Rectangle::new()
                        .set("x", x)
                        .set("y", y)
                        .set("width", width)
                        .set("height", height)
                        .set("fill", color)
                        .set("fill-opacity", 0.2)
                        .set("stroke", color),
                )
                .add(
                    text(attitude.kind().keyword(), Point::new(x + width / 2.0, y + 15.0))
                        .set("text-anchor", "middle")
                        .set("font-weight", "bold")
                        .set("fill", color),
                );
        }
        group
    }

    pub(super) fn render_accelerators(
        &self,
        mapper: &CoordinateMapper,
        doc: &Document,
    ) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("class", "accelerators");
        for accelerator in doc.accelerators() {
            let at = place(mapper, accelerator.visibility(), accelerator.maturity());
            let points = if accelerator.is_deaccelerator() {
                arrow_points(at, -1.0)
            } else {
                arrow_points(at, 1.0)
            };
            group = group
                .add(
                    svg_element::Polygon::new()
                        .set("points", points)
                        .set("fill", "white")
                        .set("stroke", INK),
                )
                .add(
                    text(accelerator.name(), Point::new(at.x(), at.y() + 30.0))
                        .set("text-anchor", "middle"),
                );
        }
        group
    }
}

/// A map element at its position with label, inertia bar and decorators.
fn render_element(mapper: &CoordinateMapper, element: &Element, stroke: &str) -> svg_element::Group {
    let at = place(mapper, element.visibility(), element.maturity());
    let stroke = if element.evolving() { EVOLVE_COLOR } else { stroke };
    let mut group = svg_element::Group::new().set("class", element.kind().keyword());

    if let Some(method) = element.decorators().method() {
        let fill = match method {
            Decorator::Buy => "#d6d6d6",
            Decorator::Build => "#000000",
            _ => "#444444",
        };
        group = group.add(
            circle(at, ELEMENT_RADIUS * 4.0, MUTED_INK, fill).set("fill-opacity", 0.4),
        );
    }
    if element.decorators().contains(Decorators::ECOSYSTEM) {
        group = group
            .add(circle(at, ELEMENT_RADIUS * 5.0, MUTED_INK, "none").set("stroke-width", 1))
            .add(circle(at, ELEMENT_RADIUS * 3.0, MUTED_INK, "none").set("stroke-dasharray", "2,2"));
    }
    if element.decorators().contains(Decorators::MARKET) {
        group = group.add(circle(at, ELEMENT_RADIUS * 3.0, stroke, "white"));
    }
    if element.inertia() {
        group = group.add(
            svg_element::Line::new()
                .set("x1", at.x() + ELEMENT_RADIUS * 3.0)
                .set("y1", at.y() - ELEMENT_RADIUS * 2.0)
                .set("x2", at.x() + ELEMENT_RADIUS * 3.0)
                .set("y2", at.y() + ELEMENT_RADIUS * 2.0)
                .set("stroke", INK)
                .set("stroke-width", 6),
        );
    }

    group = match element.kind() {
        ElementKind::Component => group.add(circle(at, ELEMENT_RADIUS, stroke, "white")),
        ElementKind::Submap => group.add(
            svg_element::Rectangle::new()
                .set("x", at.x() - ELEMENT_RADIUS)
                .set("y", at.y() - ELEMENT_RADIUS)
                .set("width", ELEMENT_RADIUS * 2.0)
                .set("height", ELEMENT_RADIUS * 2.0)
                .set("fill", "white")
                .set("stroke", stroke),
        ),
    };

    let label = at.add_point(Point::new(element.label().x(), element.label().y()));
    group.add(text(element.name(), label).set("fill", stroke))
}

fn circle(at: Point, radius: f64, stroke: &str, fill: &str) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", at.x())
        .set("cy", at.y())
        .set("r", radius)
        .set("stroke", stroke)
        .set("fill", fill)
}

fn attitude_color(kind: AttitudeKind) -> &'static str {
    match kind {
        AttitudeKind::Pioneers => "#3ccaf8",
        AttitudeKind::Settlers => "#599afa",
        AttitudeKind::Townplanners => "#936ff9",
    }
}

/// Block arrow centred on `at`, pointing right for `direction = 1`.
fn arrow_points(at: Point, direction: f64) -> String {
    let shape = [(-30.0, -8.0), (10.0, -8.0), (10.0, -16.0), (30.0, 0.0), (10.0, 16.0), (10.0, 8.0), (-30.0, 8.0)];
    shape
        .iter()
        .map(|(dx, dy)| format!("{},{}", at.x() + dx * direction, at.y() + dy))
        .collect::<Vec<_>>()
        .join(" ")
}
