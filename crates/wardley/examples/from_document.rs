//! Example: Building a map from the document model
//!
//! Maps are usually parsed from text, but the model can be assembled
//! directly and rendered the same way.

use wardley::{
    MapBuilder,
    document::{Anchor, Document, Element, ElementKind, EvolvedElement, Flow, Link},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Document::builder();
    builder
        .title("Tea Shop")
        .anchor(Anchor::new("Business", 0.95, 0.63, 1))
        .element(Element::new(ElementKind::Component, "Cup of Tea", 0.79, 0.61, 2))
        .element(Element::new(ElementKind::Component, "Kettle", 0.43, 0.35, 3).with_evolving(true))
        .element(Element::new(ElementKind::Component, "Power", 0.1, 0.7, 4))
        .evolved(EvolvedElement::new("Kettle", 0.62, 5))
        .link(Link::dependency("Business", "Cup of Tea", 6))
        .link(Link::dependency("Cup of Tea", "Kettle", 7))
        .link(Link::flow("Kettle", "Power", 8, Flow::new(true, false)).with_context(Some("limited by".to_string())));
    let doc = builder.build();

    println!("Built '{}' with {} elements", doc.title(), doc.elements().len());

    let svg = MapBuilder::default().render_svg(&doc)?;
    println!("{svg}");
    Ok(())
}
