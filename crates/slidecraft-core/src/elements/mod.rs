//! Slide element definitions.

mod image;
mod shape;
mod table;
mod text;

pub use image::{ImageElement, ImageFormat, ImageSource, ObjectFit};
pub use shape::{ShapeElement, ShapeType, SHAPE_VIEW_BOX};
pub use table::{TableCell, TableElement};
pub use text::TextElement;

use crate::geometry::BBox;
use crate::style::{Border, Shadow, TextRun};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an element, unique within its slide.
pub type ElementId = String;

/// Generate a fresh element or slide identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_opacity() -> f64 {
    1.0
}

/// Fields shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBase {
    pub(crate) id: ElementId,
    pub bbox: BBox,
    /// Rotation in degrees; not normalized.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ElementBase {
    pub fn new(bbox: BBox) -> Self {
        Self::with_id(new_id(), bbox)
    }

    pub fn with_id(id: impl Into<ElementId>, bbox: BBox) -> Self {
        Self {
            id: id.into(),
            bbox,
            rotation: 0.0,
            opacity: default_opacity(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Discriminant of a [`SlideElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Shape,
    Image,
    Table,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Shape => "shape",
            ElementKind::Image => "image",
            ElementKind::Table => "table",
        }
    }
}

/// A visual element placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlideElement {
    Text(TextElement),
    Shape(ShapeElement),
    Image(ImageElement),
    Table(TableElement),
}

impl SlideElement {
    pub fn base(&self) -> &ElementBase {
        match self {
            SlideElement::Text(e) => &e.base,
            SlideElement::Shape(e) => &e.base,
            SlideElement::Image(e) => &e.base,
            SlideElement::Table(e) => &e.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            SlideElement::Text(e) => &mut e.base,
            SlideElement::Shape(e) => &mut e.base,
            SlideElement::Image(e) => &mut e.base,
            SlideElement::Table(e) => &mut e.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn bbox(&self) -> BBox {
        self.base().bbox
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            SlideElement::Text(_) => ElementKind::Text,
            SlideElement::Shape(_) => ElementKind::Shape,
            SlideElement::Image(_) => ElementKind::Image,
            SlideElement::Table(_) => ElementKind::Table,
        }
    }

    /// Assign a new unique ID.
    pub fn regenerate_id(&mut self) {
        self.base_mut().id = new_id();
    }

    pub fn translate(&mut self, delta: Vec2) {
        let base = self.base_mut();
        base.bbox = base.bbox.translated(delta);
    }

    /// Copy with a fresh ID, shifted by `offset`.
    pub fn duplicated(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy.translate(offset);
        copy
    }

    pub fn border(&self) -> Option<&Border> {
        match self {
            SlideElement::Text(e) => e.border.as_ref(),
            SlideElement::Shape(e) => e.border.as_ref(),
            SlideElement::Image(e) => e.border.as_ref(),
            SlideElement::Table(_) => None,
        }
    }

    pub fn shadow(&self) -> Option<&Shadow> {
        match self {
            SlideElement::Text(e) => e.shadow.as_ref(),
            SlideElement::Shape(e) => e.shadow.as_ref(),
            SlideElement::Image(e) => e.shadow.as_ref(),
            SlideElement::Table(_) => None,
        }
    }

    /// Every text run held by the element, in reading order.
    pub fn text_runs(&self) -> Vec<&TextRun> {
        match self {
            SlideElement::Text(e) => e.runs.iter().collect(),
            SlideElement::Table(e) => e.cells.iter().flatten().flat_map(|c| c.runs.iter()).collect(),
            SlideElement::Shape(_) | SlideElement::Image(_) => Vec::new(),
        }
    }

    pub fn text_runs_mut(&mut self) -> Vec<&mut TextRun> {
        match self {
            SlideElement::Text(e) => e.runs.iter_mut().collect(),
            SlideElement::Table(e) => e
                .cells
                .iter_mut()
                .flatten()
                .flat_map(|c| c.runs.iter_mut())
                .collect(),
            SlideElement::Shape(_) | SlideElement::Image(_) => Vec::new(),
        }
    }
}

impl From<TextElement> for SlideElement {
    fn from(e: TextElement) -> Self {
        SlideElement::Text(e)
    }
}

impl From<ShapeElement> for SlideElement {
    fn from(e: ShapeElement) -> Self {
        SlideElement::Shape(e)
    }
}

impl From<ImageElement> for SlideElement {
    fn from(e: ImageElement) -> Self {
        SlideElement::Image(e)
    }
}

impl From<TableElement> for SlideElement {
    fn from(e: TableElement) -> Self {
        SlideElement::Table(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tagging() {
        let el: SlideElement = ShapeElement::new(BBox::new(0.0, 0.0, 50.0, 50.0), ShapeType::Ellipse).into();
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "shape");
        assert_eq!(json["shape_type"], "ellipse");
        assert_eq!(json["id"], el.id());

        let back: SlideElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_opacity_defaults_to_one() {
        let json = r#"{"type":"text","id":"t1","bbox":{"x":0,"y":0,"width":10,"height":10},"runs":[]}"#;
        let el: SlideElement = serde_json::from_str(json).unwrap();
        assert!((el.base().opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(el.kind(), ElementKind::Text);
    }

    #[test]
    fn test_duplicated_gets_new_id_and_offset() {
        let el: SlideElement = TextElement::new(BBox::new(10.0, 10.0, 30.0, 30.0), "Hi").into();
        let copy = el.duplicated(Vec2::new(20.0, 20.0));
        assert_ne!(copy.id(), el.id());
        assert_eq!(copy.bbox(), BBox::new(30.0, 30.0, 30.0, 30.0));
    }

    #[test]
    fn test_table_runs_are_visited() {
        let mut table = TableElement::new(BBox::default(), 2, 2);
        table.cells[1][0].runs.push(TextRun::plain("cell"));
        let el = SlideElement::Table(table);
        assert_eq!(el.text_runs().len(), 1);
        assert_eq!(el.text_runs()[0].text, "cell");
    }
}
