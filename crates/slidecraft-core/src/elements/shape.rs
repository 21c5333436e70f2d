//! Geometric shape element and the shape catalogue.

use super::ElementBase;
use crate::geometry::BBox;
use crate::style::{Border, Color, Fill, Shadow};
use serde::{Deserialize, Serialize};

/// View box every catalogue path is drawn in.
pub const SHAPE_VIEW_BOX: &str = "0 0 100 100";

/// Closed set of shape outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    #[default]
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Triangle,
    RightTriangle,
    Parallelogram,
    Trapezoid,
    Diamond,
    Pentagon,
    Hexagon,
    Octagon,
    #[serde(rename = "star-4")]
    Star4,
    #[serde(rename = "star-5")]
    Star5,
    #[serde(rename = "star-6")]
    Star6,
    #[serde(rename = "star-8")]
    Star8,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Chevron,
    Heart,
    Cloud,
    Lightning,
}

impl ShapeType {
    pub const ALL: [ShapeType; 23] = [
        ShapeType::Rectangle,
        ShapeType::RoundedRectangle,
        ShapeType::Ellipse,
        ShapeType::Triangle,
        ShapeType::RightTriangle,
        ShapeType::Parallelogram,
        ShapeType::Trapezoid,
        ShapeType::Diamond,
        ShapeType::Pentagon,
        ShapeType::Hexagon,
        ShapeType::Octagon,
        ShapeType::Star4,
        ShapeType::Star5,
        ShapeType::Star6,
        ShapeType::Star8,
        ShapeType::ArrowRight,
        ShapeType::ArrowLeft,
        ShapeType::ArrowUp,
        ShapeType::ArrowDown,
        ShapeType::Chevron,
        ShapeType::Heart,
        ShapeType::Cloud,
        ShapeType::Lightning,
    ];

    /// Identifier used in documents and layouts.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::RoundedRectangle => "rounded-rectangle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Triangle => "triangle",
            ShapeType::RightTriangle => "right-triangle",
            ShapeType::Parallelogram => "parallelogram",
            ShapeType::Trapezoid => "trapezoid",
            ShapeType::Diamond => "diamond",
            ShapeType::Pentagon => "pentagon",
            ShapeType::Hexagon => "hexagon",
            ShapeType::Octagon => "octagon",
            ShapeType::Star4 => "star-4",
            ShapeType::Star5 => "star-5",
            ShapeType::Star6 => "star-6",
            ShapeType::Star8 => "star-8",
            ShapeType::ArrowRight => "arrow-right",
            ShapeType::ArrowLeft => "arrow-left",
            ShapeType::ArrowUp => "arrow-up",
            ShapeType::ArrowDown => "arrow-down",
            ShapeType::Chevron => "chevron",
            ShapeType::Heart => "heart",
            ShapeType::Cloud => "cloud",
            ShapeType::Lightning => "lightning",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Outline as SVG path data in [`SHAPE_VIEW_BOX`] coordinates.
    pub fn svg_path(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "M 0 0 L 100 0 L 100 100 L 0 100 Z",
            ShapeType::RoundedRectangle => {
                "M 10 0 L 90 0 Q 100 0 100 10 L 100 90 Q 100 100 90 100 L 10 100 Q 0 100 0 90 L 0 10 Q 0 0 10 0 Z"
            }
            ShapeType::Ellipse => "M 50 0 A 50 50 0 1 1 50 100 A 50 50 0 1 1 50 0 Z",
            ShapeType::Triangle => "M 50 0 L 100 100 L 0 100 Z",
            ShapeType::RightTriangle => "M 0 0 L 100 100 L 0 100 Z",
            ShapeType::Parallelogram => "M 20 0 L 100 0 L 80 100 L 0 100 Z",
            ShapeType::Trapezoid => "M 20 0 L 80 0 L 100 100 L 0 100 Z",
            ShapeType::Diamond => "M 50 0 L 100 50 L 50 100 L 0 50 Z",
            ShapeType::Pentagon => "M 50 0 L 100 38 L 81 100 L 19 100 L 0 38 Z",
            ShapeType::Hexagon => "M 25 0 L 75 0 L 100 50 L 75 100 L 25 100 L 0 50 Z",
            ShapeType::Octagon => "M 30 0 L 70 0 L 100 30 L 100 70 L 70 100 L 30 100 L 0 70 L 0 30 Z",
            ShapeType::Star4 => "M 50 0 L 60 40 L 100 50 L 60 60 L 50 100 L 40 60 L 0 50 L 40 40 Z",
            ShapeType::Star5 => "M 50 0 L 61 35 L 98 35 L 68 57 L 79 91 L 50 70 L 21 91 L 32 57 L 2 35 L 39 35 Z",
            ShapeType::Star6 => "M 50 0 L 65 35 L 100 35 L 73 57 L 88 92 L 50 70 L 12 92 L 27 57 L 0 35 L 35 35 Z",
            ShapeType::Star8 => {
                "M 50 0 L 58 29 L 85 15 L 71 42 L 100 50 L 71 58 L 85 85 L 58 71 L 50 100 L 42 71 L 15 85 L 29 58 L 0 50 L 29 42 L 15 15 L 42 29 Z"
            }
            ShapeType::ArrowRight => "M 0 40 L 70 40 L 70 20 L 100 50 L 70 80 L 70 60 L 0 60 Z",
            ShapeType::ArrowLeft => "M 30 20 L 30 40 L 100 40 L 100 60 L 30 60 L 30 80 L 0 50 Z",
            ShapeType::ArrowUp => "M 40 100 L 40 30 L 20 30 L 50 0 L 80 30 L 60 30 L 60 100 Z",
            ShapeType::ArrowDown => "M 40 0 L 40 70 L 20 70 L 50 100 L 80 70 L 60 70 L 60 0 Z",
            ShapeType::Chevron => "M 0 0 L 75 0 L 100 50 L 75 100 L 0 100 L 25 50 Z",
            ShapeType::Heart => {
                "M 50 90 Q 20 70 15 50 Q 10 30 25 20 Q 40 10 50 25 Q 60 10 75 20 Q 90 30 85 50 Q 80 70 50 90 Z"
            }
            ShapeType::Cloud => {
                "M 30 60 Q 10 60 10 40 Q 10 25 25 20 Q 30 10 40 10 Q 50 10 55 20 Q 70 15 80 25 Q 95 35 90 50 Q 85 65 70 65 Z"
            }
            ShapeType::Lightning => "M 60 0 L 30 40 L 50 40 L 20 100 L 70 50 L 50 50 L 80 0 Z",
        }
    }
}

fn default_fill() -> Option<Fill> {
    Some(Fill::solid(Color::rgb(0x00, 0x78, 0xd4)))
}

/// A filled outline from the shape catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub shape_type: ShapeType,
    #[serde(default = "default_fill")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

impl ShapeElement {
    pub fn new(bbox: BBox, shape_type: ShapeType) -> Self {
        Self {
            base: ElementBase::new(bbox),
            shape_type,
            fill: default_fill(),
            border: None,
            shadow: None,
            corner_radius: 0.0,
            flip_h: false,
            flip_v: false,
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for shape in ShapeType::ALL {
            assert_eq!(ShapeType::from_name(shape.name()), Some(shape));
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{}\"", shape.name()));
        }
        assert_eq!(ShapeType::from_name("blob"), None);
    }

    #[test]
    fn test_paths_are_closed() {
        for shape in ShapeType::ALL {
            let path = shape.svg_path();
            assert!(path.starts_with('M'), "{} path must start with a move", shape.name());
            assert!(path.ends_with('Z'), "{} path must be closed", shape.name());
        }
    }

    #[test]
    fn test_new_shape_has_default_fill() {
        let shape = ShapeElement::new(BBox::default(), ShapeType::Triangle);
        assert_eq!(shape.fill, Some(Fill::solid(Color::rgb(0, 120, 212))));
        assert!(shape.border.is_none());
    }
}
