//! Normalized layout: the converter's output and the HTML serializer's input.
//!
//! Values are already resolved here. Colors are parsed, fonts are concrete
//! family names, text is styled runs and gradient offsets are fractions.

use super::external::ExternalTheme;
use crate::style::{Border, Color, Fill, ParagraphStyle, Shadow, TextRun, VerticalAlign};
use serde::{Deserialize, Serialize};

fn default_opacity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLayout {
    pub id: String,
    pub title: String,
    pub meta: LayoutMeta,
    pub slides: Vec<LayoutSlide>,
}

/// Canvas size, theme and the fonts the slides use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMeta {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub theme: ExternalTheme,
    #[serde(default)]
    pub fonts: Vec<String>,
}

impl LayoutMeta {
    /// Font family for text without an explicit one.
    pub fn default_font(&self) -> &str {
        self.theme.font_name.as_deref().unwrap_or("Inter, sans-serif")
    }

    /// Slide color used when a slide has no background.
    pub fn background_color(&self) -> Color {
        self.theme
            .background_color
            .as_deref()
            .and_then(Color::parse)
            .unwrap_or(Color::white())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSlide {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<LayoutBackground>,
    #[serde(default)]
    pub elements: Vec<LayoutElement>,
}

/// A slide background: a paint, optionally covered by an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBackground {
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<LayoutBackgroundImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBackgroundImage {
    pub src: String,
    /// CSS `background-size` value.
    pub size: String,
}

/// Position and rotation of an element on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutElement {
    Text(LayoutText),
    Image(LayoutImage),
    Shape(LayoutShape),
}

impl LayoutElement {
    pub fn id(&self) -> &str {
        match self {
            LayoutElement::Text(t) => &t.id,
            LayoutElement::Image(i) => &i.id,
            LayoutElement::Shape(s) => &s.id,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            LayoutElement::Text(t) => &t.frame,
            LayoutElement::Image(i) => &i.frame,
            LayoutElement::Shape(s) => &s.frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutText {
    pub id: String,
    pub frame: Frame,
    pub runs: Vec<TextRun>,
    pub style: LayoutTextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTextStyle {
    #[serde(default)]
    pub paragraph: ParagraphStyle,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub padding: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Vertical writing mode.
    #[serde(default)]
    pub vertical: bool,
}

impl Default for LayoutTextStyle {
    fn default() -> Self {
        Self {
            paragraph: ParagraphStyle::default(),
            vertical_align: VerticalAlign::Top,
            padding: 0.0,
            letter_spacing: None,
            opacity: default_opacity(),
            background_color: None,
            border: None,
            shadow: None,
            vertical: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutImage {
    pub id: String,
    pub frame: Frame,
    pub src: String,
    pub style: LayoutImageStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutImageStyle {
    /// CSS `object-fit` value.
    pub object_fit: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShape {
    pub id: String,
    pub frame: Frame,
    /// Catalogue name such as `ellipse`, when the shape came from the catalogue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<String>,
    pub style: LayoutShapeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShapeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

impl NormalizedLayout {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn slide(&self, id: &str) -> Option<&LayoutSlide> {
        self.slides.iter().find(|s| s.id == id)
    }
}
