//! Project schema of the external drawing tool.
//!
//! Field names follow the tool's camelCase JSON. Colors stay strings here; they
//! are parsed through the lookup tables during conversion, so a project with
//! odd color notations still loads.

use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_width() -> f64 {
    crate::document::DEFAULT_WIDTH
}

fn default_height() -> f64 {
    crate::document::DEFAULT_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProject {
    /// Not written by every producer; carried so presentation ids survive a round trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub theme: ExternalTheme,
    #[serde(default)]
    pub slides: Vec<ExternalSlide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theme_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ExternalOutline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ExternalShadow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSlide {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub elements: Vec<ExternalElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ExternalBackground>,
    /// Slide role such as `cover` or `content`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalBackground {
    /// `solid`, `image` or `gradient`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ExternalImageFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<ExternalGradient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalImageFill {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Gradient with stop positions in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalGradient {
    /// `linear` or `radial`.
    #[serde(rename = "type", default = "default_gradient_kind")]
    pub kind: String,
    #[serde(default)]
    pub colors: Vec<ExternalGradientStop>,
    #[serde(default)]
    pub rotate: f64,
}

fn default_gradient_kind() -> String {
    "linear".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalGradientStop {
    pub pos: f64,
    pub color: String,
}

/// Shape fill: a plain color string or a gradient object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalFill {
    Color(String),
    Gradient(ExternalGradient),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalOutline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalShadow {
    pub h: f64,
    pub v: f64,
    pub blur: f64,
    pub color: String,
}

/// Position, size and rotation shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFrame {
    pub id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExternalElement {
    Text(ExternalText),
    Image(ExternalImage),
    Shape(ExternalShape),
    Line(ExternalLine),
    /// Charts, tables, video and anything else; dropped on import.
    #[serde(other)]
    Unknown,
}

impl ExternalElement {
    pub fn type_name(&self) -> &'static str {
        match self {
            ExternalElement::Text(_) => "text",
            ExternalElement::Image(_) => "image",
            ExternalElement::Shape(_) => "shape",
            ExternalElement::Line(_) => "line",
            ExternalElement::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalText {
    #[serde(flatten)]
    pub frame: ExternalFrame,
    /// Inline HTML.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ExternalOutline>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_space: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ExternalShadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_space: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalImage {
    #[serde(flatten)]
    pub frame: ExternalFrame,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ExternalOutline>,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ExternalShadow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalShape {
    #[serde(flatten)]
    pub frame: ExternalFrame,
    /// Code from the shape lookup table, e.g. `OVAL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ExternalFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<ExternalOutline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ExternalShadow>,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

/// Straight connector. `start` and `end` are relative to `left`/`top`, and
/// `width` is the stroke width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLine {
    pub id: String,
    pub left: f64,
    pub top: f64,
    #[serde(default = "default_line_width")]
    pub width: f64,
    #[serde(default)]
    pub rotate: f64,
    #[serde(default)]
    pub start: [f64; 2],
    #[serde(default)]
    pub end: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn default_line_width() -> f64 {
    2.0
}

impl ExternalProject {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_with_unknown_elements() {
        let json = r##"{
            "title": "Deck",
            "width": 1000,
            "height": 562.5,
            "theme": { "backgroundColor": "#fff", "themeColors": ["#5b9bd5"], "fontName": "Roboto" },
            "slides": [{
                "id": "s1",
                "type": "cover",
                "elements": [
                    { "type": "text", "id": "t1", "left": 10, "top": 20, "width": 300, "height": 50,
                      "rotate": 0, "content": "<p>Hi</p>", "defaultFontName": "Roboto", "defaultColor": "#333" },
                    { "type": "chart", "id": "c1", "left": 0, "top": 0, "width": 10, "height": 10, "rotate": 0,
                      "data": { "series": [] } },
                    { "type": "shape", "id": "sh1", "left": 0, "top": 0, "width": 100, "height": 100, "rotate": 45,
                      "viewBox": "0 0 200 200", "path": "M 0 0 L 200 0 L 200 200 Z",
                      "fill": { "type": "linear", "colors": [{ "pos": 0, "color": "#fff" }, { "pos": 100, "color": "#000" }], "rotate": 90 } }
                ]
            }]
        }"##;
        let project = ExternalProject::from_json(json).unwrap();
        assert_eq!(project.title, "Deck");
        assert_eq!(project.theme.theme_colors, ["#5b9bd5"]);
        let slide = &project.slides[0];
        assert_eq!(slide.kind.as_deref(), Some("cover"));
        let kinds: Vec<&str> = slide.elements.iter().map(|e| e.type_name()).collect();
        assert_eq!(kinds, ["text", "unknown", "shape"]);
        match &slide.elements[2] {
            ExternalElement::Shape(shape) => {
                assert!(matches!(shape.fill, Some(ExternalFill::Gradient(_))));
                assert!((shape.frame.rotate - 45.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let project = ExternalProject::from_json("{}").unwrap();
        assert_eq!(project.title, "Untitled");
        assert!((project.width - 1280.0).abs() < f64::EPSILON);
        assert!(project.slides.is_empty());
    }

    #[test]
    fn test_fill_color_string() {
        let fill: ExternalFill = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(fill, ExternalFill::Color("#ff0000".to_string()));
    }
}
