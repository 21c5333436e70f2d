//! Presentation document: slides, theme, masters and playback settings.

use crate::elements::{new_id, SlideElement};
use crate::geometry::MIN_ELEMENT_SIZE;
use crate::style::{Color, Gradient};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f64 = 1280.0;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f64 = 720.0;

/// Identifier of a slide, unique within its presentation.
pub type SlideId = String;

/// Problems found while loading or validating a document.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Presentation has no slides")]
    NoSlides,
    #[error("Canvas size {width}x{height} is invalid")]
    InvalidCanvasSize { width: f64, height: f64 },
    #[error("Duplicate slide id: {0}")]
    DuplicateSlideId(String),
    #[error("Duplicate element id {element} on slide {slide}")]
    DuplicateElementId { slide: String, element: String },
    #[error("Element {0} has a non-positive or non-finite bounding box")]
    InvalidBBox(String),
    #[error("Element {0} has opacity outside [0, 1]")]
    InvalidOpacity(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Slide backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    Solid {
        color: Color,
    },
    Gradient(Gradient),
    /// Picture backdrop; `color` shows while the image loads.
    Image {
        src: String,
        #[serde(default = "default_background_size")]
        size: String,
        #[serde(default = "Color::white")]
        color: Color,
    },
}

fn default_background_size() -> String {
    "cover".to_string()
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: Color::white(),
        }
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    /// Paint order: later elements draw on top.
    #[serde(default)]
    pub elements: Vec<SlideElement>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub notes: String,
    /// Descriptive layout name, e.g. `blank` or `title-content`.
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    "blank".to_string()
}

impl Slide {
    /// An empty white slide with the `blank` layout.
    pub fn blank() -> Self {
        Self {
            id: new_id(),
            elements: Vec::new(),
            background: Background::default(),
            notes: String::new(),
            layout: default_layout(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Position of an element in paint order, which is also its z-index.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    /// Copy with fresh slide and element ids.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        for element in &mut copy.elements {
            element.regenerate_id();
        }
        copy
    }
}

/// Named color roles of a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent1: Color,
    pub accent2: Color,
    pub accent3: Color,
    pub accent4: Color,
    pub accent5: Color,
    pub accent6: Color,
    pub background1: Color,
    pub background2: Color,
    pub text1: Color,
    pub text2: Color,
    pub hyperlink: Color,
    pub followed_hyperlink: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0x00, 0x78, 0xd4),
            secondary: Color::rgb(0x2b, 0x88, 0xd8),
            accent1: Color::rgb(0xc4, 0x3e, 0x1c),
            accent2: Color::rgb(0xe6, 0x7c, 0x73),
            accent3: Color::rgb(0xf4, 0xb4, 0x00),
            accent4: Color::rgb(0x0f, 0x9d, 0x58),
            accent5: Color::rgb(0xab, 0x47, 0xbc),
            accent6: Color::rgb(0x00, 0xac, 0xc1),
            background1: Color::white(),
            background2: Color::rgb(0xf3, 0xf2, 0xf1),
            text1: Color::black(),
            text2: Color::rgb(0x32, 0x31, 0x30),
            hyperlink: Color::rgb(0x00, 0x78, 0xd4),
            followed_hyperlink: Color::rgb(0x00, 0x45, 0x78),
        }
    }
}

impl ThemeColors {
    /// The eight palette colors shown in color pickers, in order.
    pub fn palette(&self) -> [Color; 8] {
        [
            self.primary,
            self.secondary,
            self.accent1,
            self.accent2,
            self.accent3,
            self.accent4,
            self.accent5,
            self.accent6,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeFonts {
    pub heading: String,
    pub body: String,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            heading: "Arial".to_string(),
            body: "Arial".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
    #[serde(default)]
    pub fonts: ThemeFonts,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "Default".to_string(),
            colors: ThemeColors::default(),
            fonts: ThemeFonts::default(),
        }
    }
}

/// A reusable slide template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<SlideElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "16:10")]
    Wide16x10,
}

impl AspectRatio {
    /// Canvas size for this ratio at the default 1280 px width.
    pub fn canvas_size(&self) -> (f64, f64) {
        match self {
            AspectRatio::Widescreen => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            AspectRatio::Standard => (DEFAULT_WIDTH, 960.0),
            AspectRatio::Wide16x10 => (DEFAULT_WIDTH, 800.0),
        }
    }
}

/// Slideshow playback flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub auto_advance: bool,
    /// Seconds per slide when auto-advancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_time: Option<f64>,
    #[serde(default)]
    pub loop_playback: bool,
    #[serde(default)]
    pub show_progress_bar: bool,
    #[serde(default = "default_true")]
    pub show_slide_numbers: bool,
    #[serde(default)]
    pub show_notes: bool,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_advance: false,
            advance_time: None,
            loop_playback: false,
            show_progress_bar: false,
            show_slide_numbers: true,
            show_notes: false,
            aspect_ratio: AspectRatio::Widescreen,
        }
    }
}

/// The whole document being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub masters: Vec<Master>,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    /// A fresh untitled 16:9 presentation with one blank slide.
    pub fn new() -> Self {
        Self {
            id: new_id(),
            name: "Untitled Presentation".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            slides: vec![Slide::blank()],
            theme: Theme::default(),
            masters: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slide_index(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Distinct font families used by text runs, in first-appearance order.
    pub fn font_families(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut fonts = Vec::new();
        for run in self
            .slides
            .iter()
            .flat_map(|s| s.elements.iter())
            .flat_map(|e| e.text_runs())
        {
            let family = run.style.font_family.trim();
            if !family.is_empty() && seen.insert(family.to_string()) {
                fonts.push(family.to_string());
            }
        }
        fonts
    }

    /// Check every structural invariant of the document.
    pub fn validate(&self) -> ModelResult<()> {
        if self.slides.is_empty() {
            return Err(ModelError::NoSlides);
        }
        if !valid_canvas(self.width, self.height) {
            return Err(ModelError::InvalidCanvasSize {
                width: self.width,
                height: self.height,
            });
        }
        let mut slide_ids = HashSet::new();
        for slide in &self.slides {
            if !slide_ids.insert(slide.id.as_str()) {
                return Err(ModelError::DuplicateSlideId(slide.id.clone()));
            }
            let mut element_ids = HashSet::new();
            for element in &slide.elements {
                let base = element.base();
                if !element_ids.insert(base.id()) {
                    return Err(ModelError::DuplicateElementId {
                        slide: slide.id.clone(),
                        element: base.id().to_string(),
                    });
                }
                if !base.bbox.is_valid() {
                    return Err(ModelError::InvalidBBox(base.id().to_string()));
                }
                if !(0.0..=1.0).contains(&base.opacity) {
                    return Err(ModelError::InvalidOpacity(base.id().to_string()));
                }
            }
        }
        Ok(())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON and validate.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let presentation: Self = serde_json::from_str(json)?;
        presentation.validate()?;
        Ok(presentation)
    }
}

/// Whether `width` x `height` is a usable canvas size.
pub fn valid_canvas(width: f64, height: f64) -> bool {
    width.is_finite()
        && height.is_finite()
        && width >= MIN_ELEMENT_SIZE
        && height >= MIN_ELEMENT_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementBase, ShapeElement, ShapeType, TextElement};
    use crate::geometry::BBox;
    use crate::style::{TextRun, TextStyle};

    #[test]
    fn test_new_presentation() {
        let doc = Presentation::new();
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.name, "Untitled Presentation");
        assert!((doc.width - 1280.0).abs() < f64::EPSILON);
        assert!((doc.height - 720.0).abs() < f64::EPSILON);
        assert_eq!(doc.slides[0].layout, "blank");
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = Presentation::new();
        doc.slides[0]
            .elements
            .push(TextElement::new(BBox::new(10.0, 10.0, 200.0, 40.0), "Title").into());
        doc.slides[0]
            .elements
            .push(ShapeElement::new(BBox::new(50.0, 80.0, 100.0, 100.0), ShapeType::Star5).into());

        let json = doc.to_json().unwrap();
        let loaded = Presentation::from_json(&json).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_from_json_rejects_bad_canvas() {
        let mut doc = Presentation::new();
        doc.width = 0.0;
        let json = doc.to_json().unwrap();
        assert!(matches!(
            Presentation::from_json(&json),
            Err(ModelError::InvalidCanvasSize { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_empty_presentation() {
        let mut doc = Presentation::new();
        doc.slides.clear();
        let json = doc.to_json().unwrap();
        assert!(matches!(Presentation::from_json(&json), Err(ModelError::NoSlides)));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut doc = Presentation::new();
        let mut a = ShapeElement::new(BBox::default(), ShapeType::Rectangle);
        a.base = ElementBase::with_id("same", BBox::default());
        let b = a.clone();
        doc.slides[0].elements.push(a.into());
        doc.slides[0].elements.push(b.into());
        assert!(matches!(doc.validate(), Err(ModelError::DuplicateElementId { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_and_bad_bbox() {
        let mut doc = Presentation::new();
        doc.slides.clear();
        assert!(matches!(doc.validate(), Err(ModelError::NoSlides)));

        let mut doc = Presentation::new();
        doc.slides[0]
            .elements
            .push(ShapeElement::new(BBox::new(0.0, 0.0, 0.0, 10.0), ShapeType::Rectangle).into());
        assert!(matches!(doc.validate(), Err(ModelError::InvalidBBox(_))));
    }

    #[test]
    fn test_from_json_rejects_invalid_document() {
        let json = r#"{"id":"p","name":"x","width":100,"height":100,"slides":[]}"#;
        assert!(matches!(Presentation::from_json(json), Err(ModelError::NoSlides)));
        assert!(matches!(Presentation::from_json("{"), Err(ModelError::Json(_))));
    }

    #[test]
    fn test_font_families_are_distinct() {
        let mut doc = Presentation::new();
        let style = |family: &str| TextStyle {
            font_family: family.to_string(),
            ..TextStyle::default()
        };
        doc.slides[0].elements.push(
            TextElement::with_runs(
                BBox::default(),
                vec![TextRun::new("a", style("Inter")), TextRun::new("b", style("Georgia"))],
            )
            .into(),
        );
        doc.slides[0]
            .elements
            .push(TextElement::with_runs(BBox::default(), vec![TextRun::new("c", style("Inter"))]).into());
        assert_eq!(doc.font_families(), vec!["Inter".to_string(), "Georgia".to_string()]);
    }

    #[test]
    fn test_duplicated_slide_has_fresh_ids() {
        let mut slide = Slide::blank();
        slide
            .elements
            .push(TextElement::new(BBox::default(), "x").into());
        let copy = slide.duplicated();
        assert_ne!(copy.id, slide.id);
        assert_ne!(copy.elements[0].id(), slide.elements[0].id());
    }

    #[test]
    fn test_aspect_ratio_names() {
        let json = serde_json::to_string(&AspectRatio::Standard).unwrap();
        assert_eq!(json, "\"4:3\"");
        assert_eq!(AspectRatio::Wide16x10.canvas_size(), (1280.0, 800.0));
    }
}
