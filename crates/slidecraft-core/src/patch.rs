//! Partial updates for document entities.
//!
//! Every patch field is optional; `None` leaves the target untouched. Fields
//! that are themselves optional on the target (borders, shadows, fills) use
//! `Option<Option<T>>`: `Some(None)` clears them, `Some(Some(v))` sets them.
//! Nested structures are merged field by field rather than replaced.

use crate::document::{AspectRatio, Background, Presentation, Settings, Slide, Theme};
use crate::elements::{
    ImageElement, ImageSource, ObjectFit, ShapeElement, ShapeType, SlideElement, TableCell,
    TableElement, TextElement,
};
use crate::geometry::BBoxPatch;
use crate::style::{Border, Fill, ParagraphStyle, Shadow, TextAlign, TextRun, TextStyle, VerticalAlign};

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// Update of the fields shared by all elements plus an optional kind-specific part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementPatch {
    pub bbox: Option<BBoxPatch>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub content: Option<ContentPatch>,
}

impl ElementPatch {
    pub fn bbox(patch: BBoxPatch) -> Self {
        Self {
            bbox: Some(patch),
            ..Default::default()
        }
    }

    pub fn content(content: ContentPatch) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Kind-specific part of an [`ElementPatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPatch {
    Text(TextPatch),
    Shape(ShapePatch),
    Image(ImagePatch),
    Table(TablePatch),
}

impl ContentPatch {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentPatch::Text(_) => "text",
            ContentPatch::Shape(_) => "shape",
            ContentPatch::Image(_) => "image",
            ContentPatch::Table(_) => "table",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphPatch {
    pub align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub indent: Option<f64>,
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
}

impl ParagraphPatch {
    pub fn apply_to(&self, style: &mut ParagraphStyle) {
        set(&mut style.align, &self.align);
        set(&mut style.line_height, &self.line_height);
        set(&mut style.indent, &self.indent);
        set(&mut style.space_before, &self.space_before);
        set(&mut style.space_after, &self.space_after);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPatch {
    pub runs: Option<Vec<TextRun>>,
    /// Restyle every run, keeping the text.
    pub run_style: Option<TextStyle>,
    pub paragraph: Option<ParagraphPatch>,
    pub vertical_align: Option<VerticalAlign>,
    pub padding: Option<f64>,
    pub background: Option<Option<Fill>>,
    pub border: Option<Option<Border>>,
    pub shadow: Option<Option<Shadow>>,
}

impl TextPatch {
    pub fn apply_to(&self, text: &mut TextElement) {
        set(&mut text.runs, &self.runs);
        if let Some(style) = &self.run_style {
            for run in &mut text.runs {
                run.style = style.clone();
            }
        }
        if let Some(paragraph) = &self.paragraph {
            paragraph.apply_to(&mut text.paragraph);
        }
        set(&mut text.vertical_align, &self.vertical_align);
        set(&mut text.padding, &self.padding);
        set(&mut text.background, &self.background);
        set(&mut text.border, &self.border);
        set(&mut text.shadow, &self.shadow);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapePatch {
    pub shape_type: Option<ShapeType>,
    pub fill: Option<Option<Fill>>,
    pub border: Option<Option<Border>>,
    pub shadow: Option<Option<Shadow>>,
    pub corner_radius: Option<f64>,
    pub flip_h: Option<bool>,
    pub flip_v: Option<bool>,
}

impl ShapePatch {
    pub fn apply_to(&self, shape: &mut ShapeElement) {
        set(&mut shape.shape_type, &self.shape_type);
        set(&mut shape.fill, &self.fill);
        set(&mut shape.border, &self.border);
        set(&mut shape.shadow, &self.shadow);
        set(&mut shape.corner_radius, &self.corner_radius);
        set(&mut shape.flip_h, &self.flip_h);
        set(&mut shape.flip_v, &self.flip_v);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImagePatch {
    pub source: Option<ImageSource>,
    pub object_fit: Option<ObjectFit>,
    pub flip_h: Option<bool>,
    pub flip_v: Option<bool>,
    pub border: Option<Option<Border>>,
    pub shadow: Option<Option<Shadow>>,
}

impl ImagePatch {
    pub fn apply_to(&self, image: &mut ImageElement) {
        set(&mut image.source, &self.source);
        set(&mut image.object_fit, &self.object_fit);
        set(&mut image.flip_h, &self.flip_h);
        set(&mut image.flip_v, &self.flip_v);
        set(&mut image.border, &self.border);
        set(&mut image.shadow, &self.shadow);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TablePatch {
    /// Replacement grid; row and column counts follow it.
    pub cells: Option<Vec<Vec<TableCell>>>,
    pub header_row: Option<bool>,
}

impl TablePatch {
    pub fn apply_to(&self, table: &mut TableElement) {
        if let Some(cells) = &self.cells {
            table.rows = cells.len();
            table.cols = cells.iter().map(Vec::len).max().unwrap_or(0);
            table.cells = cells.clone();
        }
        set(&mut table.header_row, &self.header_row);
    }
}

/// Outcome of merging an [`ElementPatch`] whose content part targets another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMismatch {
    pub element: &'static str,
    pub patch: &'static str,
}

impl ElementPatch {
    /// Merge onto `element`. Fails without touching it when the content part
    /// targets a different element kind.
    pub fn apply_to(&self, element: &mut SlideElement) -> Result<(), KindMismatch> {
        match (&self.content, &mut *element) {
            (None, _) => {}
            (Some(ContentPatch::Text(p)), SlideElement::Text(e)) => p.apply_to(e),
            (Some(ContentPatch::Shape(p)), SlideElement::Shape(e)) => p.apply_to(e),
            (Some(ContentPatch::Image(p)), SlideElement::Image(e)) => p.apply_to(e),
            (Some(ContentPatch::Table(p)), SlideElement::Table(e)) => p.apply_to(e),
            (Some(content), other) => {
                return Err(KindMismatch {
                    element: other.kind().as_str(),
                    patch: content.kind_name(),
                });
            }
        }
        let base = element.base_mut();
        if let Some(bbox) = &self.bbox {
            base.bbox.merge(bbox);
        }
        set(&mut base.rotation, &self.rotation);
        set(&mut base.opacity, &self.opacity);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlidePatch {
    pub background: Option<Background>,
    pub notes: Option<String>,
    pub layout: Option<String>,
}

impl SlidePatch {
    pub fn apply_to(&self, slide: &mut Slide) {
        set(&mut slide.background, &self.background);
        set(&mut slide.notes, &self.notes);
        set(&mut slide.layout, &self.layout);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsPatch {
    pub auto_advance: Option<bool>,
    pub advance_time: Option<Option<f64>>,
    pub loop_playback: Option<bool>,
    pub show_progress_bar: Option<bool>,
    pub show_slide_numbers: Option<bool>,
    pub show_notes: Option<bool>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl SettingsPatch {
    pub fn apply_to(&self, settings: &mut Settings) {
        set(&mut settings.auto_advance, &self.auto_advance);
        set(&mut settings.advance_time, &self.advance_time);
        set(&mut settings.loop_playback, &self.loop_playback);
        set(&mut settings.show_progress_bar, &self.show_progress_bar);
        set(&mut settings.show_slide_numbers, &self.show_slide_numbers);
        set(&mut settings.show_notes, &self.show_notes);
        set(&mut settings.aspect_ratio, &self.aspect_ratio);
    }
}

/// Update of presentation-wide properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentationPatch {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub theme: Option<Theme>,
    pub settings: Option<SettingsPatch>,
}

impl PresentationPatch {
    pub fn apply_to(&self, presentation: &mut Presentation) {
        set(&mut presentation.name, &self.name);
        set(&mut presentation.width, &self.width);
        set(&mut presentation.height, &self.height);
        set(&mut presentation.theme, &self.theme);
        if let Some(settings) = &self.settings {
            settings.apply_to(&mut presentation.settings);
        }
    }
}
