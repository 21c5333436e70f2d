//! Copy the look of one element onto another.

use crate::elements::SlideElement;
use crate::patch::{ContentPatch, ElementPatch, ParagraphPatch, ShapePatch, TextPatch};
use crate::style::{Border, Fill, ParagraphStyle, Shadow, TextStyle};

/// Formatting captured from a source element.
#[derive(Debug, Clone, PartialEq)]
pub enum CopiedFormat {
    /// Style of the first run plus the paragraph style.
    Text {
        style: TextStyle,
        paragraph: ParagraphStyle,
    },
    Shape {
        fill: Option<Fill>,
        border: Option<Border>,
        shadow: Option<Shadow>,
        opacity: f64,
    },
}

impl CopiedFormat {
    /// Capture the format of a text or shape element.
    pub fn capture(element: &SlideElement) -> Option<Self> {
        match element {
            SlideElement::Text(text) => Some(CopiedFormat::Text {
                style: text.leading_style(),
                paragraph: text.paragraph.clone(),
            }),
            SlideElement::Shape(shape) => Some(CopiedFormat::Shape {
                fill: shape.fill.clone(),
                border: shape.border.clone(),
                shadow: shape.shadow.clone(),
                opacity: shape.base.opacity,
            }),
            SlideElement::Image(_) | SlideElement::Table(_) => None,
        }
    }

    /// Patch that paints this format onto `target`, if the kinds match.
    pub fn patch_for(&self, target: &SlideElement) -> Option<ElementPatch> {
        match (self, target) {
            (CopiedFormat::Text { style, paragraph }, SlideElement::Text(_)) => {
                Some(ElementPatch::content(ContentPatch::Text(TextPatch {
                    run_style: Some(style.clone()),
                    paragraph: Some(ParagraphPatch {
                        align: Some(paragraph.align),
                        line_height: Some(paragraph.line_height),
                        indent: Some(paragraph.indent),
                        space_before: Some(paragraph.space_before),
                        space_after: Some(paragraph.space_after),
                    }),
                    ..Default::default()
                })))
            }
            (
                CopiedFormat::Shape {
                    fill,
                    border,
                    shadow,
                    opacity,
                },
                SlideElement::Shape(_),
            ) => Some(ElementPatch {
                opacity: Some(*opacity),
                content: Some(ContentPatch::Shape(ShapePatch {
                    fill: Some(fill.clone()),
                    border: Some(border.clone()),
                    shadow: Some(shadow.clone()),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            _ => None,
        }
    }
}

/// Format painter state: the captured format and whether it stays armed after use.
#[derive(Debug, Clone, Default)]
pub struct FormatPainter {
    copied: Option<CopiedFormat>,
    persistent: bool,
}

impl FormatPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture from `element`. Returns whether the element kind supports it.
    pub fn copy_from(&mut self, element: &SlideElement) -> bool {
        self.copied = CopiedFormat::capture(element);
        self.copied.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.copied.is_some()
    }

    pub fn copied(&self) -> Option<&CopiedFormat> {
        self.copied.as_ref()
    }

    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Patch for `target`. Disarms the painter unless it is persistent.
    pub fn paint(&mut self, target: &SlideElement) -> Option<ElementPatch> {
        let patch = self.copied.as_ref()?.patch_for(target);
        if patch.is_some() && !self.persistent {
            self.clear();
        }
        patch
    }

    pub fn clear(&mut self) {
        self.copied = None;
        self.persistent = false;
    }
}
