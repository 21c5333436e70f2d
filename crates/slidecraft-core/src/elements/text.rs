//! Text box element.

use super::ElementBase;
use crate::geometry::BBox;
use crate::style::{Border, Fill, ParagraphStyle, Shadow, TextRun, TextStyle, VerticalAlign};
use serde::{Deserialize, Serialize};

/// A box of styled text runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub paragraph: ParagraphStyle,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    /// Inner padding in pixels, applied on all sides.
    #[serde(default)]
    pub padding: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl TextElement {
    /// Create a text box holding a single run in the default style.
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self::with_runs(bbox, vec![TextRun::new(text, TextStyle::default())])
    }

    pub fn with_runs(bbox: BBox, runs: Vec<TextRun>) -> Self {
        Self {
            base: ElementBase::new(bbox),
            runs,
            paragraph: ParagraphStyle::default(),
            vertical_align: VerticalAlign::Top,
            padding: 0.0,
            background: None,
            border: None,
            shadow: None,
        }
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Style of the first run, or the default style for an empty box.
    pub fn leading_style(&self) -> TextStyle {
        self.runs.first().map(|r| r.style.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let mut text = TextElement::new(BBox::default(), "Hello, ");
        text.runs.push(TextRun::plain("world"));
        assert_eq!(text.plain_text(), "Hello, world");
    }

    #[test]
    fn test_leading_style_of_empty_box() {
        let text = TextElement::with_runs(BBox::default(), Vec::new());
        assert_eq!(text.leading_style(), TextStyle::default());
    }
}
