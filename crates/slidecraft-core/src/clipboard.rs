//! Element clipboard.
//!
//! Entries are value copies taken at copy time. The clipboard lives outside the
//! document, so undoing or redoing edits never changes what will be pasted, and
//! entries can be pasted onto any slide.

use crate::command::PASTE_OFFSET;
use crate::document::Slide;
use crate::elements::{ElementId, SlideElement};
use kurbo::Vec2;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<SlideElement>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the elements of `slide` whose ids are in `ids`, in paint order.
    /// Returns the number of elements copied; copying nothing keeps the old contents.
    pub fn copy(&mut self, slide: &Slide, ids: &[ElementId]) -> usize {
        let copied: Vec<SlideElement> = slide
            .elements
            .iter()
            .filter(|e| ids.iter().any(|id| id == e.id()))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        self.entries = copied;
        log::info!("Copied {} element(s) to clipboard", self.entries.len());
        self.entries.len()
    }

    /// Fresh copies of the entries, each with a new id and shifted by
    /// [`PASTE_OFFSET`] on both axes.
    pub fn paste(&self) -> Vec<SlideElement> {
        let offset = Vec2::new(PASTE_OFFSET, PASTE_OFFSET);
        self.entries.iter().map(|e| e.duplicated(offset)).collect()
    }

    pub fn entries(&self) -> &[SlideElement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementBase, ShapeElement, ShapeType};
    use crate::geometry::BBox;

    fn slide() -> Slide {
        let mut slide = Slide::blank();
        for (id, x) in [("a", 10.0), ("b", 50.0)] {
            let mut shape = ShapeElement::new(BBox::default(), ShapeType::Rectangle);
            shape.base = ElementBase::with_id(id, BBox::new(x, 10.0, 30.0, 30.0));
            slide.elements.push(shape.into());
        }
        slide
    }

    #[test]
    fn test_copy_and_paste_offsets() {
        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.copy(&slide(), &["a".to_string()]), 1);
        let pasted = clipboard.paste();
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0].id(), "a");
        assert_eq!(pasted[0].bbox(), BBox::new(30.0, 30.0, 30.0, 30.0));
        // entries themselves are untouched
        assert_eq!(clipboard.entries()[0].id(), "a");
    }

    #[test]
    fn test_copy_keeps_paint_order() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&slide(), &["b".to_string(), "a".to_string()]);
        let ids: Vec<&str> = clipboard.entries().iter().map(|e| e.id()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_empty_copy_keeps_contents() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&slide(), &["a".to_string()]);
        assert_eq!(clipboard.copy(&slide(), &[]), 0);
        assert_eq!(clipboard.len(), 1);
    }

    #[test]
    fn test_each_paste_gets_new_ids() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&slide(), &["a".to_string()]);
        let first = clipboard.paste();
        let second = clipboard.paste();
        assert_ne!(first[0].id(), second[0].id());
    }
}
