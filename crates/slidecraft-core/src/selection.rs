//! The set of selected elements on the current slide.

use crate::document::Slide;
use crate::elements::ElementId;

/// Ordered set of selected element ids. Not part of the undo history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn add(&mut self, id: ElementId) {
        if !self.is_selected(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|s| s != id);
    }

    pub fn toggle(&mut self, id: ElementId) {
        if self.is_selected(&id) {
            self.remove(&id);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist on `slide`. Returns whether anything was removed.
    pub fn retain_existing(&mut self, slide: &Slide) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| slide.contains(id));
        self.ids.len() != before
    }

    /// Selected ids sorted by their paint order on `slide`.
    pub fn in_paint_order(&self, slide: &Slide) -> Vec<ElementId> {
        slide
            .elements
            .iter()
            .filter(|e| self.is_selected(e.id()))
            .map(|e| e.id().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementBase, ShapeElement, ShapeType};
    use crate::geometry::BBox;

    fn slide_with(ids: &[&str]) -> Slide {
        let mut slide = Slide::blank();
        for id in ids {
            let mut shape = ShapeElement::new(BBox::default(), ShapeType::Rectangle);
            shape.base = ElementBase::with_id(*id, BBox::default());
            slide.elements.push(shape.into());
        }
        slide
    }

    #[test]
    fn test_set_add_toggle() {
        let mut sel = Selection::new();
        sel.set(vec!["a".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(sel.ids(), ["a", "b"]);

        sel.toggle("a".to_string());
        assert_eq!(sel.ids(), ["b"]);
        sel.toggle("c".to_string());
        assert!(sel.is_selected("c"));
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_retain_existing() {
        let slide = slide_with(&["a", "b"]);
        let mut sel = Selection::new();
        sel.set(vec!["b".to_string(), "gone".to_string()]);
        assert!(sel.retain_existing(&slide));
        assert_eq!(sel.ids(), ["b"]);
        assert!(!sel.retain_existing(&slide));
    }

    #[test]
    fn test_paint_order() {
        let slide = slide_with(&["a", "b", "c"]);
        let mut sel = Selection::new();
        sel.set(vec!["c".to_string(), "a".to_string()]);
        assert_eq!(sel.in_paint_order(&slide), ["a", "c"]);
    }
}
