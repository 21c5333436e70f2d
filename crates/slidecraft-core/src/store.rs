//! Editing session state.
//!
//! [`Store`] owns the undo history, the selection, the clipboard and the index
//! of the slide being edited. All document changes go through
//! [`Store::dispatch`]; listeners registered with [`Store::subscribe`] are told
//! about every change.

use crate::arrange::{self, Alignment, Axis, ZOrder};
use crate::clipboard::Clipboard;
use crate::command::{try_apply, Command, CommandResult};
use crate::document::{Presentation, Slide};
use crate::elements::{ElementId, SlideElement};
use crate::format_painter::FormatPainter;
use crate::geometry::BBoxPatch;
use crate::history::History;
use crate::patch::ElementPatch;
use crate::selection::Selection;
use kurbo::Vec2;

/// What changed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    DocumentChanged,
    SelectionChanged,
    SlideChanged,
}

/// Handle returned by [`Store::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(StoreEvent, &Presentation)>;

pub struct Store {
    history: History,
    selection: Selection,
    clipboard: Clipboard,
    painter: FormatPainter,
    current_slide: usize,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Presentation::new())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("current_slide", &self.current_slide)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    pub fn new(document: Presentation) -> Self {
        Self {
            history: History::new(with_slide(document)),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            painter: FormatPainter::new(),
            current_slide: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Presentation {
        self.history.current()
    }

    pub fn current_slide_index(&self) -> usize {
        self.current_slide
    }

    pub fn current_slide(&self) -> &Slide {
        let doc = self.document();
        &doc.slides[self.current_slide.min(doc.slides.len().saturating_sub(1))]
    }

    pub fn selection(&self) -> &[ElementId] {
        self.selection.ids()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreEvent, &Presentation) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        let doc = self.history.current();
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, doc);
        }
    }

    /// Apply `command` and return the resulting document.
    ///
    /// Refused commands and commands that change nothing leave the history as is.
    pub fn dispatch(&mut self, command: Command) -> &Presentation {
        if let Err(e) = self.try_dispatch(command) {
            log::debug!("Command rejected: {}", e);
        }
        self.document()
    }

    /// Like [`dispatch`](Self::dispatch) but reports refusals. `Ok(false)` means
    /// the command was valid but did not change the document.
    pub fn try_dispatch(&mut self, command: Command) -> CommandResult<bool> {
        let next = try_apply(self.document(), &command)?;
        if !self.history.commit(next) {
            return Ok(false);
        }
        log::debug!("Applied {} command", command.name());
        self.after_document_change();
        Ok(true)
    }

    fn after_document_change(&mut self) {
        let slide_count = self.document().slides.len();
        let slide_moved = self.current_slide >= slide_count;
        if slide_moved {
            self.current_slide = slide_count - 1;
        }
        let slide = &self.history.current().slides[self.current_slide];
        let selection_changed = self.selection.retain_existing(slide);
        self.notify(StoreEvent::DocumentChanged);
        if slide_moved {
            self.notify(StoreEvent::SlideChanged);
        }
        if selection_changed {
            self.notify(StoreEvent::SelectionChanged);
        }
    }

    /// Step back in history. Clears the selection. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.after_history_move();
        true
    }

    /// Step forward in history. Clears the selection. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        self.after_document_change();
        if had_selection {
            self.notify(StoreEvent::SelectionChanged);
        }
    }

    /// Replace the document, e.g. after opening a file. History starts over.
    pub fn load(&mut self, document: Presentation) {
        self.history.reset(with_slide(document));
        self.selection.clear();
        self.current_slide = 0;
        self.notify(StoreEvent::DocumentChanged);
        self.notify(StoreEvent::SlideChanged);
        self.notify(StoreEvent::SelectionChanged);
    }

    // --- slides ---

    pub fn go_to_slide(&mut self, index: usize) -> bool {
        if index >= self.document().slides.len() || index == self.current_slide {
            return false;
        }
        self.current_slide = index;
        self.selection.clear();
        self.notify(StoreEvent::SlideChanged);
        self.notify(StoreEvent::SelectionChanged);
        true
    }

    /// Insert a blank slide after the current one and switch to it.
    pub fn add_slide(&mut self) {
        let after = self.current_slide;
        if let Ok(true) = self.try_dispatch(Command::AddSlide { after }) {
            self.go_to_slide(after + 1);
        }
    }

    pub fn duplicate_slide(&mut self, index: usize) {
        if let Ok(true) = self.try_dispatch(Command::DuplicateSlide { index }) {
            self.go_to_slide(index + 1);
        }
    }

    pub fn delete_slide(&mut self, index: usize) {
        if let Ok(true) = self.try_dispatch(Command::DeleteSlide { index }) {
            if index < self.current_slide {
                self.current_slide -= 1;
                self.notify(StoreEvent::SlideChanged);
            }
        }
    }

    /// Move a slide; the current slide follows it when it is the one moved.
    pub fn move_slide(&mut self, from: usize, to: usize) {
        if let Ok(true) = self.try_dispatch(Command::MoveSlide { from, to }) {
            if self.current_slide == from {
                self.current_slide = to;
                self.notify(StoreEvent::SlideChanged);
            }
        }
    }

    // --- selection ---

    pub fn select(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let slide = self.current_slide();
        let ids: Vec<ElementId> = ids.into_iter().filter(|id| slide.contains(id)).collect();
        self.selection.set(ids);
        self.notify(StoreEvent::SelectionChanged);
    }

    pub fn toggle_selection(&mut self, id: ElementId) {
        if !self.current_slide().contains(&id) {
            return;
        }
        self.selection.toggle(id);
        self.notify(StoreEvent::SelectionChanged);
    }

    pub fn select_all(&mut self) {
        let ids: Vec<ElementId> = self.current_slide().elements.iter().map(|e| e.id().to_string()).collect();
        self.select(ids);
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.notify(StoreEvent::SelectionChanged);
    }

    // --- elements ---

    /// Add an element to the current slide and select it. Returns its id.
    pub fn add_element(&mut self, element: SlideElement) -> Option<ElementId> {
        let slide = self.current_slide;
        match self.try_dispatch(Command::AddElement { slide, element }) {
            Ok(true) => {
                let id = self.current_slide().elements.last()?.id().to_string();
                self.select([id.clone()]);
                Some(id)
            }
            _ => None,
        }
    }

    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> &Presentation {
        let slide = self.current_slide;
        self.dispatch(Command::UpdateElement { slide, id, patch })
    }

    pub fn delete_selected(&mut self) {
        let slide = self.current_slide;
        let commands = self
            .selection
            .ids()
            .iter()
            .map(|id| Command::DeleteElement { slide, id: id.clone() })
            .collect::<Vec<_>>();
        if !commands.is_empty() {
            self.dispatch(Command::Batch(commands));
        }
    }

    /// Duplicate the selection on top of the slide and select the copies.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let offset = Vec2::new(crate::command::PASTE_OFFSET, crate::command::PASTE_OFFSET);
        let copies: Vec<SlideElement> = self
            .selection
            .in_paint_order(self.current_slide())
            .iter()
            .filter_map(|id| self.current_slide().element(id))
            .map(|e| e.duplicated(offset))
            .collect();
        self.insert_and_select(copies)
    }

    fn insert_and_select(&mut self, elements: Vec<SlideElement>) -> Vec<ElementId> {
        if elements.is_empty() {
            return Vec::new();
        }
        let slide = self.current_slide;
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id().to_string()).collect();
        let commands = elements
            .into_iter()
            .map(|element| Command::AddElement { slide, element })
            .collect();
        match self.try_dispatch(Command::Batch(commands)) {
            Ok(true) => {
                self.select(ids.clone());
                ids
            }
            _ => Vec::new(),
        }
    }

    // --- clipboard ---

    pub fn copy(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        let slide = &self.history.current().slides[self.current_slide];
        self.clipboard.copy(slide, &ids)
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self) -> usize {
        let copied = self.copy();
        if copied > 0 {
            self.delete_selected();
        }
        copied
    }

    /// Paste onto the current slide; the pasted elements become the selection.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let pasted = self.clipboard.paste();
        let ids = self.insert_and_select(pasted);
        if !ids.is_empty() {
            log::info!("Pasted {} element(s)", ids.len());
        }
        ids
    }

    // --- arrangement ---

    fn apply_boxes(&mut self, updates: Vec<(ElementId, crate::geometry::BBox)>) {
        let slide = self.current_slide;
        let commands: Vec<Command> = updates
            .into_iter()
            .map(|(id, bbox)| Command::UpdateElement {
                slide,
                id,
                patch: ElementPatch::bbox(BBoxPatch::full(bbox)),
            })
            .collect();
        if !commands.is_empty() {
            self.dispatch(Command::Batch(commands));
        }
    }

    fn apply_patches(&mut self, patches: Vec<(ElementId, ElementPatch)>) {
        let slide = self.current_slide;
        let commands: Vec<Command> = patches
            .into_iter()
            .map(|(id, patch)| Command::UpdateElement { slide, id, patch })
            .collect();
        if !commands.is_empty() {
            self.dispatch(Command::Batch(commands));
        }
    }

    pub fn align_selected(&mut self, alignment: Alignment) {
        let updates = arrange::align(&self.current_slide().elements, self.selection.ids(), alignment);
        self.apply_boxes(updates);
    }

    pub fn distribute_selected(&mut self, axis: Axis) {
        let updates = arrange::distribute(&self.current_slide().elements, self.selection.ids(), axis);
        self.apply_boxes(updates);
    }

    pub fn rotate_selected(&mut self, degrees: f64) {
        let patches = arrange::rotate_by(&self.current_slide().elements, self.selection.ids(), degrees);
        self.apply_patches(patches);
    }

    pub fn mirror_selected(&mut self, axis: Axis) {
        let patches = arrange::mirror(&self.current_slide().elements, self.selection.ids(), axis);
        self.apply_patches(patches);
    }

    /// Reorder every selected element, keeping their relative order.
    pub fn reorder_selected(&mut self, target: ZOrder) {
        let slide = self.current_slide;
        let mut ids = self.selection.in_paint_order(self.current_slide());
        // The element nearest the destination moves first.
        if matches!(target, ZOrder::SendToBack | ZOrder::BringForward) {
            ids.reverse();
        }
        let commands: Vec<Command> = ids
            .into_iter()
            .map(|id| Command::ReorderElement { slide, id, target })
            .collect();
        if !commands.is_empty() {
            self.dispatch(Command::Batch(commands));
        }
    }

    // --- format painter ---

    /// Capture the format of element `id` on the current slide.
    pub fn copy_format(&mut self, id: &str, persistent: bool) -> bool {
        let Some(element) = self.history.current().slides[self.current_slide].element(id) else {
            return false;
        };
        let copied = self.painter.copy_from(element);
        self.painter.set_persistent(copied && persistent);
        copied
    }

    /// Paint the captured format onto element `id`.
    pub fn apply_format(&mut self, id: &str) -> bool {
        let Some(element) = self.history.current().slides[self.current_slide].element(id) else {
            return false;
        };
        let Some(patch) = self.painter.paint(element) else {
            return false;
        };
        matches!(self.try_dispatch(Command::UpdateElement {
            slide: self.current_slide,
            id: id.to_string(),
            patch,
        }), Ok(true))
    }
}

/// Documents always have a slide to edit.
fn with_slide(mut document: Presentation) -> Presentation {
    if document.slides.is_empty() {
        log::warn!("Presentation {} has no slides, adding a blank one", document.id);
        document.slides.push(Slide::blank());
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementBase, ShapeElement, ShapeType, TextElement};
    use crate::geometry::BBox;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shape(id: &str, x: f64, y: f64, w: f64, h: f64) -> SlideElement {
        let mut shape = ShapeElement::new(BBox::default(), ShapeType::Rectangle);
        shape.base = ElementBase::with_id(id, BBox::new(x, y, w, h));
        shape.into()
    }

    fn store_with(elements: Vec<SlideElement>) -> Store {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = Presentation::new();
        doc.slides[0].elements = elements;
        Store::new(doc)
    }

    #[test]
    fn test_empty_document_gets_a_slide() {
        let mut doc = Presentation::new();
        doc.slides.clear();
        let mut store = Store::new(doc.clone());
        assert_eq!(store.document().slides.len(), 1);
        assert!(store.current_slide().elements.is_empty());
        assert!(store.document().validate().is_ok());

        store.load(doc);
        assert_eq!(store.document().slides.len(), 1);
        assert_eq!(store.current_slide_index(), 0);
    }

    #[test]
    fn test_dispatch_commits_and_notifies() {
        let mut store = Store::default();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event, _| sink.borrow_mut().push(event));

        store.dispatch(Command::AddSlide { after: 0 });
        assert_eq!(store.document().slides.len(), 2);
        assert!(store.can_undo());
        assert_eq!(events.borrow().as_slice(), [StoreEvent::DocumentChanged]);
    }

    #[test]
    fn test_noop_commands_do_not_commit() {
        let mut store = store_with(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        store.dispatch(Command::DeleteElement {
            slide: 0,
            id: "ghost".to_string(),
        });
        store.dispatch(Command::ReorderElement {
            slide: 0,
            id: "a".to_string(),
            target: ZOrder::BringToFront,
        });
        assert!(!store.can_undo());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut store = store_with(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        store.select(["a".to_string()]);
        store.update_element("a".to_string(), ElementPatch::bbox(BBoxPatch::position(50.0, 50.0)));
        assert_eq!(store.selection(), ["a"]);

        assert!(store.undo());
        assert!(store.selection().is_empty());
        assert_eq!(store.current_slide().elements[0].bbox().x, 0.0);
        assert!(store.redo());
        assert_eq!(store.current_slide().elements[0].bbox().x, 50.0);
        assert!(!store.redo());
    }

    #[test]
    fn test_paste_scenario() {
        let mut store = store_with(vec![shape("a", 10.0, 10.0, 30.0, 30.0)]);
        store.select(["a".to_string()]);
        assert_eq!(store.copy(), 1);
        let pasted = store.paste();

        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], "a");
        assert_eq!(store.selection(), pasted.as_slice());
        let element = store.current_slide().element(&pasted[0]).unwrap();
        assert_eq!(element.bbox(), BBox::new(30.0, 30.0, 30.0, 30.0));
    }

    #[test]
    fn test_clipboard_survives_undo() {
        let mut store = store_with(vec![shape("a", 10.0, 10.0, 30.0, 30.0)]);
        store.select(["a".to_string()]);
        assert_eq!(store.cut(), 1);
        assert!(store.current_slide().elements.is_empty());

        store.undo();
        store.undo();
        assert_eq!(store.clipboard().len(), 1);
        let pasted = store.paste();
        assert_eq!(pasted.len(), 1);
        assert_eq!(store.current_slide().elements.len(), 2);
    }

    #[test]
    fn test_paste_onto_another_slide() {
        let mut store = store_with(vec![shape("a", 10.0, 10.0, 30.0, 30.0)]);
        store.select(["a".to_string()]);
        store.copy();
        store.add_slide();
        assert_eq!(store.current_slide_index(), 1);
        let pasted = store.paste();
        assert_eq!(store.document().slides[1].elements.len(), 1);
        assert_eq!(store.document().slides[1].elements[0].id(), pasted[0]);
    }

    #[test]
    fn test_align_and_distribute_selected() {
        let mut store = store_with(vec![
            shape("a", 0.0, 0.0, 20.0, 20.0),
            shape("b", 40.0, 10.0, 20.0, 20.0),
            shape("c", 200.0, 20.0, 20.0, 20.0),
        ]);
        store.select(["a", "b", "c"].map(String::from));
        store.distribute_selected(Axis::Horizontal);
        assert_eq!(store.current_slide().element("b").unwrap().bbox().x, 100.0);
        assert_eq!(store.history().len(), 2);

        store.align_selected(Alignment::Top);
        for id in ["a", "b", "c"] {
            assert_eq!(store.current_slide().element(id).unwrap().bbox().y, 0.0);
        }
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn test_reorder_selected_keeps_relative_order() {
        let mut store = store_with(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 0.0, 0.0, 10.0, 10.0),
            shape("c", 0.0, 0.0, 10.0, 10.0),
            shape("d", 0.0, 0.0, 10.0, 10.0),
        ]);
        let order = |store: &Store| {
            store
                .current_slide()
                .elements
                .iter()
                .map(|e| e.id().to_string())
                .collect::<Vec<_>>()
        };
        store.select(["a", "b"].map(String::from));
        store.reorder_selected(ZOrder::BringToFront);
        assert_eq!(order(&store), ["c", "d", "a", "b"]);

        store.reorder_selected(ZOrder::SendToBack);
        assert_eq!(order(&store), ["a", "b", "c", "d"]);

        store.reorder_selected(ZOrder::BringForward);
        assert_eq!(order(&store), ["c", "a", "b", "d"]);
    }

    #[test]
    fn test_delete_slide_keeps_current_valid() {
        let mut store = Store::default();
        store.add_slide();
        store.add_slide();
        assert_eq!(store.current_slide_index(), 2);
        store.delete_slide(2);
        assert_eq!(store.current_slide_index(), 1);
        store.delete_slide(0);
        assert_eq!(store.current_slide_index(), 0);
        store.delete_slide(0);
        assert_eq!(store.document().slides.len(), 1);
    }

    #[test]
    fn test_duplicate_selected() {
        let mut store = store_with(vec![shape("a", 10.0, 10.0, 30.0, 30.0)]);
        store.select(["a".to_string()]);
        let copies = store.duplicate_selected();
        assert_eq!(copies.len(), 1);
        assert_eq!(store.current_slide().elements.len(), 2);
        assert_eq!(store.current_slide().elements[1].bbox(), BBox::new(30.0, 30.0, 30.0, 30.0));
        assert_eq!(store.selection(), copies.as_slice());
    }

    #[test]
    fn test_format_painter_through_store() {
        let mut text = TextElement::new(BBox::default(), "Source");
        text.base = ElementBase::with_id("src", BBox::default());
        text.runs[0].style.font_family = "Courier New".to_string();
        let mut target = TextElement::new(BBox::default(), "Target");
        target.base = ElementBase::with_id("dst", BBox::default());
        let mut store = store_with(vec![text.into(), target.into()]);

        assert!(store.copy_format("src", false));
        assert!(store.apply_format("dst"));
        let runs = store.current_slide().element("dst").unwrap().text_runs();
        assert_eq!(runs[0].style.font_family, "Courier New");
        assert!(!store.apply_format("dst"));
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = Store::default();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);
        store.dispatch(Command::AddSlide { after: 0 });
        assert!(store.unsubscribe(id));
        store.dispatch(Command::AddSlide { after: 0 });
        assert_eq!(*count.borrow(), 1);
        assert!(!store.unsubscribe(id));
    }
}
