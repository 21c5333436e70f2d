//! Document mutations.
//!
//! A [`Command`] describes one edit. [`try_apply`] produces the edited copy of a
//! document or the reason the edit was refused; [`apply`] is the tolerant form
//! that hands back an unchanged copy instead of an error.

use crate::arrange::{self, ZOrder};
use crate::document::{valid_canvas, Presentation, Slide};
use crate::elements::{ElementId, SlideElement};
use crate::patch::{ElementPatch, PresentationPatch, SlidePatch};
use kurbo::Vec2;
use thiserror::Error;

/// Offset applied to duplicated and pasted elements.
pub const PASTE_OFFSET: f64 = 20.0;

/// Why a command left the document unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Slide index {0} is out of range")]
    SlideNotFound(usize),
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Cannot delete the last slide")]
    LastSlide,
    #[error("Element {0} would get an invalid bounding box")]
    InvalidBBox(String),
    #[error("Opacity {0} is outside [0, 1]")]
    InvalidOpacity(f64),
    #[error("Cannot apply a {patch} update to {element} element {id}")]
    KindMismatch {
        id: String,
        element: &'static str,
        patch: &'static str,
    },
    #[error("Canvas size {width}x{height} is invalid")]
    InvalidCanvasSize { width: f64, height: f64 },
    #[error("Search text must not be empty")]
    EmptySearch,
}

impl CommandError {
    /// Whether the command referred to a slide or element that does not exist,
    /// as opposed to being refused by a document rule.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, CommandError::SlideNotFound(_) | CommandError::ElementNotFound(_))
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// One edit of a [`Presentation`]. Slides are addressed by index, elements by id
/// within a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a blank slide after `after` (clamped to the end).
    AddSlide { after: usize },
    /// Insert a copy of a slide, with fresh ids, right after it.
    DuplicateSlide { index: usize },
    DeleteSlide { index: usize },
    MoveSlide { from: usize, to: usize },
    UpdateSlide { index: usize, patch: SlidePatch },
    /// Append an element on top. A missing or clashing id is replaced by a fresh one.
    AddElement { slide: usize, element: SlideElement },
    UpdateElement { slide: usize, id: ElementId, patch: ElementPatch },
    DeleteElement { slide: usize, id: ElementId },
    /// Append a copy offset by [`PASTE_OFFSET`] on both axes.
    DuplicateElement { slide: usize, id: ElementId },
    ReorderElement { slide: usize, id: ElementId, target: ZOrder },
    UpdatePresentationSettings(PresentationPatch),
    /// Replace every occurrence of `find` in all text runs.
    ReplaceText { find: String, replace: String },
    /// Apply several commands as one edit; any failure rejects them all.
    Batch(Vec<Command>),
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddSlide { .. } => "add_slide",
            Command::DuplicateSlide { .. } => "duplicate_slide",
            Command::DeleteSlide { .. } => "delete_slide",
            Command::MoveSlide { .. } => "move_slide",
            Command::UpdateSlide { .. } => "update_slide",
            Command::AddElement { .. } => "add_element",
            Command::UpdateElement { .. } => "update_element",
            Command::DeleteElement { .. } => "delete_element",
            Command::DuplicateElement { .. } => "duplicate_element",
            Command::ReorderElement { .. } => "reorder_element",
            Command::UpdatePresentationSettings(_) => "update_presentation_settings",
            Command::ReplaceText { .. } => "replace_text",
            Command::Batch(_) => "batch",
        }
    }
}

/// Apply `command` to a copy of `doc`.
pub fn try_apply(doc: &Presentation, command: &Command) -> CommandResult<Presentation> {
    let mut next = doc.clone();
    apply_in_place(&mut next, command)?;
    Ok(next)
}

/// Apply `command`, returning an unchanged copy of `doc` if it is refused.
pub fn apply(doc: &Presentation, command: &Command) -> Presentation {
    match try_apply(doc, command) {
        Ok(next) => next,
        Err(e) => {
            log::debug!("Ignoring {} command: {}", command.name(), e);
            doc.clone()
        }
    }
}

fn slide_mut(doc: &mut Presentation, index: usize) -> CommandResult<&mut Slide> {
    doc.slides.get_mut(index).ok_or(CommandError::SlideNotFound(index))
}

fn check_element(element: &SlideElement) -> CommandResult<()> {
    let base = element.base();
    if !base.bbox.is_valid() {
        return Err(CommandError::InvalidBBox(base.id().to_string()));
    }
    if !(0.0..=1.0).contains(&base.opacity) {
        return Err(CommandError::InvalidOpacity(base.opacity));
    }
    Ok(())
}

fn apply_in_place(doc: &mut Presentation, command: &Command) -> CommandResult<()> {
    match command {
        Command::AddSlide { after } => {
            let index = after.saturating_add(1).min(doc.slides.len());
            doc.slides.insert(index, Slide::blank());
        }
        Command::DuplicateSlide { index } => {
            let copy = doc
                .slides
                .get(*index)
                .ok_or(CommandError::SlideNotFound(*index))?
                .duplicated();
            doc.slides.insert(index + 1, copy);
        }
        Command::DeleteSlide { index } => {
            if *index >= doc.slides.len() {
                return Err(CommandError::SlideNotFound(*index));
            }
            if doc.slides.len() == 1 {
                return Err(CommandError::LastSlide);
            }
            doc.slides.remove(*index);
        }
        Command::MoveSlide { from, to } => {
            let len = doc.slides.len();
            for index in [*from, *to] {
                if index >= len {
                    return Err(CommandError::SlideNotFound(index));
                }
            }
            let slide = doc.slides.remove(*from);
            doc.slides.insert(*to, slide);
        }
        Command::UpdateSlide { index, patch } => {
            patch.apply_to(slide_mut(doc, *index)?);
        }
        Command::AddElement { slide, element } => {
            let slide = slide_mut(doc, *slide)?;
            let mut element = element.clone();
            if element.id().is_empty() || slide.contains(element.id()) {
                element.regenerate_id();
            }
            check_element(&element)?;
            slide.elements.push(element);
        }
        Command::UpdateElement { slide, id, patch } => {
            let slide = slide_mut(doc, *slide)?;
            let index = slide
                .index_of(id)
                .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?;
            let mut element = slide.elements[index].clone();
            patch
                .apply_to(&mut element)
                .map_err(|m| CommandError::KindMismatch {
                    id: id.clone(),
                    element: m.element,
                    patch: m.patch,
                })?;
            check_element(&element)?;
            slide.elements[index] = element;
        }
        Command::DeleteElement { slide, id } => {
            let slide = slide_mut(doc, *slide)?;
            let index = slide
                .index_of(id)
                .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?;
            slide.elements.remove(index);
        }
        Command::DuplicateElement { slide, id } => {
            let slide = slide_mut(doc, *slide)?;
            let copy = slide
                .element(id)
                .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?
                .duplicated(Vec2::new(PASTE_OFFSET, PASTE_OFFSET));
            slide.elements.push(copy);
        }
        Command::ReorderElement { slide, id, target } => {
            let slide = slide_mut(doc, *slide)?;
            let index = slide
                .index_of(id)
                .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?;
            arrange::reorder(&mut slide.elements, index, *target);
        }
        Command::UpdatePresentationSettings(patch) => {
            let width = patch.width.unwrap_or(doc.width);
            let height = patch.height.unwrap_or(doc.height);
            if !valid_canvas(width, height) {
                return Err(CommandError::InvalidCanvasSize { width, height });
            }
            patch.apply_to(doc);
        }
        Command::ReplaceText { find, replace } => {
            if find.is_empty() {
                return Err(CommandError::EmptySearch);
            }
            for element in doc.slides.iter_mut().flat_map(|s| s.elements.iter_mut()) {
                for run in element.text_runs_mut() {
                    if run.text.contains(find.as_str()) {
                        run.text = run.text.replace(find.as_str(), replace);
                    }
                }
            }
        }
        Command::Batch(commands) => {
            for command in commands {
                apply_in_place(doc, command)?;
            }
        }
    }
    Ok(())
}
