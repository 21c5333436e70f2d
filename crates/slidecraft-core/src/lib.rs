//! SlideCraft Core Library
//!
//! Document model, editing commands, undo history and format conversion for
//! SlideCraft presentations. Everything here is synchronous and free of I/O.

pub mod arrange;
pub mod clipboard;
pub mod command;
pub mod document;
pub mod elements;
pub mod format;
pub mod format_painter;
pub mod geometry;
pub mod history;
pub mod patch;
pub mod selection;
pub mod store;
pub mod style;

pub use arrange::{Alignment, Axis, ZOrder};
pub use clipboard::Clipboard;
pub use command::{apply, try_apply, Command, CommandError, CommandResult, PASTE_OFFSET};
pub use document::{
    Background, ModelError, ModelResult, Presentation, Settings, Slide, SlideId, Theme,
};
pub use elements::{
    ElementBase, ElementId, ElementKind, ImageElement, ImageSource, ShapeElement, ShapeType,
    SlideElement, TableElement, TextElement,
};
pub use format_painter::FormatPainter;
pub use geometry::{BBox, BBoxPatch, MIN_ELEMENT_SIZE};
pub use history::{History, MAX_UNDO_HISTORY};
pub use patch::{ContentPatch, ElementPatch, PresentationPatch, SlidePatch};
pub use selection::Selection;
pub use store::{Store, StoreEvent, SubscriptionId};
pub use style::{Border, Color, Fill, Gradient, Shadow, TextRun, TextStyle};
