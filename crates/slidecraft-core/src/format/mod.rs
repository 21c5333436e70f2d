//! Format conversion between the external project schema, the normalized
//! layout schema and the editor document.

mod convert;
pub mod external;
pub mod layout;
pub mod rich_text;
pub mod tables;

pub use convert::{
    external_to_internal, import_project, internal_to_external, layout_to_presentation,
    presentation_to_layout, ExportedProject,
};
pub use external::{ExternalElement, ExternalProject, ExternalSlide, ExternalTheme};
pub use layout::{
    Frame, LayoutBackground, LayoutElement, LayoutImage, LayoutMeta, LayoutShape, LayoutSlide,
    LayoutText, NormalizedLayout,
};
pub use rich_text::{html_to_runs, runs_to_html, RichText};
