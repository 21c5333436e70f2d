//! SlideCraft Export Library
//!
//! Exports a presentation as a set of generated layout components: each slide
//! is rendered to HTML, sent to a component generation service, and the results
//! are saved as one template.

mod config;
mod error;
mod http;
mod orchestrator;
mod services;

pub use config::{BASE_URL_ENV, ExportConfig, TIMEOUT_ENV};
pub use error::{ExportError, ExportResult};
pub use http::HttpServices;
pub use orchestrator::{CancelFlag, ExportOutcome, ExportReport, Exporter};
pub use services::{
    BoxFuture, ComponentRequest, ComponentResponse, ComponentService, LayoutRecord,
    RefineRequest, RefineResponse, SaveTemplatesRequest, SaveTemplatesResponse, SlideRasterizer,
    TemplateMetadata, TemplateService,
};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `slidecraft_export=info`. Does nothing if one is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidecraft_export=info".into()),
        )
        .try_init();
}
