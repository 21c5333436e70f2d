//! Renderer trait abstraction.

use slidecraft_core::format::{LayoutMeta, LayoutSlide, NormalizedLayout};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write markup: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("Slide not found: {0}")]
    SlideNotFound(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// One rendered slide.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub id: String,
    pub name: String,
    pub html: String,
}

/// Turns normalized slides into standalone documents.
pub trait SlideRenderer {
    /// Render one slide at the canvas size and theme given by `meta`.
    fn render_slide(&self, slide: &LayoutSlide, meta: &LayoutMeta) -> RenderResult<String>;

    /// Render every slide of a layout, in order.
    fn render_layout(&self, layout: &NormalizedLayout) -> RenderResult<Vec<RenderedSlide>> {
        layout
            .slides
            .iter()
            .map(|slide| {
                Ok(RenderedSlide {
                    id: slide.id.clone(),
                    name: slide.name.clone(),
                    html: self.render_slide(slide, &layout.meta)?,
                })
            })
            .collect()
    }

    /// Render the slide with `id`.
    fn render_slide_by_id(&self, layout: &NormalizedLayout, id: &str) -> RenderResult<String> {
        let slide = layout
            .slide(id)
            .ok_or_else(|| RenderError::SlideNotFound(id.to_string()))?;
        self.render_slide(slide, &layout.meta)
    }
}
