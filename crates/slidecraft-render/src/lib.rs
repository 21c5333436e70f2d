//! SlideCraft Render Library
//!
//! Renderer abstraction and the static HTML renderer used to hand slides to
//! downstream code generation.

mod html;
mod renderer;

pub use html::{escape_html, render_layout, render_slide_to_html, HtmlRenderer};
pub use renderer::{RenderError, RenderResult, RenderedSlide, SlideRenderer};
