//! Remote service contracts used by the exporter.
//!
//! The exporter only talks to these traits. [`crate::HttpServices`] implements
//! them over HTTP; tests substitute in-memory fakes.

use crate::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by service methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Body of an HTML to component request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequest {
    pub html: String,
    /// Screenshot of the slide, as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentResponse {
    #[serde(default)]
    pub react_component: Option<String>,
    #[serde(default)]
    pub component_code: Option<String>,
}

impl ComponentResponse {
    /// The generated code, preferring `react_component`.
    pub fn into_code(self) -> Option<String> {
        let non_empty = |code: Option<String>| code.filter(|c| !c.trim().is_empty());
        non_empty(self.react_component).or_else(|| non_empty(self.component_code))
    }
}

/// Body of an HTML refinement request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub image: Option<String>,
    pub xml: String,
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefineResponse {
    #[serde(default)]
    pub html: Option<String>,
}

/// Template metadata registered before the layouts are saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// One exported slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub presentation: String,
    pub layout_id: String,
    pub layout_name: String,
    pub layout_code: String,
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveTemplatesRequest {
    pub layouts: Vec<LayoutRecord>,
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveTemplatesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Turns slide HTML into component code.
pub trait ComponentService: Send + Sync {
    /// Generate component code for one slide.
    fn generate_component(
        &self,
        request: ComponentRequest,
    ) -> BoxFuture<'_, ExportResult<ComponentResponse>>;

    /// Rewrite slide markup into cleaner HTML.
    fn refine_html(&self, request: RefineRequest) -> BoxFuture<'_, ExportResult<String>> {
        let _ = request;
        Box::pin(async move {
            Err(ExportError::Api {
                status: 501,
                message: "HTML refinement is not supported".to_string(),
            })
        })
    }
}

/// Stores exported layouts as a template.
pub trait TemplateService: Send + Sync {
    fn create_template(&self, metadata: TemplateMetadata) -> BoxFuture<'_, ExportResult<()>>;

    fn save_templates(
        &self,
        request: SaveTemplatesRequest,
    ) -> BoxFuture<'_, ExportResult<SaveTemplatesResponse>>;
}

/// Produces a screenshot of a rendered slide.
pub trait SlideRasterizer: Send + Sync {
    /// Rasterize `html` and return the image as a data URL.
    fn rasterize(&self, slide_id: String, html: String) -> BoxFuture<'_, ExportResult<String>>;
}
