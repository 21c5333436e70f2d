//! Sequential template export.
//!
//! Each slide is converted to the normalized layout, rendered to HTML,
//! optionally screenshotted and refined, and turned into component code.
//! Slides run one after another so a failure names its slide and the records
//! for the slides before it are kept. The save call happens once, after every
//! slide succeeded.

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::http::HttpServices;
use crate::services::{
    ComponentRequest, ComponentService, LayoutRecord, RefineRequest, SaveTemplatesRequest,
    SlideRasterizer, TemplateMetadata, TemplateService,
};
use slidecraft_core::Presentation;
use slidecraft_core::format::{LayoutMeta, LayoutSlide, external_to_internal, internal_to_external};
use slidecraft_render::{HtmlRenderer, SlideRenderer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

const TEMPLATE_DESCRIPTION: &str = "Imported from SlideCraft";

/// Shared flag that stops an export between slides.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Export status as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub success: bool,
    /// Slides converted before the export finished or failed.
    pub completed: usize,
    pub total: usize,
    pub presentation_id: String,
    pub message: String,
}

/// Report, accumulated records, and the error that stopped the export, if any.
#[derive(Debug)]
pub struct ExportOutcome {
    pub report: ExportReport,
    pub layouts: Vec<LayoutRecord>,
    pub error: Option<ExportError>,
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        self.report.success
    }

    /// The report on success, the error otherwise.
    pub fn into_result(self) -> ExportResult<ExportReport> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.report),
        }
    }
}

/// Drives a presentation through the component and template services.
pub struct Exporter {
    config: ExportConfig,
    components: Arc<dyn ComponentService>,
    templates: Arc<dyn TemplateService>,
    rasterizer: Option<Arc<dyn SlideRasterizer>>,
    renderer: Box<dyn SlideRenderer + Send + Sync>,
}

impl Exporter {
    pub fn new(
        config: ExportConfig,
        components: Arc<dyn ComponentService>,
        templates: Arc<dyn TemplateService>,
    ) -> Self {
        Self {
            config,
            components,
            templates,
            rasterizer: None,
            renderer: Box::new(HtmlRenderer),
        }
    }

    /// An exporter talking HTTP to the services named in `config`.
    pub fn from_config(config: ExportConfig) -> ExportResult<Self> {
        let services = Arc::new(HttpServices::new(config.clone())?);
        Ok(Self::new(config, services.clone(), services))
    }

    /// Screenshot slides with `rasterizer` when `config.rasterize` is set.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn SlideRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn SlideRenderer + Send + Sync>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export every slide of `presentation` and save them as one template.
    pub async fn export(&self, presentation: &Presentation, cancel: &CancelFlag) -> ExportOutcome {
        let exported = internal_to_external(presentation);
        let layout = external_to_internal(&exported.project);
        let fonts = exported.fonts;
        let total = layout.slides.len();
        info!(
            "Exporting {} slide(s) of presentation {}",
            total, presentation.id
        );

        let mut layouts = Vec::with_capacity(total);
        let result = self
            .run(presentation, &layout.slides, &layout.meta, &fonts, cancel, &mut layouts)
            .await;

        let completed = layouts.len();
        match result {
            Ok(()) => {
                info!("Exported {} layout(s) for {}", completed, presentation.id);
                ExportOutcome {
                    report: ExportReport {
                        success: true,
                        completed,
                        total,
                        presentation_id: presentation.id.clone(),
                        message: format!("Exported {} of {} slide(s)", completed, total),
                    },
                    layouts,
                    error: None,
                }
            }
            Err(err) => {
                warn!(
                    "Export of {} failed after {} of {} slide(s): {}",
                    presentation.id, completed, total, err
                );
                ExportOutcome {
                    report: ExportReport {
                        success: false,
                        completed,
                        total,
                        presentation_id: presentation.id.clone(),
                        message: format!(
                            "Export failed after {} of {} slide(s): {}",
                            completed, total, err
                        ),
                    },
                    layouts,
                    error: Some(err),
                }
            }
        }
    }

    async fn run(
        &self,
        presentation: &Presentation,
        slides: &[LayoutSlide],
        meta: &LayoutMeta,
        fonts: &[String],
        cancel: &CancelFlag,
        layouts: &mut Vec<LayoutRecord>,
    ) -> ExportResult<()> {
        for (index, slide) in slides.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ExportError::Cancelled);
            }
            let code = self.export_slide(slide, meta, fonts).await?;
            layouts.push(LayoutRecord {
                presentation: presentation.id.clone(),
                layout_id: slide.id.clone(),
                layout_name: slide.name.clone(),
                layout_code: code,
                fonts: fonts.to_vec(),
            });
            info!("Slide {}/{} converted", index + 1, slides.len());
        }

        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let metadata = TemplateMetadata {
            id: presentation.id.clone(),
            name: presentation.name.clone(),
            description: TEMPLATE_DESCRIPTION.to_string(),
        };
        if let Err(err) = self.templates.create_template(metadata).await {
            warn!("Failed to register template metadata: {}", err);
        }

        let response = self
            .templates
            .save_templates(SaveTemplatesRequest {
                layouts: layouts.clone(),
                fonts: fonts.to_vec(),
            })
            .await?;
        if !response.success {
            return Err(ExportError::SaveRejected(
                response
                    .detail
                    .unwrap_or_else(|| "Failed to save templates".to_string()),
            ));
        }
        Ok(())
    }

    async fn export_slide(
        &self,
        slide: &LayoutSlide,
        meta: &LayoutMeta,
        fonts: &[String],
    ) -> ExportResult<String> {
        let mut html = self
            .renderer
            .render_slide(slide, meta)
            .map_err(|source| ExportError::Render {
                slide: slide.id.clone(),
                source,
            })?;

        let image = match (&self.rasterizer, self.config.rasterize) {
            (Some(rasterizer), true) => {
                Some(rasterizer.rasterize(slide.id.clone(), html.clone()).await?)
            }
            _ => None,
        };

        if self.config.refine_html {
            let request = RefineRequest {
                image: image.clone(),
                xml: html.clone(),
                fonts: fonts.to_vec(),
            };
            match self.components.refine_html(request).await {
                Ok(refined) => html = refined,
                Err(err) => warn!(
                    "Refining slide {} failed, using generated HTML: {}",
                    slide.id, err
                ),
            }
        }

        debug!("Requesting component for slide {}", slide.id);
        self.components
            .generate_component(ComponentRequest { html, image })
            .await?
            .into_code()
            .ok_or_else(|| ExportError::MissingComponent(slide.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{BoxFuture, ComponentResponse, SaveTemplatesResponse};
    use slidecraft_core::{BBox, Slide, TextElement};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeComponents {
        requests: Mutex<Vec<ComponentRequest>>,
        refined: Mutex<Vec<RefineRequest>>,
        fail_on_call: Option<usize>,
        refine_with: Option<String>,
        empty_response: bool,
        cancel_after_call: Option<CancelFlag>,
    }

    impl FakeComponents {
        fn requests(&self) -> Vec<ComponentRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ComponentService for FakeComponents {
        fn generate_component(
            &self,
            request: ComponentRequest,
        ) -> BoxFuture<'_, ExportResult<ComponentResponse>> {
            Box::pin(async move {
                let call = {
                    let mut requests = self.requests.lock().unwrap();
                    requests.push(request);
                    requests.len()
                };
                if let Some(flag) = &self.cancel_after_call {
                    flag.cancel();
                }
                if self.fail_on_call == Some(call) {
                    return Err(ExportError::Api {
                        status: 500,
                        message: "model overloaded".to_string(),
                    });
                }
                if self.empty_response {
                    return Ok(ComponentResponse::default());
                }
                Ok(ComponentResponse {
                    react_component: Some(format!("component-{call}")),
                    component_code: None,
                })
            })
        }

        fn refine_html(&self, request: RefineRequest) -> BoxFuture<'_, ExportResult<String>> {
            Box::pin(async move {
                self.refined.lock().unwrap().push(request);
                self.refine_with.clone().ok_or(ExportError::Api {
                    status: 503,
                    message: "refiner offline".to_string(),
                })
            })
        }
    }

    struct FakeTemplates {
        created: Mutex<Vec<TemplateMetadata>>,
        saved: Mutex<Vec<SaveTemplatesRequest>>,
        fail_create: bool,
        response: SaveTemplatesResponse,
    }

    impl Default for FakeTemplates {
        fn default() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                saved: Mutex::new(Vec::new()),
                fail_create: false,
                response: SaveTemplatesResponse {
                    success: true,
                    detail: None,
                },
            }
        }
    }

    impl FakeTemplates {
        fn saved(&self) -> Vec<SaveTemplatesRequest> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl TemplateService for FakeTemplates {
        fn create_template(&self, metadata: TemplateMetadata) -> BoxFuture<'_, ExportResult<()>> {
            Box::pin(async move {
                self.created.lock().unwrap().push(metadata);
                if self.fail_create {
                    return Err(ExportError::Api {
                        status: 409,
                        message: "template exists".to_string(),
                    });
                }
                Ok(())
            })
        }

        fn save_templates(
            &self,
            request: SaveTemplatesRequest,
        ) -> BoxFuture<'_, ExportResult<SaveTemplatesResponse>> {
            Box::pin(async move {
                self.saved.lock().unwrap().push(request);
                Ok(self.response.clone())
            })
        }
    }

    struct FakeRasterizer;

    impl SlideRasterizer for FakeRasterizer {
        fn rasterize(&self, slide_id: String, _html: String) -> BoxFuture<'_, ExportResult<String>> {
            Box::pin(async move { Ok(format!("data:image/png;base64,{slide_id}")) })
        }
    }

    fn three_slides() -> Presentation {
        let mut doc = Presentation::new();
        doc.name = "Pitch deck".to_string();
        doc.slides.push(Slide::blank());
        doc.slides.push(Slide::blank());
        for (i, slide) in doc.slides.iter_mut().enumerate() {
            let text = TextElement::new(
                BBox::new(40.0, 40.0, 400.0, 80.0),
                format!("Slide title {}", i + 1),
            );
            slide.elements.push(text.into());
        }
        doc
    }

    fn exporter(
        config: ExportConfig,
        components: &Arc<FakeComponents>,
        templates: &Arc<FakeTemplates>,
    ) -> Exporter {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Exporter::new(config, components.clone(), templates.clone())
    }

    #[tokio::test]
    async fn test_export_all_slides() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());
        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.report.completed, 3);
        assert_eq!(outcome.report.total, 3);
        assert_eq!(outcome.report.presentation_id, doc.id);
        assert!(outcome.error.is_none());

        let ids: Vec<_> = outcome.layouts.iter().map(|l| l.layout_id.clone()).collect();
        let expected: Vec<_> = doc.slides.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, expected);
        assert_eq!(outcome.layouts[1].layout_name, "Slide 2");
        assert_eq!(outcome.layouts[2].layout_code, "component-3");
        assert_eq!(outcome.layouts[0].presentation, doc.id);
        assert_eq!(outcome.layouts[0].fonts, doc.font_families());

        let requests = components.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].html.contains("Slide title 1"));
        assert!(requests[0].image.is_none());

        let saved = templates.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].layouts, outcome.layouts);
        assert_eq!(saved[0].fonts, vec!["Arial".to_string()]);

        let created = templates.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "Pitch deck");
        assert_eq!(created[0].description, TEMPLATE_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_failure_on_second_slide_stops_export() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents {
            fail_on_call: Some(2),
            ..Default::default()
        });
        let templates = Arc::new(FakeTemplates::default());
        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(!outcome.report.success);
        assert_eq!(outcome.report.completed, 1);
        assert_eq!(outcome.report.total, 3);
        assert!(outcome.report.message.contains("after 1 of 3"));
        assert!(outcome.report.message.contains("model overloaded"));
        assert_eq!(outcome.layouts.len(), 1);
        assert_eq!(outcome.layouts[0].layout_id, doc.slides[0].id);
        assert_eq!(components.requests().len(), 2);
        assert!(templates.saved().is_empty());
        assert!(templates.created.lock().unwrap().is_empty());
        assert!(matches!(
            outcome.into_result(),
            Err(ExportError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &cancel)
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.report.completed, 0);
        assert!(matches!(outcome.error, Some(ExportError::Cancelled)));
        assert!(components.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_between_slides() {
        let doc = three_slides();
        let cancel = CancelFlag::new();
        let components = Arc::new(FakeComponents {
            cancel_after_call: Some(cancel.clone()),
            ..Default::default()
        });
        let templates = Arc::new(FakeTemplates::default());

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &cancel)
            .await;

        assert_eq!(outcome.report.completed, 1);
        assert!(matches!(outcome.error, Some(ExportError::Cancelled)));
        assert!(templates.saved().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_save_is_failure() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates {
            response: SaveTemplatesResponse {
                success: false,
                detail: Some("quota exceeded".to_string()),
            },
            ..Default::default()
        });

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(!outcome.report.success);
        assert_eq!(outcome.report.completed, 3);
        assert_eq!(outcome.layouts.len(), 3);
        assert!(outcome.report.message.contains("quota exceeded"));
        assert!(matches!(outcome.error, Some(ExportError::SaveRejected(_))));
    }

    #[tokio::test]
    async fn test_metadata_failure_is_ignored() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates {
            fail_create: true,
            ..Default::default()
        });

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(outcome.is_success());
        assert_eq!(templates.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_component_code() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents {
            empty_response: true,
            ..Default::default()
        });
        let templates = Arc::new(FakeTemplates::default());

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert_eq!(outcome.report.completed, 0);
        match outcome.error {
            Some(ExportError::MissingComponent(slide)) => assert_eq!(slide, doc.slides[0].id),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rasterized_image_reaches_component_service() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());
        let config = ExportConfig {
            rasterize: true,
            ..Default::default()
        };

        let outcome = exporter(config, &components, &templates)
            .with_rasterizer(Arc::new(FakeRasterizer))
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(outcome.is_success());
        let requests = components.requests();
        assert_eq!(
            requests[0].image.as_deref(),
            Some(format!("data:image/png;base64,{}", doc.slides[0].id).as_str())
        );
    }

    #[tokio::test]
    async fn test_rasterizer_unused_when_disabled() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());

        exporter(ExportConfig::default(), &components, &templates)
            .with_rasterizer(Arc::new(FakeRasterizer))
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(components.requests().iter().all(|r| r.image.is_none()));
    }

    #[tokio::test]
    async fn test_refined_html_replaces_generated() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents {
            refine_with: Some("<main>refined</main>".to_string()),
            ..Default::default()
        });
        let templates = Arc::new(FakeTemplates::default());
        let config = ExportConfig {
            refine_html: true,
            ..Default::default()
        };

        let outcome = exporter(config, &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(outcome.is_success());
        assert!(components
            .requests()
            .iter()
            .all(|r| r.html == "<main>refined</main>"));
        let refined = components.refined.lock().unwrap().clone();
        assert_eq!(refined.len(), 3);
        assert!(refined[0].xml.contains("Slide title 1"));
        assert_eq!(refined[0].fonts, vec!["Arial".to_string()]);
    }

    #[tokio::test]
    async fn test_refine_failure_falls_back() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());
        let config = ExportConfig {
            refine_html: true,
            ..Default::default()
        };

        let outcome = exporter(config, &components, &templates)
            .export(&doc, &CancelFlag::new())
            .await;

        assert!(outcome.is_success());
        let requests = components.requests();
        assert!(requests[0].html.starts_with("<!DOCTYPE html>"));
        assert!(requests[0].html.contains("Slide title 1"));
    }

    struct BrokenRenderer;

    impl SlideRenderer for BrokenRenderer {
        fn render_slide(
            &self,
            slide: &LayoutSlide,
            _meta: &LayoutMeta,
        ) -> slidecraft_render::RenderResult<String> {
            Err(slidecraft_render::RenderError::SlideNotFound(slide.id.clone()))
        }
    }

    #[tokio::test]
    async fn test_render_failure_names_slide() {
        let doc = three_slides();
        let components = Arc::new(FakeComponents::default());
        let templates = Arc::new(FakeTemplates::default());

        let outcome = exporter(ExportConfig::default(), &components, &templates)
            .with_renderer(Box::new(BrokenRenderer))
            .export(&doc, &CancelFlag::new())
            .await;

        assert_eq!(outcome.report.completed, 0);
        match outcome.error {
            Some(ExportError::Render { slide, .. }) => assert_eq!(slide, doc.slides[0].id),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(components.requests().is_empty());
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!flag.is_cancelled());
        other.cancel();
        assert!(flag.is_cancelled());
    }
}
