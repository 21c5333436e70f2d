//! HTTP implementation of the export services.

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::services::{
    BoxFuture, ComponentRequest, ComponentResponse, ComponentService, RefineRequest,
    RefineResponse, SaveTemplatesRequest, SaveTemplatesResponse, TemplateMetadata,
    TemplateService,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Component and template services backed by the presentation API.
#[derive(Debug, Clone)]
pub struct HttpServices {
    client: Client,
    config: ExportConfig,
}

impl HttpServices {
    pub fn new(config: ExportConfig) -> ExportResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, url: String, body: &B) -> ExportResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }
        let text = String::from_utf8_lossy(&bytes);
        Err(ExportError::Api {
            status: status.as_u16(),
            message: error_message(status, &text),
        })
    }
}

/// The `detail` field of an error body, else the status and raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(Value::String(message)) => message,
        Some(Value::Null) | None => format!("Request failed with status {}: {}", status, body),
        Some(other) => other.to_string(),
    }
}

impl ComponentService for HttpServices {
    fn generate_component(
        &self,
        request: ComponentRequest,
    ) -> BoxFuture<'_, ExportResult<ComponentResponse>> {
        Box::pin(async move { self.post_json(self.config.component_url(), &request).await })
    }

    fn refine_html(&self, request: RefineRequest) -> BoxFuture<'_, ExportResult<String>> {
        Box::pin(async move {
            let response: RefineResponse =
                self.post_json(self.config.refine_url(), &request).await?;
            response
                .html
                .filter(|html| !html.trim().is_empty())
                .ok_or_else(|| ExportError::Api {
                    status: 200,
                    message: "Refinement response has no html".to_string(),
                })
        })
    }
}

impl TemplateService for HttpServices {
    fn create_template(&self, metadata: TemplateMetadata) -> BoxFuture<'_, ExportResult<()>> {
        Box::pin(async move {
            let _: Value = self.post_json(self.config.templates_url(), &metadata).await?;
            Ok(())
        })
    }

    fn save_templates(
        &self,
        request: SaveTemplatesRequest,
    ) -> BoxFuture<'_, ExportResult<SaveTemplatesResponse>> {
        Box::pin(async move { self.post_json(self.config.save_url(), &request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_uses_string_detail() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"detail": "No layouts"}"#);
        assert_eq!(message, "No layouts");
    }

    #[test]
    fn test_error_message_serializes_structured_detail() {
        let message = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "html"], "msg": "field required"}]}"#,
        );
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let message = error_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(
            message,
            "Request failed with status 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_new_keeps_config() {
        let config = ExportConfig {
            base_url: "http://backend:9000".to_string(),
            ..Default::default()
        };
        let services = HttpServices::new(config.clone()).unwrap();
        assert_eq!(services.config(), &config);
    }
}
