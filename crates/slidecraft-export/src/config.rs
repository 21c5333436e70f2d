//! Export service configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`ExportConfig::base_url`].
pub const BASE_URL_ENV: &str = "FASTAPI_BASE_URL";
/// Environment variable overriding [`ExportConfig::request_timeout_secs`].
pub const TIMEOUT_ENV: &str = "SLIDECRAFT_EXPORT_TIMEOUT_SECS";

/// Where the remote services live and which optional steps run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub base_url: String,
    pub component_endpoint: String,
    pub save_endpoint: String,
    pub refine_endpoint: String,
    pub templates_endpoint: String,
    /// Screenshot each slide and send the image along with its HTML.
    pub rasterize: bool,
    /// Ask the service to rewrite the generated HTML before component generation.
    pub refine_html: bool,
    pub request_timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            component_endpoint: "/api/v1/ppt/html-to-react/".to_string(),
            save_endpoint: "/api/v1/ppt/template-management/save-templates".to_string(),
            refine_endpoint: "/api/v1/ppt/slide-to-html/".to_string(),
            templates_endpoint: "/api/v1/ppt/template-management/templates".to_string(),
            rasterize: false,
            refine_html: false,
            request_timeout_secs: 120,
        }
    }
}

impl ExportConfig {
    /// Defaults overridden by `FASTAPI_BASE_URL` and `SLIDECRAFT_EXPORT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }
        if let Some(secs) = lookup(TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            config.request_timeout_secs = secs;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn component_url(&self) -> String {
        self.url(&self.component_endpoint)
    }

    pub fn save_url(&self) -> String {
        self.url(&self.save_endpoint)
    }

    pub fn refine_url(&self) -> String {
        self.url(&self.refine_endpoint)
    }

    pub fn templates_url(&self) -> String {
        self.url(&self.templates_endpoint)
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ExportConfig::default();
        assert_eq!(
            config.component_url(),
            "http://localhost:8000/api/v1/ppt/html-to-react/"
        );
        assert_eq!(
            config.save_url(),
            "http://localhost:8000/api/v1/ppt/template-management/save-templates"
        );
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_url_joins_slashes() {
        let config = ExportConfig {
            base_url: "https://api.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.refine_url(),
            "https://api.example.com/api/v1/ppt/slide-to-html/"
        );
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = ExportConfig::from_vars(|key| match key {
            BASE_URL_ENV => Some(" http://backend:9000 ".to_string()),
            TIMEOUT_ENV => Some("30".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_from_vars_ignores_bad_values() {
        let config = ExportConfig::from_vars(|key| match key {
            BASE_URL_ENV => Some("   ".to_string()),
            TIMEOUT_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"rasterize": true, "base_url": "http://x"}"#).unwrap();
        assert!(config.rasterize);
        assert!(!config.refine_html);
        assert_eq!(config.base_url, "http://x");
        assert_eq!(config.request_timeout_secs, 120);
    }
}
