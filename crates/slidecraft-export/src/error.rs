//! Export error types.

use slidecraft_render::RenderError;
use thiserror::Error;

/// Errors raised while exporting a presentation as templates.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render slide {slide}: {source}")]
    Render {
        slide: String,
        #[source]
        source: RenderError,
    },
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to parse service response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Service request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Component service returned no component code for slide {0}")]
    MissingComponent(String),
    #[error("Template save rejected: {0}")]
    SaveRejected(String),
    #[error("Failed to rasterize slide {slide}: {message}")]
    Rasterize { slide: String, message: String },
    #[error("Export cancelled")]
    Cancelled,
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = ExportError::Api {
            status: 422,
            message: "layouts must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Service request failed with status 422: layouts must not be empty"
        );
    }

    #[test]
    fn test_render_error_keeps_source() {
        let err = ExportError::Render {
            slide: "s1".to_string(),
            source: RenderError::SlideNotFound("s1".to_string()),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Failed to render slide s1"));
    }
}
