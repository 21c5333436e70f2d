//! Image element and image source handling.

use super::ElementBase;
use crate::geometry::BBox;
use crate::style::{Border, Shadow};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

/// Supported embedded image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        let head = &data[..data.len().min(256)];
        let head = String::from_utf8_lossy(head);
        let head = head.trim_start();
        if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
            return Some(ImageFormat::Svg);
        }
        None
    }
}

/// Where an image's pixels come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Remote or relative URL.
    Url { url: String },
    /// Inline bytes, base64-encoded.
    Embedded { mime: String, data: String },
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url { url: url.into() }
    }

    /// Embed raw bytes; the MIME type is sniffed, defaulting to PNG.
    pub fn embed(bytes: &[u8]) -> Self {
        let format = ImageFormat::from_magic_bytes(bytes).unwrap_or(ImageFormat::Png);
        ImageSource::Embedded {
            mime: format.mime_type().to_string(),
            data: BASE64.encode(bytes),
        }
    }

    /// Parse an `src` attribute value; base64 `data:` URLs become embedded sources.
    pub fn from_src(src: &str) -> Self {
        if let Some(rest) = src.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                return ImageSource::Embedded {
                    mime: mime.to_string(),
                    data: data.to_string(),
                };
            }
        }
        ImageSource::url(src)
    }

    /// Value suitable for an `src` attribute.
    pub fn to_src(&self) -> String {
        match self {
            ImageSource::Url { url } => url.clone(),
            ImageSource::Embedded { mime, data } => format!("data:{mime};base64,{data}"),
        }
    }

    /// Decoded bytes of an embedded source.
    pub fn decode(&self) -> Option<Vec<u8>> {
        match self {
            ImageSource::Url { .. } => None,
            ImageSource::Embedded { data, .. } => BASE64.decode(data).ok(),
        }
    }
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    Contain,
    #[default]
    Cover,
    Fill,
    None,
}

impl ObjectFit {
    pub fn as_css(&self) -> &'static str {
        match self {
            ObjectFit::Contain => "contain",
            ObjectFit::Cover => "cover",
            ObjectFit::Fill => "fill",
            ObjectFit::None => "none",
        }
    }

    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "contain" => ObjectFit::Contain,
            "fill" => ObjectFit::Fill,
            "none" => ObjectFit::None,
            _ => ObjectFit::Cover,
        }
    }
}

/// A raster or vector picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub source: ImageSource,
    #[serde(default)]
    pub object_fit: ObjectFit,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl ImageElement {
    pub fn new(bbox: BBox, source: ImageSource) -> Self {
        Self {
            base: ElementBase::new(bbox),
            source,
            object_fit: ObjectFit::default(),
            flip_h: false,
            flip_v: false,
            border: None,
            shadow: None,
        }
    }
}
