//! Media item shared by downloader results.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Gif,
}

impl MediaKind {
    /// Best guess from an upstream type string or file extension.
    pub fn guess(kind: Option<&str>, url: &str) -> Self {
        match kind.map(|k| k.to_ascii_lowercase()) {
            Some(k) if k.contains("video") => Self::Video,
            Some(k) if k.contains("audio") => Self::Audio,
            Some(k) if k.contains("gif") => Self::Gif,
            Some(k) if k.contains("image") || k.contains("photo") => Self::Image,
            _ if url.contains(".mp4") => Self::Video,
            _ if url.contains(".mp3") => Self::Audio,
            _ => Self::Image,
        }
    }
}

/// One downloadable asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl MediaItem {
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            quality: None,
            thumbnail: None,
            width: None,
            height: None,
            duration: None,
            ext: None,
            source: None,
        }
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn size(mut self, width: Option<u64>, height: Option<u64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn duration(mut self, seconds: Option<f64>) -> Self {
        self.duration = seconds;
        self
    }

    pub fn ext(mut self, ext: Option<String>) -> Self {
        self.ext = ext;
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
