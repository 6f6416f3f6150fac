//! Random image endpoints: a JSON index names an image URL, which is then
//! downloaded and returned as bytes.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{Fetched, HttpClient};
use crate::error::{Result, SourceError};
use crate::upstream::{Upstream, UpstreamHosts};

/// Where the image URL sits in the index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePointer {
    /// A string field of the top-level object.
    Field(&'static str),
    /// A top-level array of URL strings, one picked at random.
    ArrayOfStrings,
    /// A top-level array of objects, one picked at random, URL in the field.
    ArrayOfObjects(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Cat,
    Waifu,
    Neko,
    /// Blue Archive artwork.
    Ba,
    China,
}

impl ImageKind {
    pub const ALL: [ImageKind; 5] = [
        ImageKind::Cat,
        ImageKind::Waifu,
        ImageKind::Neko,
        ImageKind::Ba,
        ImageKind::China,
    ];

    fn upstream(&self) -> Upstream {
        match self {
            Self::Cat => Upstream::Sefinek,
            Self::Waifu | Self::Neko => Upstream::WaifuPics,
            Self::Ba => Upstream::GithubRaw,
            Self::China => Upstream::Github,
        }
    }

    fn index_path(&self) -> &'static str {
        match self {
            Self::Cat => "/api/v2/random/animal/cat",
            Self::Waifu => "/sfw/waifu",
            Self::Neko => "/sfw/neko",
            Self::Ba => "/rynxzyy/blue-archive-r-img/refs/heads/main/links.json",
            Self::China => "/ArifzynXD/database/raw/master/asupan/china.json",
        }
    }

    pub fn pointer(&self) -> ImagePointer {
        match self {
            Self::Cat => ImagePointer::Field("message"),
            Self::Waifu | Self::Neko => ImagePointer::Field("url"),
            Self::Ba => ImagePointer::ArrayOfStrings,
            Self::China => ImagePointer::ArrayOfObjects("url"),
        }
    }

    /// File name stem for `Content-Disposition`.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Waifu => "waifu",
            Self::Neko => "neko",
            Self::Ba => "bluearchive",
            Self::China => "china",
        }
    }
}

impl ImagePointer {
    /// Resolves the image URL inside an index document.
    pub fn resolve(&self, index: &Value) -> Option<String> {
        let picked = match self {
            Self::Field(name) => index.get(*name),
            Self::ArrayOfStrings => pick(index),
            Self::ArrayOfObjects(name) => pick(index).and_then(|item| item.get(*name)),
        };
        picked
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| url.starts_with("http"))
            .map(String::from)
    }
}

fn pick(index: &Value) -> Option<&Value> {
    index.as_array()?.choose(&mut rand::thread_rng())
}

/// Random image provider over the configured hosts.
#[derive(Debug, Clone)]
pub struct RandomImages {
    http: HttpClient,
    hosts: UpstreamHosts,
}

impl RandomImages {
    pub fn new(http: HttpClient, hosts: UpstreamHosts) -> Self {
        Self { http, hosts }
    }

    #[instrument(skip(self), fields(service = "random-image"))]
    pub async fn fetch(&self, kind: ImageKind) -> Result<Fetched> {
        let index_url = format!("{}{}", self.hosts.base(kind.upstream()), kind.index_path());
        let index: Value = self.http.json(self.http.get(index_url)).await?;

        let image_url = kind
            .pointer()
            .resolve(&index)
            .ok_or_else(|| SourceError::parse("image URL missing from index response"))?;
        debug!(image_url = %image_url, "Downloading random image");

        let fetched = self.http.bytes(self.http.get(image_url)).await?;
        if fetched.bytes.is_empty() {
            return Err(SourceError::upstream(kind.file_stem(), "empty image body"));
        }
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_pointer() {
        let index = json!({"message": "https://cdn.sefinek.net/cat/1.jpg"});
        assert_eq!(
            ImagePointer::Field("message").resolve(&index).as_deref(),
            Some("https://cdn.sefinek.net/cat/1.jpg")
        );
        assert_eq!(ImagePointer::Field("url").resolve(&index), None);
    }

    #[test]
    fn test_array_pointers_pick_member() {
        let strings = json!(["https://a/1.png", "https://a/2.png"]);
        let picked = ImagePointer::ArrayOfStrings.resolve(&strings).unwrap();
        assert!(picked == "https://a/1.png" || picked == "https://a/2.png");

        let objects = json!([{"url": "https://b/1.mp4"}]);
        assert_eq!(
            ImagePointer::ArrayOfObjects("url").resolve(&objects).as_deref(),
            Some("https://b/1.mp4")
        );
    }

    #[test]
    fn test_non_http_values_rejected() {
        assert_eq!(ImagePointer::ArrayOfStrings.resolve(&json!([])), None);
        assert_eq!(ImagePointer::Field("url").resolve(&json!({"url": "/rel.png"})), None);
    }
}
