//! # relay-sources
//!
//! Upstream integrations for the Relay gateway.
//!
//! Every integration is a small struct holding a shared [`HttpClient`] and
//! the base URL of its third-party service. They validate their input before
//! any outbound call, map the upstream payload (JSON fields or HTML nodes)
//! into a typed result and report failures as [`SourceError`], whose
//! [`SourceError::code`] is the HTTP status the gateway answers with.
//!
//! Integrations are grouped like the public routes:
//!
//! - [`downloader`]: TikTok, Spotify, Instagram, X/Twitter, Douyin, Pinterest,
//!   YouTube
//! - [`search`]: YouTube, TikTok, Pinterest, lyrics, Cookpad
//! - [`random`]: random images, anh.moe posts, anime quotes
//! - [`tools`]: upscaling, OCR, app builds
//! - [`ai`]: image-to-image, NSFW check, chat
//!
//! [`Sources`] builds all of them once from an [`UpstreamHosts`] table so a
//! deployment (or a test) can point any service at another base URL.

pub mod ai;
pub mod client;
pub mod downloader;
pub mod error;
pub mod html;
pub mod media;
pub mod poll;
pub mod random;
pub mod registry;
pub mod search;
pub mod tools;
pub mod upstream;
pub mod validate;

pub use client::{ClientConfig, DEFAULT_USER_AGENT, Fetched, HttpClient};
pub use error::{Result, SourceError};
pub use media::{MediaItem, MediaKind};
pub use poll::{Attempt, Backoff, PollPolicy, poll_until};
pub use registry::Sources;
pub use upstream::{Upstream, UpstreamHosts};
