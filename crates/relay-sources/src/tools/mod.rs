//! Utility integrations: upscaling, OCR and app builds.

mod appmaker;
mod ocr;
mod upscale;

pub use appmaker::{AppRequest, Appmaker};
pub use ocr::{Ocr, OcrResult};
pub use upscale::{DEFAULT_SCALE, UpscaleResult, Upscaler};
