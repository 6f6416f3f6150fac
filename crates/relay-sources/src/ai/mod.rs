//! AI integrations: image editing, NSFW classification and chat.

mod img2img;
mod nsfw;
mod zai;

pub use img2img::{GeneratedImage, ImageToImage};
pub use nsfw::{NsfwCheck, NsfwVerdict};
pub use zai::{ChatAnswer, ChatRequest, DEFAULT_MODEL, MODELS, Zai, model_id};
