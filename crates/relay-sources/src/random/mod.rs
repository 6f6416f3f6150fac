//! Random content: images, anh.moe posts and anime quotes.

mod anhmoe;
mod images;
mod quotes;

pub use anhmoe::{Anhmoe, AnhmoePost, CATEGORIES as ANHMOE_CATEGORIES};
pub use images::{ImageKind, ImagePointer, RandomImages};
pub use quotes::{AnimeQuote, AnimeQuotes};
