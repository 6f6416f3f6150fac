//! Search integrations: free-text query in, structured results out.

mod cookpad;
mod lyrics;
mod pinterest;
mod tiktok;
mod youtube;

pub use cookpad::{Cookpad, Recipe, RecipeResults, RecipeStep};
pub use lyrics::Lyrics;
pub use pinterest::{PinterestImages, PinterestSearch};
pub use tiktok::{TikTokSearch, TikTokSearchVideo, VideoAuthor, VideoMedia, VideoStats};
pub use youtube::{MAX_LIMIT as YOUTUBE_MAX_LIMIT, YoutubeResults, YoutubeSearch, YoutubeVideo};
