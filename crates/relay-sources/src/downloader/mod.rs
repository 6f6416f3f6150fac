//! Media downloaders: resolve a public post URL to direct media links.

mod douyin;
mod instagram;
mod pinterest;
mod spotify;
mod tiktok;
mod twitter;
mod youtube;

pub use douyin::{Douyin, DouyinVideo};
pub use instagram::{Instagram, InstagramPost};
pub use pinterest::{Pin, Pinterest};
pub(crate) use pinterest::session_cookies;
pub use spotify::{Spotify, SpotifyTrack};
pub use tiktok::{TikTok, TikTokAuthor, TikTokVideo};
pub use twitter::{TweetDownload, TweetMedia, Twitter};
pub use youtube::{YoutubeChannel, YoutubeDownload, YoutubeDownloader, YoutubeVideoDownload};
