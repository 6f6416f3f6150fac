//! One instance of every integration, built once at startup.

use crate::ai::{ImageToImage, NsfwCheck, Zai};
use crate::client::HttpClient;
use crate::downloader::{
    Douyin, Instagram, Pinterest, Spotify, TikTok, Twitter, YoutubeDownloader,
};
use crate::poll::PollPolicy;
use crate::random::{Anhmoe, AnimeQuotes, RandomImages};
use crate::search::{Cookpad, Lyrics, PinterestSearch, TikTokSearch, YoutubeSearch};
use crate::tools::{Appmaker, Ocr, Upscaler};
use crate::upstream::{Upstream, UpstreamHosts};

/// Registry of integration clients sharing one [`HttpClient`].
#[derive(Debug, Clone)]
pub struct Sources {
    pub tiktok: TikTok,
    pub spotify: Spotify,
    pub instagram: Instagram,
    pub twitter: Twitter,
    pub douyin: Douyin,
    pub pinterest: Pinterest,
    pub youtube: YoutubeDownloader,

    pub youtube_search: YoutubeSearch,
    pub tiktok_search: TikTokSearch,
    pub pinterest_search: PinterestSearch,
    pub lyrics: Lyrics,
    pub cookpad: Cookpad,

    pub images: RandomImages,
    pub anhmoe: Anhmoe,
    pub quotes: AnimeQuotes,

    pub upscaler: Upscaler,
    pub ocr: Ocr,
    pub appmaker: Appmaker,

    pub img2img: ImageToImage,
    pub nsfw: NsfwCheck,
    pub zai: Zai,
}

impl Sources {
    pub fn new(http: HttpClient, hosts: &UpstreamHosts) -> Self {
        let base = |u: Upstream| hosts.base(u);

        Self {
            tiktok: TikTok::new(http.clone(), base(Upstream::Tikwm)),
            spotify: Spotify::new(http.clone(), base(Upstream::Downloaderize)),
            instagram: Instagram::new(
                http.clone(),
                base(Upstream::Snapins),
                base(Upstream::Igram),
            ),
            twitter: Twitter::new(http.clone(), base(Upstream::X2Twitter)),
            douyin: Douyin::new(http.clone(), base(Upstream::Savetik)),
            pinterest: Pinterest::new(http.clone(), base(Upstream::Pinterest)),
            youtube: YoutubeDownloader::new(http.clone(), base(Upstream::Ytdown)),

            youtube_search: YoutubeSearch::new(http.clone(), base(Upstream::Youtube)),
            tiktok_search: TikTokSearch::new(http.clone(), base(Upstream::Tikwm)),
            pinterest_search: PinterestSearch::new(http.clone(), base(Upstream::Pinterest)),
            lyrics: Lyrics::new(http.clone(), base(Upstream::Lrclib)),
            cookpad: Cookpad::new(http.clone(), base(Upstream::Cookpad)),

            images: RandomImages::new(http.clone(), hosts.clone()),
            anhmoe: Anhmoe::new(http.clone(), base(Upstream::Anhmoe)),
            quotes: AnimeQuotes::new(http.clone(), base(Upstream::Otakotaku)),

            upscaler: Upscaler::new(http.clone(), base(Upstream::Imglarger)),
            ocr: Ocr::new(http.clone(), base(Upstream::Ocr)),
            appmaker: Appmaker::new(http.clone(), base(Upstream::Appmaker)),

            img2img: ImageToImage::new(http.clone(), base(Upstream::Nanana)),
            nsfw: NsfwCheck::new(http.clone(), base(Upstream::Nyckel)),
            zai: Zai::new(http, base(Upstream::Zai)),
        }
    }

    /// Replaces the polling policy of every job-based integration.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.upscaler = self.upscaler.with_poll_policy(policy);
        self.appmaker = self.appmaker.with_poll_policy(policy);
        self.img2img = self.img2img.with_poll_policy(policy);
        self
    }
}
