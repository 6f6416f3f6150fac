//! Anime quotes scraped from the otakotaku quote feed.

use rand::Rng;
use scraper::Html;
use serde::Serialize;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::html;

/// Number of feed pages to pick from.
pub const FEED_PAGES: u32 = 184;

#[derive(Debug, Clone, Serialize)]
pub struct AnimeQuote {
    pub link: Option<String>,
    pub image: Option<String>,
    pub character: String,
    pub anime: String,
    pub episode: String,
    pub uploaded_at: String,
    pub quote: String,
}

#[derive(Debug, Clone)]
pub struct AnimeQuotes {
    http: HttpClient,
    base: String,
}

impl AnimeQuotes {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    /// Quotes from a random feed page.
    pub async fn random(&self) -> Result<Vec<AnimeQuote>> {
        let page = rand::thread_rng().gen_range(0..FEED_PAGES);
        self.page(page).await
    }

    #[instrument(skip(self), fields(service = "otakotaku"))]
    pub async fn page(&self, page: u32) -> Result<Vec<AnimeQuote>> {
        let body = self
            .http
            .text(self.http.get(format!("{}/quote/feed/{}", self.base, page)))
            .await?;

        let quotes = parse_quotes(&body)?;
        if quotes.is_empty() {
            return Err(SourceError::not_found("No quotes found for the given page."));
        }
        Ok(quotes)
    }
}

fn parse_quotes(body: &str) -> Result<Vec<AnimeQuote>> {
    let doc = Html::parse_document(body);
    let card = html::selector("div.kotodama-list")?;
    let link = html::selector("a")?;
    let img = html::selector("img")?;
    let character = html::selector("div.char-name")?;
    let anime = html::selector("div.anime-title")?;
    let episode = html::selector("div.meta")?;
    let uploaded = html::selector("small.meta")?;
    let quote = html::selector("div.quote")?;

    Ok(doc
        .select(&card)
        .map(|el| AnimeQuote {
            link: html::first_attr(el, &link, "href"),
            image: html::first_attr(el, &img, "data-src"),
            character: html::first_text(el, &character).unwrap_or_default(),
            anime: html::first_text(el, &anime).unwrap_or_default(),
            episode: html::first_text(el, &episode).unwrap_or_default(),
            uploaded_at: html::first_text(el, &uploaded).unwrap_or_default(),
            quote: html::first_text(el, &quote).unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotes() {
        let body = r#"<div class="kotodama-list">
            <a href="https://otakotaku.com/quote/view/1"><img data-src="https://img/1.jpg"></a>
            <div class="char-name"> Lelouch </div>
            <div class="anime-title">Code Geass</div>
            <div class="meta">Episode 25</div>
            <small class="meta">2019-01-01</small>
            <div class="quote">The only ones who should kill are those prepared to be killed.</div>
        </div>"#;

        let quotes = parse_quotes(body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].character, "Lelouch");
        assert_eq!(quotes[0].episode, "Episode 25");
        assert_eq!(quotes[0].uploaded_at, "2019-01-01");
        assert_eq!(quotes[0].image.as_deref(), Some("https://img/1.jpg"));
    }
}
