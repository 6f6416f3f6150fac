//! Search integrations against a mock upstream.

mod helpers;

use helpers::MockUpstream;
use relay_sources::SourceError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn video_renderer(id: &str, title: &str) -> serde_json::Value {
    json!({
        "videoRenderer": {
            "videoId": id,
            "title": {"runs": [{"text": title}]},
            "lengthText": {"simpleText": "3:45"},
            "viewCountText": {"simpleText": "10,000 views"},
            "ownerText": {"runs": [{"text": "Uploader"}]}
        }
    })
}

fn results_page(count: usize) -> String {
    let items: Vec<_> = (0..count)
        .map(|i| video_renderer(&format!("vid{}", i), &format!("Video {}", i)))
        .collect();
    let data = json!({
        "contents": {"sectionListRenderer": {"contents": [{"itemSectionRenderer": {"contents": items}}]}}
    });
    format!(
        "<html><script>var ytInitialData = {};</script><script>var ytcfg = {{}};</script></html>",
        data
    )
}

#[tokio::test]
async fn test_youtube_search_respects_limit() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "lofi hip hop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(8)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let results = mock
        .sources
        .youtube_search
        .search("lofi hip hop", Some(3))
        .await
        .unwrap();

    assert_eq!(results.query, "lofi hip hop");
    assert_eq!(results.count, 3);
    assert_eq!(results.videos.len(), 3);
    assert_eq!(results.videos[0].title, "Video 0");
    assert_eq!(results.videos[0].views, Some(10_000));
}

#[tokio::test]
async fn test_youtube_limit_is_capped() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(60)))
        .mount(&mock.server)
        .await;

    let results = mock
        .sources
        .youtube_search
        .search("anything", Some(500))
        .await
        .unwrap();

    assert_eq!(results.count, relay_sources::search::YOUTUBE_MAX_LIMIT);
}

#[tokio::test]
async fn test_youtube_empty_query_is_rejected() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let err = mock.sources.youtube_search.search("  ", None).await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_lyrics_empty_list_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "unknown song"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock.server)
        .await;

    let err = mock.sources.lyrics.search("unknown song").await.unwrap_err();
    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_lyrics_passthrough() {
    let mock = MockUpstream::start().await;
    let track = json!({"id": 1, "trackName": "Yellow", "artistName": "Coldplay", "plainLyrics": "Look at the stars"});

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([track.clone()])))
        .mount(&mock.server)
        .await;

    let tracks = mock.sources.lyrics.search("yellow").await.unwrap();
    assert_eq!(tracks, vec![track]);
}

#[tokio::test]
async fn test_tiktok_search_prefixes_relative_media() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/api/feed/search"))
        .and(body_string_contains("keywords=cats"))
        .and(body_string_contains("count=15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "videos": [{
                    "video_id": "v1",
                    "title": "cat video",
                    "author": {"nickname": "Cat Lady", "unique_id": "catlady"},
                    "play_count": 100,
                    "digg_count": 7,
                    "play": "/video/media/play/v1.mp4",
                    "wmplay": "https://cdn/wm.mp4",
                    "music": "/video/music/v1.mp3",
                    "cover": "/video/cover/v1.webp"
                }]
            }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let videos = mock.sources.tiktok_search.search("cats", None).await.unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].stats.like_count, 7);
    assert_eq!(videos[0].author.username, "catlady");
    assert_eq!(videos[0].media.no_watermark, mock.url("/video/media/play/v1.mp4"));
    assert_eq!(videos[0].media.watermark, "https://cdn/wm.mp4");
}

#[tokio::test]
async fn test_pinterest_search_samples_images() {
    let mock = MockUpstream::start().await;
    let pins: String = (0..8)
        .map(|i| format!("<div><a href=\"/pin/{i}/\"><img src=\"https://i.pinimg.com/236x/{i}.jpg\"></a></div>"))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/pins/"))
        .and(query_param("q", "cabin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("<html><body>{}</body></html>", pins)))
        .mount(&mock.server)
        .await;

    let result = mock.sources.pinterest_search.search("cabin").await.unwrap();

    assert_eq!(result.count, 5);
    assert!(result.images.iter().all(|url| url.contains("/736x/")));
}

#[tokio::test]
async fn test_cookpad_detail_failure_is_reported_per_recipe() {
    let mock = MockUpstream::start().await;

    let listing = r#"<html><body><ul>
        <li id="recipe_1"><a class="block-link__main">Soto Ayam</a></li>
        <li id="recipe_2"><a class="block-link__main">Rawon</a></li>
    </ul></body></html>"#;
    let detail = r#"<html><head><script type="application/ld+json">
        {"@type":"Recipe","name":"Soto Ayam Lamongan","author":{"name":"Bu Tini"},
         "recipeIngredient":["ayam","kunyit"],"recipeInstructions":[{"text":"Rebus ayam"}]}
    </script></head></html>"#;

    Mock::given(method("GET"))
        .and(path("/id/cari/soto"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/resep/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/resep/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock.server)
        .await;

    let results = mock.sources.cookpad.search("soto", None).await.unwrap();

    assert_eq!(results.count, 2);
    let first = &results.recipes[0];
    assert_eq!(first.title, "Soto Ayam Lamongan");
    assert_eq!(first.author.as_deref(), Some("Bu Tini"));
    assert_eq!(first.ingredients, vec!["ayam", "kunyit"]);
    assert!(first.error.is_none());

    let second = &results.recipes[1];
    assert_eq!(second.title, "Rawon");
    assert!(second.error.is_some());
}
