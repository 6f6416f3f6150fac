//! Downloader integrations against a mock upstream.

mod helpers;

use helpers::MockUpstream;
use relay_sources::{MediaKind, SourceError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const TIKTOK_URL: &str = "https://www.tiktok.com/@creator/video/7301234567890";

#[tokio::test]
async fn test_tiktok_download_maps_media() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("url", TIKTOK_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": {
                "id": "7301234567890",
                "title": "morning routine",
                "play": "https://cdn.tikwm.com/play.mp4",
                "wmplay": "https://cdn.tikwm.com/wm.mp4",
                "cover": "https://cdn.tikwm.com/cover.jpg",
                "author": {"unique_id": "creator", "nickname": "Creator", "avatar": "https://cdn/a.jpg"}
            }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let video = mock.sources.tiktok.download(TIKTOK_URL).await.unwrap();

    assert_eq!(video.id, "7301234567890");
    assert_eq!(video.final_url.as_deref(), Some("https://cdn.tikwm.com/play.mp4"));
    assert_eq!(video.author.as_ref().unwrap().username, "creator");
    assert_eq!(video.media_urls.len(), 2);
    assert_eq!(video.media_urls[1].quality.as_deref(), Some("watermark"));
}

#[tokio::test]
async fn test_tiktok_rejects_foreign_host_without_calling_upstream() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .tiktok
        .download("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();

    assert_eq!(err.code(), 400);
}

#[tokio::test]
async fn test_tiktok_missing_data_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": -1, "msg": ""})))
        .mount(&mock.server)
        .await;

    let err = mock.sources.tiktok.download(TIKTOK_URL).await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound(_)));
    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_upstream_error_status_is_500() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock.server)
        .await;

    let err = mock.sources.tiktok.download(TIKTOK_URL).await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 502, .. }));
    assert_eq!(err.code(), 500);
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_spotify_unsuccessful_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-admin/admin-ajax.php"))
        .and(body_string_contains("action=spotify_downloader_get_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .spotify
        .download("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC")
        .await
        .unwrap_err();

    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_spotify_track() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-admin/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "4uLU6hMCjMI75M1A2tKUQC",
                "title": "Never Gonna Give You Up",
                "author": "Rick Astley",
                "duration": "3:33",
                "thumbnail": "https://i.scdn.co/cover.jpg",
                "medias": [{"url": "https://dl/track.mp3", "quality": "320kbps", "extension": "mp3"}]
            }
        })))
        .mount(&mock.server)
        .await;

    let track = mock
        .sources
        .spotify
        .download("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC")
        .await
        .unwrap();

    assert_eq!(track.artist, "Rick Astley");
    assert_eq!(track.media_urls[0].kind, MediaKind::Audio);
    assert_eq!(track.media_urls[0].ext.as_deref(), Some("mp3"));
}

#[tokio::test]
async fn test_instagram_falls_back_to_igram() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/action.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/igdl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"url": "https://cdn.igram/reel.mp4", "thumbnail": "https://cdn.igram/t.jpg"},
                {"url": "https://cdn.igram/photo.jpg", "type": "image"}
            ]
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let post = mock
        .sources
        .instagram
        .download("https://www.instagram.com/reel/C0ffee/")
        .await
        .unwrap();

    assert_eq!(post.source, "igram");
    assert_eq!(post.count, 2);
    assert_eq!(post.media[0].kind, MediaKind::Video);
    assert_eq!(post.media[1].kind, MediaKind::Image);
    assert_eq!(post.media[0].source.as_deref(), Some("igram"));
}

#[tokio::test]
async fn test_instagram_all_mirrors_failed() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/action.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/igdl"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .instagram
        .download("https://instagram.com/p/abc/")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "instagram: all mirrors failed");
    assert_eq!(err.code(), 500);
}

#[tokio::test]
async fn test_twitter_token_then_search() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/api/userverify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "token": "cf-123"})))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/ajaxSearch"))
        .and(body_string_contains("cftoken=cf-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": "<div class=\"tw-middle\"><h3>Ship it</h3></div><div class=\"dl-action\"><a href=\"https://dl/hd.mp4\">Download MP4 (1080p)</a></div>"
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let media = mock
        .sources
        .twitter
        .download("https://x.com/user/status/1790000000000000000")
        .await
        .unwrap();

    assert_eq!(media.title.as_deref(), Some("Ship it"));
    assert_eq!(media.downloads.len(), 1);
    assert_eq!(media.downloads[0].quality, "MP4 (1080p)");
}

#[tokio::test]
async fn test_douyin_without_links_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ajaxSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": "<h3>Caption only</h3>"
        })))
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .douyin
        .download("https://www.douyin.com/video/7300000000000000000")
        .await
        .unwrap_err();

    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_pinterest_pin_with_session_cookie() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "csrftoken=abc; Path=/")
                .set_body_string("<html></html>"),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/resource/PinResource/get/"))
        .and(query_param("source_url", "/pin/555/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resource_response": {
                "data": {
                    "id": "555",
                    "grid_title": "Cabin",
                    "images": {"orig": {"url": "https://i.pinimg.com/originals/c.jpg", "width": 1000, "height": 1500}}
                }
            }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let pin = mock
        .sources
        .pinterest
        .download("https://id.pinterest.com/pin/555/")
        .await
        .unwrap();

    assert_eq!(pin.id, "555");
    assert_eq!(pin.title, "Cabin");
    assert_eq!(pin.media_urls.len(), 1);
    assert_eq!(pin.media_urls[0].width, Some(1000));
}

#[tokio::test]
async fn test_pinterest_missing_pin_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resource/PinResource/get/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resource_response": {"data": null}})))
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .pinterest
        .download("https://www.pinterest.com/pin/1/")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Pin not found.");
}

const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

#[tokio::test]
async fn test_youtube_resolves_each_video_format() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/proxy.php"))
        .and(body_string_contains("dQw4w9WgXcQ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api": {
                "title": "Never Gonna Give You Up",
                "imagePreviewUrl": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg",
                "userInfo": {"name": "Rick Astley", "username": "@RickAstleyYT", "isVerified": true, "userAvatar": ""},
                "mediaItems": [
                    {"type": "Video", "mediaRes": "1280x720", "mediaUrl": "https://cdn.ytdown.io/token720", "mediaFileSize": "24 MB", "mediaExtension": "MP4"},
                    {"type": "Video", "mediaRes": "640x360", "mediaUrl": "https://cdn.ytdown.io/token360", "mediaFileSize": "9 MB", "mediaExtension": "MP4"},
                    {"type": "Video", "mediaUrl": "https://cdn.ytdown.io/tokenauto"},
                    {"type": "Audio", "mediaRes": "128K", "mediaUrl": "https://cdn.ytdown.io/tokenaudio"}
                ]
            }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/proxy.php"))
        .and(body_string_contains("token720"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"api": {"fileUrl": "https://dl/720.mp4"}})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/proxy.php"))
        .and(body_string_contains("token360"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"api": {}})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let video = mock.sources.youtube.download(YOUTUBE_URL).await.unwrap();

    assert_eq!(video.title, "Never Gonna Give You Up");
    assert_eq!(video.channel.name.as_deref(), Some("Rick Astley"));
    assert!(video.channel.verified);
    assert_eq!(video.channel.avatar, None);
    assert_eq!(video.downloads.len(), 1);
    assert_eq!(video.downloads[0].resolution, "1280x720");
    assert_eq!(video.downloads[0].size.as_deref(), Some("24 MB"));
    assert_eq!(video.downloads[0].url, "https://dl/720.mp4");
}

#[tokio::test]
async fn test_youtube_without_info_is_not_found() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .and(path("/proxy.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"api": {"title": "x"}})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let err = mock.sources.youtube.download(YOUTUBE_URL).await.unwrap_err();

    assert!(matches!(err, SourceError::NotFound(_)));
    assert_eq!(err.to_string(), "Video info not found");
}

#[tokio::test]
async fn test_youtube_rejects_foreign_host_without_calling_upstream() {
    let mock = MockUpstream::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let err = mock
        .sources
        .youtube
        .download("https://vimeo.com/76979871")
        .await
        .unwrap_err();

    assert_eq!(err.code(), 400);
}
