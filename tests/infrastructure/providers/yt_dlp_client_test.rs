use std::time::Duration;

use ephemera::application::ports::{MediaDownloader, ProviderError};
use ephemera::domain::MediaKind;
use ephemera::infrastructure::providers::{YtDlpClient, parse_search_listing};

const LISTING: &str = r#"{
    "entries": [
        {"id": "aaa", "title": "First", "thumbnails": [{"url": "https://i.ytimg.com/a.jpg"}], "duration": 61.0},
        {"title": "No id, skipped"},
        {"id": "bbb", "title": null, "duration": null},
        {"id": "ccc", "title": "Third"},
        {"id": "ddd", "title": "Fourth"},
        {"id": "eee", "title": "Fifth"},
        {"id": "fff", "title": "Sixth"}
    ]
}"#;

#[test]
fn given_search_listing_when_parsing_then_keeps_top_five_with_ids() {
    let results = parse_search_listing(LISTING.as_bytes()).unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(results[0].title, "First");
    assert_eq!(results[0].url, "https://www.youtube.com/watch?v=aaa");
    assert_eq!(results[0].thumbnail.as_deref(), Some("https://i.ytimg.com/a.jpg"));
    assert_eq!(results[0].duration, Some(61.0));
    assert_eq!(results[1].title, "Unknown");
    assert_eq!(results[4].url, "https://www.youtube.com/watch?v=eee");
}

#[test]
fn given_garbage_output_when_parsing_then_remote_failure() {
    let result = parse_search_listing(b"not json");

    assert!(matches!(result, Err(ProviderError::RemoteFailure(_))));
}

#[tokio::test]
async fn given_non_http_url_when_downloading_then_invalid_input() {
    let dir = tempfile::TempDir::new().unwrap();
    let client = YtDlpClient::new("yt-dlp".into(), None, Duration::from_secs(1), Duration::from_secs(1));

    let result = client
        .download("file:///etc/passwd", MediaKind::Audio, &dir.path().join("yt_x"))
        .await;

    assert!(matches!(result, Err(ProviderError::InvalidInput(_))));
}

#[tokio::test]
async fn given_missing_binary_when_downloading_then_reports_not_installed() {
    let dir = tempfile::TempDir::new().unwrap();
    let client = YtDlpClient::new(
        "/nonexistent/yt-dlp".into(),
        None,
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let result = client
        .download("https://www.youtube.com/watch?v=x", MediaKind::Audio, &dir.path().join("yt_x"))
        .await;

    match result {
        Err(ProviderError::RemoteFailure(message)) => assert!(message.contains("not installed")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[cfg(unix)]
mod fake_binary {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use ephemera::application::ports::{MediaDownloader, ProviderError, VideoSearcher};
    use ephemera::domain::{MediaKind, SearchQuery};
    use ephemera::infrastructure::providers::YtDlpClient;

    const FAKE_YT_DLP: &str = r#"#!/bin/sh
out=""
search=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  case "$arg" in ytsearch*) search="$arg";; esac
  prev="$arg"
done
if [ -n "$search" ]; then
  printf '{"entries":[{"id":"zzz","title":"%s"}]}' "$search"
  exit 0
fi
case "$out" in
  *fail*) echo "WARNING: retrying" >&2; echo "ERROR: Video unavailable" >&2; exit 1;;
  *slow*) sleep 5;;
esac
file=$(printf '%s' "$out" | sed 's/%(ext)s/m4a/')
printf 'audio' > "$file.part"
mv "$file.part" "$file"
"#;

    fn install_fake(dir: &Path) -> PathBuf {
        let path = dir.join("fake-yt-dlp");
        std::fs::write(&path, FAKE_YT_DLP).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn client(binary: &Path, timeout: Duration) -> YtDlpClient {
        YtDlpClient::new(binary.display().to_string(), None, timeout, timeout)
    }

    #[tokio::test]
    async fn given_successful_download_when_downloading_then_file_lands_next_to_stem() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = install_fake(dir.path());

        client(&binary, Duration::from_secs(5))
            .download("https://youtu.be/x", MediaKind::Audio, &dir.path().join("yt_ok"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("yt_ok.m4a")).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn given_failing_download_when_downloading_then_last_stderr_line_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = install_fake(dir.path());

        let result = client(&binary, Duration::from_secs(5))
            .download("https://youtu.be/x", MediaKind::Video, &dir.path().join("yt_fail"))
            .await;

        match result {
            Err(ProviderError::RemoteFailure(message)) => {
                assert_eq!(message, "ERROR: Video unavailable")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn given_hanging_download_when_timeout_elapses_then_timeout_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = install_fake(dir.path());

        let result = client(&binary, Duration::from_millis(200))
            .download("https://youtu.be/x", MediaKind::Audio, &dir.path().join("yt_slow"))
            .await;

        assert!(matches!(result, Err(ProviderError::Timeout(_))));
    }

    #[tokio::test]
    async fn given_query_when_searching_then_uses_ytsearch_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = install_fake(dir.path());

        let results = client(&binary, Duration::from_secs(5))
            .search(&SearchQuery::parse("Rust Talks").unwrap())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "ytsearch10:rust talks");
    }
}
