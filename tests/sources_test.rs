//! Tests for the comment sources.

use std::io::Write;

use futures_util::StreamExt;
use huginn::sources::{CommentSort, JsonLinesSource, VecSource, YtDlpSource};
use huginn::{Comment, CommentSource, HuginnError, VideoRef};

fn video() -> VideoRef {
    VideoRef::parse("dQw4w9WgXcQ").unwrap()
}

async fn collect(source: &dyn CommentSource) -> Vec<huginn::Result<Comment>> {
    source.comments(&video()).await.unwrap().collect().await
}

// ============================================================================
// JSON Lines
// ============================================================================

#[tokio::test]
async fn jsonl_reads_comment_dump() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"cid": "a", "text": "Great video!", "author": "@fan", "votes": "1.2K", "reply": false}}"#
    )
    .unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"cid": "a.b", "text": "agreed", "reply": true}}"#).unwrap();
    writeln!(file, r#"{{"text": "meh", "votes": 3}}"#).unwrap();

    let source = JsonLinesSource::new(file.path());
    let comments: Vec<Comment> = collect(&source)
        .await
        .into_iter()
        .collect::<huginn::Result<_>>()
        .unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "Great video!");
    assert_eq!(comments[0].author.as_deref(), Some("@fan"));
    assert_eq!(comments[0].likes, Some(1200));
    assert_eq!(comments[0].position, 0);
    assert_eq!(comments[1].text, "meh");
    assert_eq!(comments[1].likes, Some(3));
    assert_eq!(comments[1].position, 1);
}

#[tokio::test]
async fn jsonl_malformed_line_is_an_error_item() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"text": "fine"}}"#).unwrap();
    writeln!(file, "{{not json").unwrap();

    let source = JsonLinesSource::new(file.path());
    let items = collect(&source).await;

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(HuginnError::Json(_))));
}

#[tokio::test]
async fn jsonl_missing_file_fails_on_open() {
    let source = JsonLinesSource::new("/nonexistent/comments.jsonl");
    let result = source.comments(&video()).await;
    assert!(matches!(result, Err(HuginnError::Io(_))));
}

// ============================================================================
// In-memory
// ============================================================================

#[tokio::test]
async fn vec_source_numbers_comments() {
    let source = VecSource::new(["a", "b"]);
    assert_eq!(source.len(), 2);

    let items = collect(&source).await;
    let comments: Vec<Comment> = items.into_iter().map(Result::unwrap).collect();
    assert_eq!(comments, vec![Comment::new("a", 0), Comment::new("b", 1)]);
}

#[tokio::test]
async fn vec_source_can_fail_after_comments() {
    let source = VecSource::new(["a"]).fail_with("boom");
    let items = collect(&source).await;
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[1], Err(HuginnError::FetchFailed(m)) if m == "boom"));
}

// ============================================================================
// yt-dlp (fake executable)
// ============================================================================

#[cfg(unix)]
fn fake_ytdlp(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("yt-dlp");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[tokio::test]
async fn ytdlp_parses_tool_output() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"id":"dQw4w9WgXcQ","comments":[{"text":"so good","parent":"root","like_count":5},{"text":"reply","parent":"x"},{"text":"classic","parent":"root"}]}"#;
    let script = fake_ytdlp(dir.path(), &format!("cat <<'JSON'\n{json}\nJSON"));

    let source = YtDlpSource::new(200)
        .program(script.to_string_lossy())
        .sort(CommentSort::Top);
    let comments: Vec<Comment> = collect(&source)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "so good");
    assert_eq!(comments[0].likes, Some(5));
    assert_eq!(comments[1].text, "classic");
}

#[cfg(unix)]
#[tokio::test]
async fn ytdlp_nonzero_exit_is_fetch_failure() {
    let dir = tempfile::tempdir().unwrap();
    let script = fake_ytdlp(dir.path(), "echo 'ERROR: Video unavailable' >&2\nexit 1");

    let source = YtDlpSource::new(200).program(script.to_string_lossy());
    let result = source.comments(&video()).await;

    match result {
        Err(HuginnError::FetchFailed(message)) => assert!(message.contains("Video unavailable")),
        Err(other) => panic!("expected FetchFailed, got {other:?}"),
        Ok(_) => panic!("expected FetchFailed, got a stream"),
    }
}

#[tokio::test]
async fn ytdlp_missing_program_is_fetch_failure() {
    let source = YtDlpSource::new(200).program("/nonexistent/yt-dlp");
    let result = source.comments(&video()).await;
    assert!(matches!(result, Err(HuginnError::FetchFailed(_))));
}
