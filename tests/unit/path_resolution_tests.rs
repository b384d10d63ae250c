/*!
 * Tests for destination path resolution
 */

use doctrans::errors::{PathError, PipelineError};
use doctrans::translation::paths::{language_segment_index, resolve_destination_path};
use crate::common::mock_collaborators::MockBackend;

/// Test that the language segment is found by whole-segment match
#[test]
fn test_language_segment_index_withValidPath_shouldFindSegment() {
    assert_eq!(language_segment_index("docs/en/guides/flows/first-flow.mdx", "en").unwrap(), 1);
    assert_eq!(language_segment_index("en/readme.md", "en").unwrap(), 0);
}

/// Test that a language tag appearing only as a substring does not match
#[test]
fn test_language_segment_index_withSubstringOnly_shouldFail() {
    let error = language_segment_index("docs/english/guide.md", "en").unwrap_err();
    assert!(matches!(error, PathError::MissingLanguageSegment { .. }));
}

/// Test that a path with two language segments is rejected as ambiguous
#[test]
fn test_language_segment_index_withTwoMatches_shouldBeAmbiguous() {
    let error = language_segment_index("docs/en/en/guide.md", "en").unwrap_err();
    match error {
        PathError::AmbiguousLanguageSegment { matches, .. } => assert_eq!(matches, 2),
        other => panic!("Expected AmbiguousLanguageSegment, got {:?}", other),
    }
}

/// Test the canonical rewrite example
#[tokio::test]
async fn test_resolve_destination_path_withValidPath_shouldSwapLanguageSegment() {
    let backend = MockBackend::new();

    let resolved = resolve_destination_path(
        &backend,
        "docs/en/guides/flows/first-flow.mdx",
        "en",
        "pt-BR",
    )
    .await
    .unwrap();

    assert_eq!(resolved, "docs/pt-BR/guides/flows/first-flow.mdx");
}

/// Test that quoting around the backend reply is stripped
#[tokio::test]
async fn test_resolve_destination_path_withQuotedReply_shouldSanitize() {
    let backend = MockBackend::new().with_path_reply("`docs/ko/guide.md`");

    let resolved = resolve_destination_path(&backend, "docs/en/guide.md", "en", "ko")
        .await
        .unwrap();

    assert_eq!(resolved, "docs/ko/guide.md");
}

/// Test that a reply changing anything besides the language segment is rejected
#[tokio::test]
async fn test_resolve_destination_path_withMangledReply_shouldFail() {
    let backend = MockBackend::new().with_path_reply("docs/ko/renamed.md");

    let error = resolve_destination_path(&backend, "docs/en/guide.md", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Path(PathError::InvalidRewrite { .. })
    ));
}

/// Test that a reply keeping the source language segment is rejected
#[tokio::test]
async fn test_resolve_destination_path_withUntouchedReply_shouldFail() {
    let backend = MockBackend::new().with_path_reply("docs/en/guide.md");

    let error = resolve_destination_path(&backend, "docs/en/guide.md", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Path(PathError::InvalidRewrite { .. })));
}

/// Test that an ambiguous path fails before the backend is ever called
#[tokio::test]
async fn test_resolve_destination_path_withAmbiguousPath_shouldNotCallBackend() {
    let backend = MockBackend::new();
    let tracker = backend.tracker();

    let error = resolve_destination_path(&backend, "docs/en/en/guide.md", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Path(PathError::AmbiguousLanguageSegment { .. })
    ));
    assert_eq!(tracker.lock().unwrap().path_calls, 0);
}
