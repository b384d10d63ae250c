/*!
 * End-to-end pipeline tests against mock collaborators
 */

use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use doctrans::app_config::Config;
use doctrans::app_controller::Controller;
use doctrans::file_utils::FileManager;
use doctrans::translation::{PipelineOptions, RunState, TranslationPipeline};
use crate::common;
use crate::common::mock_collaborators::{MockBackend, MockRepository};

/// Config wired for tests: real batch sizes, no pacing delays
fn test_config(output_dir: &str) -> Config {
    let mut config = Config::default();
    config.output_dir = output_dir.to_string();
    config.translation.common.document_pause_ms = 0;
    config.translation.common.retry_delay_ms = 0;
    config
}

/// Pipeline options matching the test config
fn test_options() -> PipelineOptions {
    PipelineOptions {
        chunk_max_lines: 40,
        retry_attempts: 3,
        retry_delay: Duration::ZERO,
        fetch_batch_size: 10,
        path_batch_size: 10,
        document_batch_size: 1,
        document_pause: Duration::ZERO,
    }
}

/// Repository with `count` markdown guides under docs/en
fn seeded_repository(count: usize) -> MockRepository {
    let mut repo = MockRepository::new();
    for i in 0..count {
        repo = repo.with_file(
            format!("docs/en/guides/guide-{:02}.mdx", i),
            common::sample_markdown(),
        );
    }
    repo
}

/// Test that a full run over 12 documents writes 12 non-empty output files
#[tokio::test]
async fn test_full_run_withTwelveDocuments_shouldWriteTwelveFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(&temp_dir.path().to_string_lossy());
    let controller = Controller::with_config(config)?;

    let repository = Arc::new(seeded_repository(12));
    let backend = Arc::new(MockBackend::new());

    let summary = controller.run_with_collaborators(repository, backend).await?;

    assert!(summary.failures.is_empty(), "failures: {:?}", summary.failures);
    assert_eq!(summary.written.len(), 12);
    assert!(summary.output_root.starts_with(temp_dir.path()));

    for path in &summary.written {
        assert!(path.starts_with(&summary.output_root));
        assert!(path.to_string_lossy().contains("docs/ko/"));
        let content = FileManager::read_to_string(path)?;
        assert!(!content.trim().is_empty());
        assert!(content.contains("<ko>"));
    }

    Ok(())
}

/// Test that non-documentation files are filtered out during discovery
#[tokio::test]
async fn test_full_run_withMixedFileTypes_shouldOnlyTranslateDocs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(&temp_dir.path().to_string_lossy());
    let controller = Controller::with_config(config)?;

    let repository = Arc::new(
        seeded_repository(3)
            .with_file("docs/en/logo.png", "not really a png")
            .with_file("docs/en/snippets/example.py", "print('hi')"),
    );
    let backend = Arc::new(MockBackend::new());

    let summary = controller.run_with_collaborators(repository, backend).await?;

    assert_eq!(summary.written.len(), 3);
    Ok(())
}

/// Test that an explicit file list bypasses repository discovery
#[tokio::test]
async fn test_full_run_withExplicitFiles_shouldSkipDiscovery() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = test_config(&temp_dir.path().to_string_lossy());
    config.files = vec![
        "docs/en/guides/guide-00.mdx".to_string(),
        "docs/en/guides/guide-01.mdx".to_string(),
    ];
    let controller = Controller::with_config(config)?;

    let repository = Arc::new(seeded_repository(5));
    let repo_tracker = repository.tracker();
    let backend = Arc::new(MockBackend::new());

    let summary = controller.run_with_collaborators(repository, backend).await?;

    assert_eq!(summary.written.len(), 2);
    assert_eq!(repo_tracker.lock().unwrap().list_calls, 0);
    Ok(())
}

/// Test that translated units stay aligned with their source units
#[tokio::test]
async fn test_pipeline_withMultiUnitDocument_shouldPreserveUnitOrder() {
    let repository = Arc::new(
        MockRepository::new().with_file("docs/en/sections.md", common::sectioned_markdown(6)),
    );
    let backend = Arc::new(MockBackend::new());
    let backend_handle = backend.clone();
    let pipeline = TranslationPipeline::new(repository, backend, test_options());

    let mut state = RunState::new("docs", "en", "ko");
    pipeline.run(&mut state, &[], |_, _| {}).await.unwrap();

    // All of the document's units were in flight together
    assert!(backend_handle.max_in_flight() >= 2);

    let doc = &state.documents[0];
    assert!(doc.failure.is_none());
    assert_eq!(doc.units.len(), 6);
    assert_eq!(doc.translated_units.len(), 6);
    for (i, translated) in doc.translated_units.iter().enumerate() {
        assert!(
            translated.contains(&format!("Section {}", i)),
            "unit {} was reordered: {}",
            i,
            translated
        );
        assert!(translated.starts_with("<ko>"));
    }

    // Final content keeps the original section order
    let final_content = doc.final_content.as_deref().unwrap();
    let positions: Vec<usize> = (0..6)
        .map(|i| final_content.find(&format!("Section {}", i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

/// Test that one failing document is reported and skipped without
/// disturbing its siblings
#[tokio::test]
async fn test_full_run_withOneBrokenDocument_shouldIsolateFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(&temp_dir.path().to_string_lossy());
    let controller = Controller::with_config(config)?;

    let repository = Arc::new(
        seeded_repository(4).with_file("docs/en/broken.md", "This chunk says FAIL loudly.\n"),
    );
    let backend = Arc::new(MockBackend::new().failing_on("FAIL"));

    let summary = controller.run_with_collaborators(repository, backend).await?;

    assert_eq!(summary.written.len(), 4);
    assert_eq!(summary.failures.len(), 1);
    let (path, error) = &summary.failures[0];
    assert_eq!(path, "docs/en/broken.md");
    assert!(error.contains("after 3 attempts"), "error was: {}", error);
    Ok(())
}

/// Test that a missing file fails at fetch without aborting the run
#[tokio::test]
async fn test_pipeline_withMissingFile_shouldRecordFetchFailure() {
    let repository = Arc::new(
        MockRepository::new().with_file("docs/en/present.md", common::sample_markdown()),
    );
    let backend = Arc::new(MockBackend::new());
    let pipeline = TranslationPipeline::new(repository, backend, test_options());

    let mut state = RunState::new("docs", "en", "ko");
    let explicit = vec![
        "docs/en/present.md".to_string(),
        "docs/en/absent.md".to_string(),
    ];
    pipeline.run(&mut state, &explicit, |_, _| {}).await.unwrap();

    assert_eq!(state.documents.len(), 2);
    assert!(state.documents[0].failure.is_none());
    assert!(state.documents[0].final_content.is_some());
    assert!(state.documents[1].failure.is_some());
    assert_eq!(state.failures().len(), 1);
}

/// Test that a document with an unresolvable path is reported but its
/// siblings still translate
#[tokio::test]
async fn test_pipeline_withAmbiguousPath_shouldIsolatePathFailure() {
    let repository = Arc::new(
        MockRepository::new()
            .with_file("docs/en/guide.md", common::sample_markdown())
            .with_file("docs/en/en/nested.md", common::sample_markdown()),
    );
    let backend = Arc::new(MockBackend::new());
    let pipeline = TranslationPipeline::new(repository, backend, test_options());

    let mut state = RunState::new("docs", "en", "ko");
    pipeline.run(&mut state, &[], |_, _| {}).await.unwrap();

    let ok_docs: Vec<_> = state.documents.iter().filter(|d| !d.is_failed()).collect();
    assert_eq!(ok_docs.len(), 1);
    assert_eq!(ok_docs[0].path, "docs/en/guide.md");
    assert_eq!(ok_docs[0].destination_path.as_deref(), Some("docs/ko/guide.md"));
    assert_eq!(state.failures().len(), 1);
}

/// Test that the translate stage reports progress per document
#[tokio::test]
async fn test_pipeline_withProgressCallback_shouldCountDocuments() {
    let repository = Arc::new(seeded_repository(3));
    let backend = Arc::new(MockBackend::new());
    let pipeline = TranslationPipeline::new(repository, backend, test_options());

    let progress = Arc::new(std::sync::Mutex::new(Vec::new()));
    let progress_clone = progress.clone();

    let mut state = RunState::new("docs", "en", "ko");
    pipeline
        .run(&mut state, &[], move |done, total| {
            progress_clone.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    let events = progress.lock().unwrap().clone();
    assert_eq!(events, vec![(1, 3), (2, 3), (3, 3)]);
}
