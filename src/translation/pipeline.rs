/*!
 * Per-run orchestration.
 *
 * Drives each document through fetch → chunk → {path resolution, translate}
 * → finalize, with batched concurrency at every stage. Failures are recorded
 * per document so one broken file never takes down its siblings.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use futures::future::join_all;
use log::info;

use crate::app_config::TranslationCommonConfig;
use crate::document_processor::{Document, MarkdownChunker, is_documentation_file};
use crate::errors::{PipelineError, RepositoryError};
use crate::repository::DocumentRepository;

use super::batch::BatchRunner;
use super::core::TranslationBackend;
use super::paths::resolve_destination_path;
use super::retry::with_retry;

/// Mutable state for one pipeline run.
///
/// Constructed at run start, mutated in place by each stage, discarded after
/// persistence; nothing here survives across runs.
pub struct RunState {
    /// Language tag of the source documentation tree
    pub primary_language: String,

    /// Language tag of the translated tree being produced
    pub secondary_language: String,

    /// Root directory of the documentation tree inside the repository
    pub docs_root: String,

    /// The documents being processed
    pub documents: Vec<Document>,
}

impl RunState {
    /// Create run state with an empty document collection
    pub fn new(
        docs_root: impl Into<String>,
        primary_language: impl Into<String>,
        secondary_language: impl Into<String>,
    ) -> Self {
        RunState {
            primary_language: primary_language.into(),
            secondary_language: secondary_language.into(),
            docs_root: docs_root.into(),
            documents: Vec::new(),
        }
    }

    /// Repository directory holding the source-language documents
    pub fn source_root(&self) -> String {
        format!("{}/{}", self.docs_root.trim_end_matches('/'), self.primary_language)
    }

    /// Documents that are still moving through the pipeline
    pub fn active_count(&self) -> usize {
        self.documents.iter().filter(|d| !d.is_failed()).count()
    }

    /// Paths and errors of documents that dropped out
    pub fn failures(&self) -> Vec<(&str, &PipelineError)> {
        self.documents.iter()
            .filter_map(|d| d.failure.as_ref().map(|e| (d.path.as_str(), e)))
            .collect()
    }
}

/// Tuning knobs for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Soft upper bound on lines per translation unit
    pub chunk_max_lines: usize,

    /// Total attempts per unit translation call
    pub retry_attempts: u32,

    /// Delay between retry attempts
    pub retry_delay: Duration,

    /// Concurrent content fetches during the chunking stage
    pub fetch_batch_size: usize,

    /// Concurrent destination-path resolutions
    pub path_batch_size: usize,

    /// Documents translated at once
    pub document_batch_size: usize,

    /// Pause between documents during translation
    pub document_pause: Duration,
}

impl PipelineOptions {
    /// Build options from the shared translation settings
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self {
            chunk_max_lines: common.chunk_max_lines,
            retry_attempts: common.retry_attempts,
            retry_delay: Duration::from_millis(common.retry_delay_ms),
            fetch_batch_size: common.fetch_batch_size,
            path_batch_size: common.path_batch_size,
            document_batch_size: common.document_batch_size,
            document_pause: Duration::from_millis(common.document_pause_ms),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&TranslationCommonConfig::default())
    }
}

/// Orchestrates one full run over a document collection
pub struct TranslationPipeline {
    /// Repository host the documents come from
    repository: Arc<dyn DocumentRepository>,

    /// Translation backend for chunks and paths
    backend: Arc<dyn TranslationBackend>,

    /// Tuning knobs
    options: PipelineOptions,
}

impl TranslationPipeline {
    /// Create a pipeline over the given collaborators
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        backend: Arc<dyn TranslationBackend>,
        options: PipelineOptions,
    ) -> Self {
        Self { repository, backend, options }
    }

    /// Fill the document collection, either from an explicit file list or by
    /// listing the repository under the source-language directory.
    ///
    /// Discovery failure is the one error that aborts a whole run; with no
    /// document list there is nothing to isolate.
    pub async fn discover(
        &self,
        state: &mut RunState,
        explicit_files: &[String],
    ) -> Result<(), RepositoryError> {
        let paths: Vec<String> = if !explicit_files.is_empty() {
            info!("Using explicit file list ({} files)", explicit_files.len());
            explicit_files.to_vec()
        } else {
            self.repository
                .list_documents(&state.source_root())
                .await?
                .into_iter()
                .filter(|path| is_documentation_file(path))
                .collect()
        };

        info!("Found {} files to translate", paths.len());
        state.documents = paths.into_iter().map(Document::new).collect();
        Ok(())
    }

    /// Fetch each document's content and chunk it into translation units
    pub async fn fetch_and_chunk(&self, state: &mut RunState) {
        let work: Vec<(usize, String)> = state.documents.iter().enumerate()
            .filter(|(_, d)| !d.is_failed())
            .map(|(index, d)| (index, d.path.clone()))
            .collect();
        let indices: Vec<usize> = work.iter().map(|(index, _)| *index).collect();
        let total = work.len();
        if total == 0 {
            return;
        }

        let completed = Arc::new(AtomicUsize::new(0));
        let budget = self.options.chunk_max_lines;
        let runner = BatchRunner::new(self.options.fetch_batch_size, Duration::ZERO);

        let results = runner
            .run(work, |_, (_, path)| {
                let repository = Arc::clone(&self.repository);
                let completed = Arc::clone(&completed);
                async move {
                    let content = repository.fetch_content(&path).await
                        .map_err(PipelineError::Fetch)?;
                    let units = MarkdownChunker::with_max_unit_lines(budget).chunk(&content);
                    if units.is_empty() {
                        return Err(PipelineError::EmptyDocument(path));
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Chunked file {}/{}", done, total);
                    Ok((content, units))
                }
            })
            .await;

        for (doc_index, result) in indices.into_iter().zip(results) {
            match result {
                Ok((content, units)) => {
                    let doc = &mut state.documents[doc_index];
                    doc.raw_content = content;
                    doc.units = units;
                },
                Err(error) => state.documents[doc_index].fail(error),
            }
        }
    }

    /// Resolve each document's destination path.
    ///
    /// Independent of the translation stage; only finalize requires both.
    pub async fn resolve_destination_paths(&self, state: &mut RunState) {
        let work: Vec<(usize, String)> = state.documents.iter().enumerate()
            .filter(|(_, d)| !d.is_failed())
            .map(|(index, d)| (index, d.path.clone()))
            .collect();
        let indices: Vec<usize> = work.iter().map(|(index, _)| *index).collect();
        let total = work.len();
        if total == 0 {
            return;
        }

        let source_language = state.primary_language.clone();
        let target_language = state.secondary_language.clone();
        let completed = Arc::new(AtomicUsize::new(0));
        let runner = BatchRunner::new(self.options.path_batch_size, Duration::ZERO);

        let results = runner
            .run(work, |_, (_, path)| {
                let backend = Arc::clone(&self.backend);
                let source_language = source_language.clone();
                let target_language = target_language.clone();
                let completed = Arc::clone(&completed);
                async move {
                    let destination = resolve_destination_path(
                        backend.as_ref(),
                        &path,
                        &source_language,
                        &target_language,
                    )
                    .await?;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Determined translation path for file {}/{}", done, total);
                    Ok::<_, PipelineError>(destination)
                }
            })
            .await;

        for (doc_index, result) in indices.into_iter().zip(results) {
            match result {
                Ok(destination) => state.documents[doc_index].destination_path = Some(destination),
                Err(error) => state.documents[doc_index].fail(error),
            }
        }
    }

    /// Translate every document.
    ///
    /// All of a document's units launch together; the document-level batch
    /// size (1 by default) is what bounds total load on the backend, and a
    /// pause after each document smooths out whole-document bursts.
    pub async fn translate_documents(
        &self,
        state: &mut RunState,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) {
        let work: Vec<(usize, String, Vec<String>)> = state.documents.iter().enumerate()
            .filter(|(_, d)| !d.is_failed())
            .map(|(index, d)| (index, d.path.clone(), d.units.clone()))
            .collect();
        let indices: Vec<usize> = work.iter().map(|(index, _, _)| *index).collect();
        let total = work.len();
        if total == 0 {
            return;
        }

        let source_language = state.primary_language.clone();
        let target_language = state.secondary_language.clone();
        let attempts = self.options.retry_attempts;
        let delay = self.options.retry_delay;
        let completed = Arc::new(AtomicUsize::new(0));
        let runner = BatchRunner::new(self.options.document_batch_size, self.options.document_pause);

        let results = runner
            .run(work, |_, (_, path, units)| {
                let backend = Arc::clone(&self.backend);
                let source_language = source_language.clone();
                let target_language = target_language.clone();
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();
                async move {
                    let unit_count = units.len();
                    let unit_futures = units.iter().enumerate().map(|(unit_index, unit)| {
                        let backend = Arc::clone(&backend);
                        let source_language = source_language.clone();
                        let target_language = target_language.clone();
                        let label = format!("{} unit {}/{}", path, unit_index + 1, unit_count);
                        async move {
                            with_retry(
                                || backend.translate_chunk(unit, &source_language, &target_language),
                                attempts,
                                delay,
                                &label,
                            )
                            .await
                        }
                    });

                    // Collected in launch order, so translated_units stays
                    // index-aligned with units
                    let translated: Result<Vec<String>, _> =
                        join_all(unit_futures).await.into_iter().collect();

                    match translated {
                        Ok(translated_units) => {
                            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                            info!("Translation of file {}/{} completed", done, total);
                            progress_callback(done, total);
                            Ok(translated_units)
                        },
                        Err(error) => Err(PipelineError::Translation(error)),
                    }
                }
            })
            .await;

        for (doc_index, result) in indices.into_iter().zip(results) {
            match result {
                Ok(translated_units) => {
                    state.documents[doc_index].translated_units = translated_units;
                },
                Err(error) => state.documents[doc_index].fail(error),
            }
        }
    }

    /// Reassemble final content for every surviving document
    pub fn finalize(&self, state: &mut RunState) {
        for doc in state.documents.iter_mut().filter(|d| !d.is_failed()) {
            if let Err(error) = doc.finalize() {
                doc.fail(error);
            }
        }
    }

    /// Run every stage in order over the given state
    pub async fn run(
        &self,
        state: &mut RunState,
        explicit_files: &[String],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<(), RepositoryError> {
        self.discover(state, explicit_files).await?;
        self.fetch_and_chunk(state).await;
        self.resolve_destination_paths(state).await;
        self.translate_documents(state, progress_callback).await;
        self.finalize(state);
        Ok(())
    }
}
