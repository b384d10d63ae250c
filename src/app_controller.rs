use anyhow::{Result, Context};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::repository::DocumentRepository;
use crate::repository::github::GithubClient;
use crate::translation::{TranslationBackend, TranslationService, TranslationPipeline, PipelineOptions, RunState};

// @module: Application controller for documentation translation

/// Outcome of one run
#[derive(Debug)]
pub struct RunSummary {
    /// Timestamped directory the run wrote into
    pub output_root: PathBuf,

    /// Output files written, one per translated document
    pub written: Vec<PathBuf>,

    /// Per-document failures: (repository path, error)
    pub failures: Vec<(String, String)>,
}

/// Main application controller for documentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.primary_language.is_empty() && !self.config.secondary_language.is_empty()
    }

    /// Run the full pipeline against the configured repository and provider
    pub async fn run(&self) -> Result<RunSummary> {
        let repository = Arc::new(
            GithubClient::from_env(&self.config.repo)
                .context("Failed to create repository client")?,
        );
        let backend = Arc::new(
            TranslationService::new(self.config.translation.clone())
                .context("Failed to create translation service")?,
        );

        self.run_with_collaborators(repository, backend).await
    }

    /// Run the full pipeline against explicit collaborators.
    ///
    /// This is the seam tests use to substitute a mock repository and a mock
    /// translation backend.
    pub async fn run_with_collaborators(
        &self,
        repository: Arc<dyn DocumentRepository>,
        backend: Arc<dyn TranslationBackend>,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();

        let source_name = language_utils::get_language_name(&self.config.primary_language)
            .unwrap_or_else(|_| self.config.primary_language.clone());
        let target_name = language_utils::get_language_name(&self.config.secondary_language)
            .unwrap_or_else(|_| self.config.secondary_language.clone());
        info!(
            "Translating {} documentation from {} to {}",
            self.config.repo, source_name, target_name
        );

        let options = PipelineOptions::from_config(&self.config.translation.common);
        let pipeline = TranslationPipeline::new(repository, backend, options);
        let mut state = RunState::new(
            &self.config.docs_path,
            &self.config.primary_language,
            &self.config.secondary_language,
        );

        pipeline.discover(&mut state, &self.config.files).await
            .context("Document discovery failed")?;
        pipeline.fetch_and_chunk(&mut state).await;
        pipeline.resolve_destination_paths(&mut state).await;

        // Progress bar for the heaviest stage
        let progress = ProgressBar::new(state.active_count() as u64);
        progress.set_style(
            ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} documents")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let bar = progress.clone();
        pipeline
            .translate_documents(&mut state, move |done, _total| {
                bar.set_position(done as u64);
            })
            .await;
        progress.finish_and_clear();

        pipeline.finalize(&mut state);

        let summary = self.save_documents(&mut state)?;

        for (path, failure) in &summary.failures {
            error!("{}: {}", path, failure);
        }
        info!(
            "Translated {} of {} documents in {}",
            summary.written.len(),
            state.documents.len(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Write every finalized document under a timestamped output directory
    fn save_documents(&self, state: &mut RunState) -> Result<RunSummary> {
        let output_root = FileManager::run_output_dir(&self.config.output_dir);
        let mut written = Vec::new();

        for doc in state.documents.iter_mut().filter(|d| !d.is_failed()) {
            let Some(destination) = doc.destination_path.clone() else { continue };
            let Some(content) = doc.final_content.clone() else { continue };

            let output_path = output_root.join(&destination);
            match FileManager::write_to_file(&output_path, &content) {
                Ok(()) => {
                    info!("Saved: {}", output_path.display());
                    written.push(output_path);
                },
                Err(e) => doc.fail(PipelineError::Persistence(e.to_string())),
            }
        }

        let failures = state.failures().into_iter()
            .map(|(path, error)| (path.to_string(), error.to_string()))
            .collect();

        Ok(RunSummary { output_root, written, failures })
    }

    /// DOT rendering of the pipeline stage graph
    pub fn pipeline_graph() -> String {
        let mut graph = String::from("digraph doctrans {\n");
        graph.push_str("    rankdir=LR;\n");
        graph.push_str("    node [shape=box];\n");
        for (from, to) in Self::stage_edges() {
            graph.push_str(&format!("    {} -> {};\n", from, to));
        }
        graph.push_str("}\n");
        graph
    }

    /// Stage dependencies: path resolution and translation are independent
    /// branches that rejoin at finalize
    fn stage_edges() -> [(&'static str, &'static str); 6] {
        [
            ("discover", "fetch_and_chunk"),
            ("fetch_and_chunk", "resolve_destination_paths"),
            ("fetch_and_chunk", "translate_documents"),
            ("resolve_destination_paths", "finalize"),
            ("translate_documents", "finalize"),
            ("finalize", "persist"),
        ]
    }

    /// Human-readable duration for the run summary line
    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
