/*!
 * Mock collaborator implementations for testing
 *
 * This module provides mock implementations of the repository host and the
 * translation backend to avoid external API calls in tests. Both record the
 * calls they receive so tests can assert on interaction counts.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

use doctrans::errors::{ProviderError, RepositoryError, TranslationError};
use doctrans::repository::DocumentRepository;
use doctrans::translation::TranslationBackend;

/// Tracks calls made against a mock collaborator
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Number of repository listing calls
    pub list_calls: usize,
    /// Number of content fetch calls
    pub fetch_calls: usize,
    /// Number of chunk translation calls
    pub chunk_calls: usize,
    /// Number of path translation calls
    pub path_calls: usize,
}

/// In-memory repository backed by a path → content map
#[derive(Debug, Default)]
pub struct MockRepository {
    files: HashMap<String, String>,
    tracker: Arc<Mutex<CallTracker>>,
}

impl MockRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the repository
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Get the call tracker
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl DocumentRepository for MockRepository {
    async fn list_documents(&self, root: &str) -> Result<Vec<String>, RepositoryError> {
        self.tracker.lock().unwrap().list_calls += 1;

        let prefix = format!("{}/", root.trim_end_matches('/'));
        let mut paths: Vec<String> = self.files.keys()
            .filter(|path| path.starts_with(&prefix))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    async fn fetch_content(&self, path: &str) -> Result<String, RepositoryError> {
        self.tracker.lock().unwrap().fetch_calls += 1;

        self.files.get(path).cloned().ok_or_else(|| RepositoryError::ApiError {
            status_code: 404,
            message: format!("Not Found: {}", path),
        })
    }
}

/// Mock translation backend.
///
/// Chunk translation tags the original content with the target language so
/// tests can verify order preservation; path translation performs the
/// language-segment substitution a well-behaved model would, unless a fixed
/// reply is configured.
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Chunks containing this marker fail with a provider error
    fail_marker: Option<String>,
    /// Fixed reply for every path translation call
    path_reply: Option<String>,
    tracker: Arc<Mutex<CallTracker>>,
    /// Concurrent chunk calls right now
    current_in_flight: Arc<AtomicUsize>,
    /// High-water mark of concurrent chunk calls
    max_in_flight: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a well-behaved mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every chunk translation whose content contains `marker`
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    /// Answer every path translation with a fixed reply
    pub fn with_path_reply(mut self, reply: impl Into<String>) -> Self {
        self.path_reply = Some(reply.into());
        self
    }

    /// Get the call tracker
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }

    /// Highest number of chunk translations observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_chunk(
        &self,
        chunk: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.tracker.lock().unwrap().chunk_calls += 1;

        let in_flight = self.current_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        // Yield so sibling calls in the same batch can overlap
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        self.current_in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(marker) = &self.fail_marker {
            if chunk.contains(marker.as_str()) {
                return Err(TranslationError::Provider(ProviderError::RequestFailed(
                    format!("refused to translate chunk containing '{}'", marker),
                )));
            }
        }

        Ok(format!("<{}> {}", target_language, chunk))
    }

    async fn translate_path(
        &self,
        path: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.tracker.lock().unwrap().path_calls += 1;

        if let Some(reply) = &self.path_reply {
            return Ok(reply.clone());
        }

        let rewritten: Vec<&str> = path.split('/')
            .map(|segment| if segment == source_language { target_language } else { segment })
            .collect();
        Ok(rewritten.join("/"))
    }
}
