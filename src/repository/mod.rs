/*!
 * Repository host access.
 *
 * The pipeline consumes the repository host through the narrow
 * `DocumentRepository` trait so the concrete host (GitHub) is swappable
 * and mockable in tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::RepositoryError;

/// Read access to a source-controlled documentation tree
#[async_trait]
pub trait DocumentRepository: Send + Sync + Debug {
    /// List the repository paths of every file under `root`
    async fn list_documents(&self, root: &str) -> Result<Vec<String>, RepositoryError>;

    /// Fetch the raw text content of a single file
    async fn fetch_content(&self, path: &str) -> Result<String, RepositoryError>;
}

pub mod github;
