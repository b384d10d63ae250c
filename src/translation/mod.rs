/*!
 * Translation of documentation files using AI providers.
 *
 * This module contains the core functionality for translating chunked
 * documents using various AI providers. It is split into several submodules:
 *
 * - `core`: Backend trait, provider dispatch and instruction building
 * - `batch`: Batched concurrent execution with ordered results
 * - `retry`: Bounded retry with fixed delay for translation calls
 * - `paths`: Destination-path resolution for translated documents
 * - `pipeline`: The per-run orchestration over a document collection
 */

// Re-export main types for easier usage
pub use self::core::{TranslationBackend, TranslationService};
pub use self::batch::BatchRunner;
pub use self::pipeline::{RunState, TranslationPipeline, PipelineOptions};

// Submodules
pub mod batch;
pub mod core;
pub mod paths;
pub mod pipeline;
pub mod retry;
