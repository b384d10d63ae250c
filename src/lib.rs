/*!
 * # doctrans - Documentation Translation with AI
 *
 * A Rust library for translating repository documentation trees using AI.
 *
 * ## Features
 *
 * - Discover documentation files (.md/.mdx) in a GitHub repository
 * - Chunk markdown/MDX into translation-safe units (code fences stay intact)
 * - Translate chunks concurrently using various AI providers:
 *   - Ollama (local LLM)
 *   - OpenAI API
 *   - Anthropic API
 * - Batched fan-out with pacing and bounded retries against rate limits
 * - Rewrite language-directory paths for the translated tree
 * - Persist each translated file under a timestamped output directory
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document_processor`: Document model and markdown chunking
 * - `translation`: AI-powered translation pipeline:
 *   - `translation::core`: Backend trait and provider dispatch
 *   - `translation::batch`: Batched concurrent execution
 *   - `translation::retry`: Bounded retry for translation calls
 *   - `translation::paths`: Destination-path resolution
 *   - `translation::pipeline`: Per-run orchestration
 * - `repository`: Repository host access (GitHub REST)
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language tag utilities
 * - `providers`: Client implementations for various LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document_processor;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod repository;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use document_processor::{Document, MarkdownChunker};
pub use translation::{BatchRunner, RunState, TranslationBackend, TranslationPipeline, TranslationService};
pub use errors::{PathError, PipelineError, ProviderError, RepositoryError, TranslationError};
