/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur when talking to the repository host
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The authentication credential is not present in the environment
    #[error("Missing repository credential: {0}")]
    MissingCredential(String),

    /// Error when making an API request fails
    #[error("Repository request failed: {0}")]
    RequestFailed(String),

    /// The repository host returned a non-success status
    #[error("Repository API error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// File content could not be decoded
    #[error("Failed to decode content for '{path}': {reason}")]
    Decode {
        /// Path of the file being fetched
        path: String,
        /// What went wrong while decoding
        reason: String,
    },
}

/// Errors that can occur while resolving a document's destination path
#[derive(Error, Debug)]
pub enum PathError {
    /// No path segment matches the source language
    #[error("no path segment matches language '{language}' in '{path}'")]
    MissingLanguageSegment {
        /// The path being resolved
        path: String,
        /// The language tag that was searched for
        language: String,
    },

    /// More than one path segment matches the source language
    #[error("ambiguous path: {matches} segments match language '{language}' in '{path}'")]
    AmbiguousLanguageSegment {
        /// The path being resolved
        path: String,
        /// The language tag that was searched for
        language: String,
        /// Number of matching segments
        matches: usize,
    },

    /// The backend returned a path that does not satisfy the rewrite contract
    #[error("backend rewrote '{path}' to invalid path '{returned}'")]
    InvalidRewrite {
        /// The path being resolved
        path: String,
        /// The path the backend returned
        returned: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend returned an empty reply
    #[error("Empty response received from translation backend")]
    EmptyResponse,

    /// All retry attempts were used up; carries the final error
    #[error("translation failed after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Total number of attempts made
        attempts: u32,
        /// The error from the final attempt
        last_error: Box<TranslationError>,
    },
}

/// Per-document pipeline failure; recording one of these on a document
/// stops its remaining stages without touching sibling documents.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fetching the document content failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] RepositoryError),

    /// The document produced no translatable units
    #[error("document '{0}' produced no translatable units")]
    EmptyDocument(String),

    /// Destination path resolution failed
    #[error("Path resolution error: {0}")]
    Path(#[from] PathError),

    /// Translating one of the document's units failed
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// The translated unit count does not line up with the source units
    #[error("document '{path}': expected {expected} translated units, got {actual}")]
    UnitCountMismatch {
        /// Document path
        path: String,
        /// Number of source units
        expected: usize,
        /// Number of translated units present
        actual: usize,
    },

    /// Writing the final content to disk failed
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}
