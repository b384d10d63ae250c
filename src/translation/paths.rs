/*!
 * Destination-path resolution.
 *
 * A translated document lives at the source path with its language directory
 * segment swapped. The rewrite itself is delegated to the translation
 * backend, the way the rest of the pipeline talks to it; this module
 * validates the precondition before the call and the postcondition after it,
 * so a wandering model reply can never produce a bad output location.
 */

use log::debug;

use crate::errors::{PathError, PipelineError};
use super::core::TranslationBackend;

/// Find the index of the single path segment equal to `language`.
///
/// Matching is by whole segment, so a language tag that happens to be a
/// substring of a folder name ("en" in "content") never matches. Zero or
/// multiple matching segments make the path unresolvable.
pub fn language_segment_index(path: &str, language: &str) -> Result<usize, PathError> {
    let matches: Vec<usize> = path
        .split('/')
        .enumerate()
        .filter(|(_, segment)| *segment == language)
        .map(|(index, _)| index)
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(PathError::MissingLanguageSegment {
            path: path.to_string(),
            language: language.to_string(),
        }),
        n => Err(PathError::AmbiguousLanguageSegment {
            path: path.to_string(),
            language: language.to_string(),
            matches: n,
        }),
    }
}

/// Strip quoting the model may add around a returned pathname
fn sanitize_reply(reply: &str) -> String {
    reply
        .lines()
        .map(|line| line.trim().trim_matches('`').trim_matches('"').trim_matches('\''))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Resolve the destination path for `path`, translated from
/// `source_language` into `target_language`.
///
/// The returned path must differ from the input only at the language
/// segment, which must equal the target language; any other difference in
/// the backend's reply fails resolution for this document.
pub async fn resolve_destination_path(
    backend: &dyn TranslationBackend,
    path: &str,
    source_language: &str,
    target_language: &str,
) -> Result<String, PipelineError> {
    let segment_index = language_segment_index(path, source_language)?;

    let reply = backend
        .translate_path(path, source_language, target_language)
        .await?;
    let candidate = sanitize_reply(&reply);
    debug!("Backend rewrote '{}' to '{}'", path, candidate);

    let source_segments: Vec<&str> = path.split('/').collect();
    let candidate_segments: Vec<&str> = candidate.split('/').collect();

    let valid = candidate_segments.len() == source_segments.len()
        && candidate_segments.iter().enumerate().all(|(index, segment)| {
            if index == segment_index {
                *segment == target_language
            } else {
                *segment == source_segments[index]
            }
        });

    if !valid {
        return Err(PipelineError::Path(PathError::InvalidRewrite {
            path: path.to_string(),
            returned: candidate,
        }));
    }

    Ok(candidate)
}
