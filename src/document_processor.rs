use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::PipelineError;

// @module: Document model and markdown chunking

// @const: ATX heading at the start of a line
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#{1,6}(\s|$)").unwrap()
});

/// File extensions recognized as translatable documentation
pub const DOC_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Check whether a repository path points at a documentation file
pub fn is_documentation_file(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .is_some_and(|ext| DOC_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Separator used to reassemble translated units into final content
pub const UNIT_SEPARATOR: &str = "\n\n";

// @struct: A single documentation file moving through the pipeline
#[derive(Debug)]
pub struct Document {
    // @field: Repository path, unique within a run
    pub path: String,

    // @field: Original text, fetched once
    pub raw_content: String,

    // @field: Ordered translatable units produced by the chunker
    pub units: Vec<String>,

    // @field: Translated units, index-aligned with `units`
    pub translated_units: Vec<String>,

    // @field: Destination path under the secondary-language directory
    pub destination_path: Option<String>,

    // @field: Reassembled translated content
    pub final_content: Option<String>,

    // @field: First failure recorded for this document, if any
    pub failure: Option<PipelineError>,
}

impl Document {
    /// Create a new document known only by its repository path
    pub fn new(path: impl Into<String>) -> Self {
        Document {
            path: path.into(),
            raw_content: String::new(),
            units: Vec::new(),
            translated_units: Vec::new(),
            destination_path: None,
            final_content: None,
            failure: None,
        }
    }

    /// Whether this document has dropped out of the pipeline
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Record a failure; the first recorded failure wins
    pub fn fail(&mut self, error: PipelineError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Join the translated units into final content.
    ///
    /// The translated unit count must match the source unit count and the
    /// i-th translated unit must correspond to the i-th source unit; the
    /// pipeline assigns results by index, so a mismatch here means a unit
    /// was lost and the document cannot be reassembled.
    pub fn finalize(&mut self) -> Result<(), PipelineError> {
        if self.translated_units.len() != self.units.len() {
            return Err(PipelineError::UnitCountMismatch {
                path: self.path.clone(),
                expected: self.units.len(),
                actual: self.translated_units.len(),
            });
        }

        self.final_content = Some(self.translated_units.join(UNIT_SEPARATOR));
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} units)", self.path, self.units.len())
    }
}

/// A contiguous run of non-blank lines, the smallest indivisible piece of a
/// document. A fenced code region is a single block regardless of blank
/// lines inside it.
struct Block<'a> {
    lines: Vec<&'a str>,
    starts_with_heading: bool,
}

impl Block<'_> {
    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Splits markdown/MDX text into ordered translation units.
///
/// Units break at blank lines and headings; consecutive paragraphs pack into
/// one unit up to a line budget so that each translation call carries a
/// reasonable amount of context. Fenced code blocks are never split: a block
/// larger than the budget becomes a unit of its own.
pub struct MarkdownChunker {
    /// Soft upper bound on lines per unit
    max_unit_lines: usize,
}

impl MarkdownChunker {
    /// Default line budget per unit
    pub const DEFAULT_MAX_UNIT_LINES: usize = 40;

    /// Create a chunker with the default line budget
    pub fn new() -> Self {
        Self::with_max_unit_lines(Self::DEFAULT_MAX_UNIT_LINES)
    }

    /// Create a chunker with a specific line budget
    pub fn with_max_unit_lines(max_unit_lines: usize) -> Self {
        MarkdownChunker {
            // A zero budget would make every block its own unit anyway
            max_unit_lines: max_unit_lines.max(1),
        }
    }

    /// Split raw document text into ordered, non-empty translation units.
    ///
    /// Joining the returned units with [`UNIT_SEPARATOR`] reconstructs the
    /// document up to whitespace normalization at unit boundaries.
    pub fn chunk(&self, content: &str) -> Vec<String> {
        let blocks = Self::split_blocks(content);

        let mut units: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_lines = 0usize;

        for block in blocks {
            let block_lines = block.line_count();
            let over_budget = current_lines + block_lines > self.max_unit_lines;

            if !current.is_empty() && (block.starts_with_heading || over_budget) {
                units.push(current.join(UNIT_SEPARATOR));
                current.clear();
                current_lines = 0;
            }

            current.push(block.lines.join("\n"));
            current_lines += block_lines;
        }

        if !current.is_empty() {
            units.push(current.join(UNIT_SEPARATOR));
        }

        units.retain(|unit| !unit.trim().is_empty());
        units
    }

    /// Split content into blocks at blank lines, keeping fenced code regions
    /// intact. An unterminated fence swallows the rest of the document into
    /// its block, so malformed input degrades to one oversized final unit
    /// instead of an error.
    fn split_blocks(content: &str) -> Vec<Block<'_>> {
        let mut blocks: Vec<Block<'_>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_is_heading = false;
        let mut open_fence: Option<&str> = None;

        for line in content.lines() {
            let trimmed = line.trim_start();

            if let Some(marker) = open_fence {
                current.push(line);
                if trimmed.starts_with(marker) {
                    open_fence = None;
                }
                continue;
            }

            if trimmed.is_empty() {
                if !current.is_empty() {
                    blocks.push(Block { lines: std::mem::take(&mut current), starts_with_heading: current_is_heading });
                    current_is_heading = false;
                }
                continue;
            }

            let is_heading = HEADING_REGEX.is_match(trimmed);
            if is_heading && !current.is_empty() {
                blocks.push(Block { lines: std::mem::take(&mut current), starts_with_heading: current_is_heading });
            }
            if current.is_empty() {
                current_is_heading = is_heading;
            }

            current.push(line);

            if trimmed.starts_with("```") {
                open_fence = Some("```");
            } else if trimmed.starts_with("~~~") {
                open_fence = Some("~~~");
            }
        }

        if open_fence.is_some() {
            warn!("Unterminated code fence; emitting remainder as a single unit");
        }

        if !current.is_empty() {
            blocks.push(Block { lines: current, starts_with_heading: current_is_heading });
        }

        blocks
    }
}

impl Default for MarkdownChunker {
    fn default() -> Self {
        Self::new()
    }
}
