/*!
 * Common test utilities for the doctrans test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

pub mod mock_collaborators;

/// Create a temporary directory for a test
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(tempfile::tempdir()?)
}

/// Create a file with the given content inside a test directory
pub fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// A small markdown document with headings, prose, and a fenced code block
pub fn sample_markdown() -> String {
    let mut doc = String::new();
    doc.push_str("# Getting started\n\n");
    doc.push_str("Welcome to the guide. This paragraph explains the basics\nacross two lines.\n\n");
    doc.push_str("Some more prose in a second paragraph.\n\n");
    doc.push_str("## Installation\n\n");
    doc.push_str("Install the package first:\n\n");
    doc.push_str("```bash\npip install example\n\nexample --version\n```\n\n");
    doc.push_str("## Usage\n\n");
    doc.push_str("Run the tool against your project.\n");
    doc
}

/// A markdown document with `sections` heading-plus-paragraph sections
pub fn sectioned_markdown(sections: usize) -> String {
    let mut doc = String::new();
    for i in 0..sections {
        doc.push_str(&format!("## Section {}\n\nBody of section {}.\n\n", i, i));
    }
    doc
}
