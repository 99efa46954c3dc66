//! ProfesorIA rendering
//!
//! Turns courses and session state into text the learner reads.
//!
//! - [`MarkdownRenderer`] - lesson view, final assessment view, sidebar and
//!   the full course document
//! - [`json::JsonExporter`] - compact or pretty JSON of a course
//! - [`export_course`] - writes `course.md` and `course.json` into a directory

pub mod json;
mod markdown;

pub use json::JsonExporter;
pub use markdown::{progress_bar, MarkdownRenderer};

use std::path::{Path, PathBuf};

use profesor_core::CourseData;
use thiserror::Error;

/// Errors that can occur while rendering or exporting a course.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to serialize the course to JSON.
    #[error("failed to serialize course: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write an export file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Files written by [`export_course`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    /// The Markdown document.
    pub markdown: PathBuf,
    /// The JSON document.
    pub json: PathBuf,
}

/// Writes `course.md` and `course.json` into `dir`, creating it if needed.
pub fn export_course(course: &CourseData, dir: &Path) -> Result<ExportedFiles> {
    std::fs::create_dir_all(dir)?;

    let markdown = dir.join("course.md");
    std::fs::write(&markdown, MarkdownRenderer::course_document(course))?;

    let json = dir.join("course.json");
    JsonExporter::new(course).write_to_file(&json, true)?;

    Ok(ExportedFiles { markdown, json })
}
