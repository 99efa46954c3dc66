//! JSON export of a course.
//!
//! The exported document has the same shape as the generation payload, so
//! it can be loaded back with [`profesor_core::CourseData::load`].

use std::fs::File;
use std::io::Write;
use std::path::Path;

use profesor_core::CourseData;

use crate::{RenderError, Result};

/// Serializes a [`CourseData`] to JSON.
pub struct JsonExporter<'a> {
    course: &'a CourseData,
}

impl<'a> JsonExporter<'a> {
    /// Creates an exporter for the given course.
    #[must_use]
    pub const fn new(course: &'a CourseData) -> Self {
        Self { course }
    }

    /// Compact JSON on a single line.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.course).map_err(RenderError::from)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.course).map_err(RenderError::from)
    }

    /// Writes the course to `path`, creating or overwriting the file.
    ///
    /// Parent directories must exist.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
