//! Web-search citations attached to a candidate.
//!
//! When the model leaves `references` empty but grounding produced
//! citations, the citations become the course's references.

use profesor_core::CourseData;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Grounding metadata of a response candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Sources the answer was grounded on.
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One grounding source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web page the chunk came from, if any.
    #[serde(default)]
    pub web: Option<WebSource>,
}

/// A cited web page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// Page URI.
    #[serde(default)]
    pub uri: Option<String>,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Extracts one reference per usable chunk: its URI, or its title when the
/// URI is missing. Chunks with neither are skipped.
#[must_use]
pub fn references_from_grounding(metadata: &GroundingMetadata) -> Vec<String> {
    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| non_blank(web.uri.as_ref()).or_else(|| non_blank(web.title.as_ref())))
        .map(str::to_string)
        .collect()
}

/// Fills empty course references from grounding citations.
///
/// Returns `true` if the references were replaced.
pub fn apply_reference_fallback(
    course: &mut CourseData,
    metadata: Option<&GroundingMetadata>,
) -> bool {
    if course.references.iter().any(|r| !r.trim().is_empty()) {
        return false;
    }
    let Some(metadata) = metadata else {
        return false;
    };
    let references = references_from_grounding(metadata);
    if references.is_empty() {
        return false;
    }
    warn!(
        count = references.len(),
        "Course had no references, using grounding citations"
    );
    course.references = references;
    true
}
