//! The seam between the session and whatever produces courses.

use crate::course::{CourseData, UserInput};
use crate::error::Result;

/// Produces a course from a learner's request.
///
/// Implementations make exactly one upstream call per invocation and never
/// retry; a failure means no course at all.
#[allow(async_fn_in_trait)]
pub trait CourseGenerator {
    /// Generates a validated course for `input`.
    async fn generate(&self, input: &UserInput) -> Result<CourseData>;
}
