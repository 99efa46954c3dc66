//! Gemini course generation
//!
//! Implements [`profesor_core::CourseGenerator`] on top of the Gemini
//! `generateContent` REST endpoint: one grounded, schema-constrained request
//! per course, followed by parsing, the references fallback and validation.
//!
//! # Example
//!
//! ```no_run
//! use profesor_core::{Config, CourseGenerator, UserInput};
//! use profesor_gemini::GeminiClient;
//!
//! # async fn example(input: UserInput) -> profesor_core::Result<()> {
//! let client = GeminiClient::from_config(&Config::load()?)?;
//! let course = client.generate(&input).await?;
//! println!("{}", course.title);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod error;
pub mod grounding;
pub mod prompt;
pub mod schema;

pub use client::GeminiClient;
pub use error::{kind_for_status, GeminiError, Result};
pub use grounding::{apply_reference_fallback, references_from_grounding, GroundingMetadata};
pub use prompt::build_prompt;
pub use schema::course_response_schema;
