//! HTTP client for `models/{model}:generateContent`.

use std::time::Duration;

use profesor_core::{
    validate_and_normalize, CardinalityPolicy, Config, CourseData, CourseGenerator, UserInput,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{GeminiError, Result};
use crate::grounding::{apply_reference_fallback, GroundingMetadata};
use crate::prompt::build_prompt;
use crate::schema::course_response_schema;

/// Longest slice of an error body kept in [`GeminiError::HttpStatus`].
const MAX_ERROR_BODY: usize = 512;

/// Generates courses with the Gemini API.
///
/// Each call sends exactly one request; there are no retries.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    grounding: bool,
    policy: CardinalityPolicy,
}

impl GeminiClient {
    /// Builds a client from configuration, reading the API key from the
    /// environment variable named by `apiKeyEnv`.
    pub fn from_config(config: &Config) -> profesor_core::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::with_api_key(config, api_key)?)
    }

    /// Builds a client from configuration with an explicit API key.
    pub fn with_api_key(config: &Config, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            grounding: config.grounding,
            policy: config.cardinality,
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Requests a course for `input` and validates the result.
    pub async fn generate_course(&self, input: &UserInput) -> Result<CourseData> {
        input.validate()?;

        let request = GenerateContentRequest::new(build_prompt(input), self.grounding);
        info!(
            model = %self.model,
            topic = %input.topic,
            grounding = self.grounding,
            "Requesting course generation"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(GeminiError::HttpStatus { status, body });
        }

        let body = response.text().await?;
        course_from_body(&body, self.policy)
    }
}

impl CourseGenerator for GeminiClient {
    async fn generate(&self, input: &UserInput) -> profesor_core::Result<CourseData> {
        Ok(self.generate_course(input).await?)
    }
}

/// Decodes a raw `generateContent` response body into a validated course.
pub(crate) fn course_from_body(body: &str, policy: CardinalityPolicy) -> Result<CourseData> {
    if body.trim().is_empty() {
        return Err(GeminiError::EmptyResponse("empty body"));
    }
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    course_from_response(response, policy)
}

/// Turns a decoded response into a validated course.
pub(crate) fn course_from_response(
    response: GenerateContentResponse,
    policy: CardinalityPolicy,
) -> Result<CourseData> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GeminiError::EmptyResponse("no candidates"))?;

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    let json = strip_code_fence(&text);
    if json.is_empty() {
        return Err(GeminiError::EmptyResponse("candidate has no text"));
    }
    debug!(bytes = json.len(), "Received course payload");

    let mut course: CourseData = serde_json::from_str(json)?;
    apply_reference_fallback(&mut course, candidate.grounding_metadata.as_ref());

    let (course, _warnings) = validate_and_normalize(course, policy)?;
    Ok(course)
}

/// Removes a surrounding Markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(prompt: String, grounding: bool) -> Self {
        let tools = if grounding {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: course_response_schema(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
