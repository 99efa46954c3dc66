//! Integration tests for course generation against a mock Gemini endpoint.
//!
//! These tests exercise the real HTTP client: request shape, status mapping,
//! payload parsing, the references fallback and validation.

mod common;

use axum::http::StatusCode;
use common::{
    candidate_response, course_payload, full_course_payload, spawn_course_mock, spawn_mock,
    user_input,
};
use profesor_core::{
    CardinalityPolicy, Config, CourseGenerator, GenerationErrorKind, ProfesorError,
    GENERATION_FAILED_MESSAGE,
};
use profesor_gemini::GeminiClient;
use serde_json::json;

fn generation_kind(err: &ProfesorError) -> Option<GenerationErrorKind> {
    match err {
        ProfesorError::Generation { kind, .. } => Some(*kind),
        _ => None,
    }
}

// ============================================================================
// Successful generation
// ============================================================================

#[tokio::test]
async fn test_generates_course_from_structured_response() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;

    let course = mock
        .client()
        .generate(&user_input())
        .await
        .expect("Generation failed");

    assert_eq!(course.title, "Jardinería en balcones");
    assert_eq!(course.units.len(), 6);
    assert_eq!(course.total_lessons(), 18);
    assert!(course
        .units
        .iter()
        .all(|unit| unit.lessons.iter().all(|lesson| lesson.quiz.len() == 3)));
    assert_eq!(course.final_assessment.len(), 8);
    assert_eq!(course.references, ["Manual del huerto urbano"]);
}

#[tokio::test]
async fn test_request_carries_key_prompt_tools_and_schema() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    mock.client()
        .generate(&user_input())
        .await
        .expect("Generation failed");

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert_eq!(request.call, "gemini-2.5-flash:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let prompt = request.body["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("Prompt missing");
    for expected in [
        "Tema: Jardinería",
        "Nivel: Principiante",
        "Perfil del alumno: Vivo en un piso con balcón",
        "Objetivo: Cultivar mis propias hierbas",
        "Tiempo disponible: 30 minutos al día",
        "Formato: Lecturas + ejercicios",
    ] {
        assert!(prompt.contains(expected), "prompt lacks {expected:?}");
    }

    assert_eq!(request.body["tools"], json!([{ "google_search": {} }]));
    let generation_config = &request.body["generationConfig"];
    assert_eq!(generation_config["responseMimeType"], "application/json");
    assert_eq!(
        generation_config["responseSchema"]["required"][4],
        "units"
    );
}

#[tokio::test]
async fn test_grounding_disabled_sends_no_tools() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    let client = mock.client_with(Config {
        grounding: false,
        ..Config::default()
    });
    client
        .generate(&user_input())
        .await
        .expect("Generation failed");

    let requests = mock.requests().await;
    assert!(requests[0].body.get("tools").is_none());
}

#[tokio::test]
async fn test_empty_references_filled_from_grounding_chunks() {
    let payload = course_payload(&[3, 3, 3, 3, 3, 3], &[]);
    let grounding = json!({
        "groundingChunks": [
            { "web": { "uri": "https://huerto.example/guia", "title": "Guía" } },
            { "web": { "title": "Manual sin enlace" } },
            { "web": {} },
            {}
        ]
    });
    let mock = spawn_course_mock(&payload, Some(grounding)).await;

    let course = mock
        .client()
        .generate(&user_input())
        .await
        .expect("Generation failed");

    assert_eq!(
        course.references,
        ["https://huerto.example/guia", "Manual sin enlace"]
    );
}

#[tokio::test]
async fn test_fenced_json_is_accepted() {
    let text = format!("```json\n{}\n```", full_course_payload());
    let mock = spawn_mock(StatusCode::OK, candidate_response(&text, None).to_string()).await;

    let course = mock.client().generate(&user_input()).await;
    assert!(course.is_ok());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_maps_to_server_kind() {
    let mock = spawn_mock(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "code": 500, "message": "Internal error" } }).to_string(),
    )
    .await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert_eq!(generation_kind(&err), Some(GenerationErrorKind::Server));
    assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    assert_eq!(mock.requests().await.len(), 1, "no retry expected");
}

#[tokio::test]
async fn test_auth_and_rate_limit_statuses() {
    for (status, kind) in [
        (StatusCode::UNAUTHORIZED, GenerationErrorKind::Authentication),
        (StatusCode::FORBIDDEN, GenerationErrorKind::Authentication),
        (StatusCode::TOO_MANY_REQUESTS, GenerationErrorKind::RateLimit),
        (StatusCode::BAD_REQUEST, GenerationErrorKind::Other),
    ] {
        let mock = spawn_mock(status, "{}".to_string()).await;
        let err = mock
            .client()
            .generate(&user_input())
            .await
            .expect_err("Should fail");
        assert_eq!(generation_kind(&err), Some(kind), "status {status}");
    }
}

#[tokio::test]
async fn test_non_json_text_is_parse_failure() {
    let body = candidate_response("Aquí tienes tu curso: ...", None).to_string();
    let mock = spawn_mock(StatusCode::OK, body).await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert_eq!(generation_kind(&err), Some(GenerationErrorKind::Parse));
    assert!(err.is_generation_failure());
}

#[tokio::test]
async fn test_undecodable_envelope_is_parse_failure() {
    let mock = spawn_mock(StatusCode::OK, "not json at all".to_string()).await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert_eq!(generation_kind(&err), Some(GenerationErrorKind::Parse));
}

#[tokio::test]
async fn test_empty_body_is_empty_response() {
    let mock = spawn_mock(StatusCode::OK, String::new()).await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert_eq!(
        generation_kind(&err),
        Some(GenerationErrorKind::EmptyResponse)
    );
    assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let mock = spawn_mock(StatusCode::OK, json!({ "candidates": [] }).to_string()).await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert_eq!(
        generation_kind(&err),
        Some(GenerationErrorKind::EmptyResponse)
    );
}

#[tokio::test]
async fn test_out_of_range_answer_is_malformed() {
    let mut payload = full_course_payload();
    payload["units"][1]["lessons"][0]["quiz"][2]["correctOptionIndex"] = json!(9);
    let mock = spawn_course_mock(&payload, None).await;

    let err = mock
        .client()
        .generate(&user_input())
        .await
        .expect_err("Should fail");

    assert!(matches!(err, ProfesorError::MalformedCourse { .. }));
    assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_strict_policy_rejects_short_course() {
    let payload = course_payload(&[3, 3], &["Libro"]);
    let mock = spawn_course_mock(&payload, None).await;

    let strict = mock.client_with(Config {
        cardinality: CardinalityPolicy::Strict,
        ..Config::default()
    });
    let err = strict
        .generate(&user_input())
        .await
        .expect_err("Should fail");
    assert!(matches!(err, ProfesorError::MalformedCourse { .. }));

    let lenient = mock.client().generate(&user_input()).await;
    assert_eq!(lenient.expect("Warn policy accepts").units.len(), 2);
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    let mut input = user_input();
    input.time_available = "   ".to_string();

    let err = mock
        .client()
        .generate(&input)
        .await
        .expect_err("Should fail");

    assert!(matches!(
        err,
        ProfesorError::MissingField {
            field: "timeAvailable"
        }
    ));
    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");
    drop(listener);

    let config = Config {
        api_base_url: format!("http://{addr}/v1beta"),
        request_timeout_secs: Some(5),
        ..Config::default()
    };
    let client = GeminiClient::with_api_key(&config, "test-key").expect("Failed to build client");

    let err = client
        .generate(&user_input())
        .await
        .expect_err("Should fail");
    assert_eq!(generation_kind(&err), Some(GenerationErrorKind::Network));
}

#[test]
fn test_missing_api_key_is_fatal() {
    let config = Config {
        api_key_env: "PROFESOR_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..Config::default()
    };
    let err = GeminiClient::from_config(&config).expect_err("Should fail");
    assert!(matches!(err, ProfesorError::MissingApiKey { .. }));
    assert!(err.is_fatal());
}
