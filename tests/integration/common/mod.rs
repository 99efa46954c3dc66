//! Mock Gemini endpoint and course fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use profesor_core::{Config, CourseFormat, CourseLevel, UserInput};
use profesor_gemini::GeminiClient;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// A request received by the mock endpoint.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The `{model}:{method}` path segment.
    pub call: String,
    /// Value of the `x-goog-api-key` header.
    pub api_key: Option<String>,
    /// The JSON body.
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running mock server.
pub struct MockGemini {
    /// Base URL to put in `Config::api_base_url`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockGemini {
    /// Requests received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// A client pointed at this server with a fixed API key.
    pub fn client(&self) -> GeminiClient {
        self.client_with(Config::default())
    }

    /// A client built from `config` with its base URL replaced.
    pub fn client_with(&self, config: Config) -> GeminiClient {
        let config = Config {
            api_base_url: self.base_url.clone(),
            ..config
        };
        GeminiClient::with_api_key(&config, "test-key").expect("Failed to build client")
    }
}

async fn generate_content(
    State(state): State<MockState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().await.push(RecordedRequest {
        call,
        api_key,
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}

/// Spawns a mock that answers every request with `status` and `body`.
pub async fn spawn_mock(status: StatusCode, body: String) -> MockGemini {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body,
        requests: Arc::clone(&requests),
    };
    let router = Router::new()
        .route("/v1beta/models/:call", post(generate_content))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    MockGemini {
        base_url: format!("http://{addr}/v1beta"),
        requests,
        _handle: handle,
    }
}

/// Spawns a mock that returns `course` as the first candidate's text.
pub async fn spawn_course_mock(course: &Value, grounding: Option<Value>) -> MockGemini {
    spawn_mock(StatusCode::OK, candidate_response(&course.to_string(), grounding).to_string()).await
}

/// Wraps `text` in a `generateContent` response envelope.
pub fn candidate_response(text: &str, grounding: Option<Value>) -> Value {
    let mut candidate = json!({
        "content": { "role": "model", "parts": [{ "text": text }] },
        "finishReason": "STOP"
    });
    if let Some(metadata) = grounding {
        candidate["groundingMetadata"] = metadata;
    }
    json!({ "candidates": [candidate] })
}

fn question(n: usize) -> Value {
    json!({
        "question": format!("¿Pregunta {}?", n + 1),
        "options": ["Opción A", "Opción B", "Opción C", "Opción D"],
        "correctOptionIndex": n % 4
    })
}

/// A course payload with `lessons_per_unit[i]` lessons in unit `i`.
pub fn course_payload(lessons_per_unit: &[usize], references: &[&str]) -> Value {
    let units: Vec<Value> = lessons_per_unit
        .iter()
        .enumerate()
        .map(|(u, lessons)| {
            json!({
                "title": format!("Unidad {}", u + 1),
                "summary": format!("Resumen de la unidad {}", u + 1),
                "lessons": (0..*lessons).map(|l| json!({
                    "title": format!("Lección {}.{}", u + 1, l + 1),
                    "keyIdea": "Una idea clave explicada en varias frases.",
                    "appliedExample": "Un ejemplo del mundo real.",
                    "practicalActivity": "Una tarea práctica.",
                    "quiz": (0..3).map(question).collect::<Vec<_>>()
                })).collect::<Vec<_>>()
            })
        })
        .collect();

    json!({
        "title": "Jardinería en balcones",
        "subtitle": "Aprende a cultivar en espacios pequeños.",
        "tags": ["Principiante", "4 semanas", "Vecinos de ciudad"],
        "objectives": ["Elegir plantas", "Regar bien", "Cosechar"],
        "units": units,
        "finalAssessment": (0..8).map(question).collect::<Vec<_>>(),
        "finalProjects": [
            { "title": "Mi balcón verde", "description": "Planifica tu balcón." },
            { "title": "Diario de cultivo", "description": "Registra cuatro semanas." }
        ],
        "references": references
    })
}

/// A complete six-unit course with three lessons per unit.
pub fn full_course_payload() -> Value {
    course_payload(&[3, 3, 3, 3, 3, 3], &["Manual del huerto urbano"])
}

/// A complete form submission.
pub fn user_input() -> UserInput {
    UserInput {
        topic: "Jardinería".to_string(),
        level: CourseLevel::Principiante,
        profile: "Vivo en un piso con balcón".to_string(),
        goal: "Cultivar mis propias hierbas".to_string(),
        time_available: "30 minutos al día".to_string(),
        format: CourseFormat::LecturasEjercicios,
    }
}
