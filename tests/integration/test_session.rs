//! End-to-end tests: generate through the mock endpoint, then navigate,
//! answer quizzes and export through the session.

mod common;

use axum::http::StatusCode;
use common::{course_payload, full_course_payload, spawn_course_mock, spawn_mock, user_input};
use profesor_core::{
    CourseData, LessonKey, NavEvent, Position, ProfesorError, QuizId, Session,
    GENERATION_FAILED_MESSAGE,
};
use profesor_render::{export_course, MarkdownRenderer};

#[tokio::test]
async fn test_walk_through_generated_course() {
    let mock = spawn_course_mock(&course_payload(&[3, 4, 3, 3, 3, 4], &["Libro"]), None).await;
    let client = mock.client();
    let mut session = Session::new();

    session
        .create_course(&client, &user_input())
        .await
        .expect("Generation failed");
    assert!(!session.is_loading());
    assert_eq!(
        session.position(),
        Some(Position::Lesson {
            key: LessonKey::FIRST
        })
    );

    let total = session
        .active()
        .expect("Course loaded")
        .course()
        .total_lessons();
    assert_eq!(total, 20);

    let mut last_progress = 0;
    for _ in 0..total {
        session.navigate(NavEvent::Next).expect("Next failed");
        let progress = session.progress_percent();
        assert!(progress >= last_progress, "progress went backwards");
        last_progress = progress;
    }
    assert_eq!(session.position(), Some(Position::FinalAssessment));
    assert_eq!(session.progress_percent(), 100);

    assert!(matches!(
        session.navigate(NavEvent::Next),
        Err(ProfesorError::InvalidStateTransition { .. })
    ));
    assert_eq!(
        session.navigate(NavEvent::Prev).expect("Prev failed"),
        Position::Lesson {
            key: LessonKey::new(5, 3)
        }
    );
}

#[tokio::test]
async fn test_jump_then_answer_and_reveal() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    let mut session = Session::new();
    session
        .create_course(&mock.client(), &user_input())
        .await
        .expect("Generation failed");

    let key = LessonKey::new(2, 1);
    session
        .navigate(NavEvent::JumpTo(key))
        .expect("Jump failed");
    assert_eq!(session.progress_percent(), 0);

    let id = QuizId::Lesson(key);
    session.select_answer(id, 0, 0).expect("Select failed");
    session.select_answer(id, 1, 3).expect("Select failed");
    assert!(!session.quiz(id).expect("Quiz exists").can_reveal());
    assert!(matches!(
        session.reveal(id),
        Err(ProfesorError::QuizIncomplete {
            answered: 2,
            total: 3
        })
    ));

    session.select_answer(id, 2, 2).expect("Select failed");
    assert!(session.quiz(id).expect("Quiz exists").can_reveal());
    session.reveal(id).expect("Reveal failed");

    let view = MarkdownRenderer::new(session.active().expect("Course loaded")).current_view();
    assert!(view.contains("Has completado el test. Revisa tus respuestas arriba."));
    assert!(view.contains(" ✔  A) Opción A"));
    assert!(matches!(
        session.select_answer(id, 0, 1),
        Err(ProfesorError::QuizLocked)
    ));
}

#[tokio::test]
async fn test_failed_generation_returns_to_form() {
    let mock = spawn_mock(StatusCode::SERVICE_UNAVAILABLE, "{}".to_string()).await;
    let mut session = Session::new();

    let err = session
        .create_course(&mock.client(), &user_input())
        .await
        .expect_err("Should fail");

    assert!(err.is_generation_failure());
    assert!(!session.is_loading());
    assert!(session.active().is_none());
    assert_eq!(session.last_error(), Some(GENERATION_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_reset_and_generate_again() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    let client = mock.client();
    let mut session = Session::new();

    session
        .create_course(&client, &user_input())
        .await
        .expect("Generation failed");
    session.navigate(NavEvent::Next).expect("Next failed");
    session.reset();
    assert!(session.active().is_none());

    session
        .create_course(&client, &user_input())
        .await
        .expect("Generation failed");
    assert_eq!(session.progress_percent(), 0);
    assert_eq!(mock.requests().await.len(), 2);
}

#[tokio::test]
async fn test_exported_course_loads_back() {
    let mock = spawn_course_mock(&full_course_payload(), None).await;
    let mut session = Session::new();
    session
        .create_course(&mock.client(), &user_input())
        .await
        .expect("Generation failed");
    let course = session.active().expect("Course loaded").course().clone();

    let dir = std::env::temp_dir().join(format!("profesor-it-export-{}", std::process::id()));
    let files = export_course(&course, &dir).expect("Export failed");

    let markdown = std::fs::read_to_string(&files.markdown).expect("Markdown missing");
    assert!(markdown.starts_with("# Jardinería en balcones"));
    assert!(markdown.contains("## Fuentes y Referencias"));

    let loaded = CourseData::load(&files.json).expect("JSON missing");
    assert_eq!(loaded, course);

    let mut reopened = Session::new();
    reopened.load_course(loaded).expect("Load failed");
    assert_eq!(reopened.progress_percent(), 0);

    std::fs::remove_dir_all(&dir).expect("Cleanup failed");
}
