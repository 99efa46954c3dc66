//! ProfesorIA core
//!
//! Course data model, validation, navigation, quiz state and the session
//! controller that ties them together. Nothing here talks to the network;
//! course generation is abstracted behind [`CourseGenerator`].

pub mod config;
pub mod course;
pub mod error;
pub mod generator;
pub mod navigation;
pub mod quiz;
pub mod session;
pub mod validation;

pub use config::Config;
pub use course::{
    CourseData, CourseFormat, CourseLevel, CourseShape, FinalProject, LessonContent, LessonKey,
    QuizQuestion, Unit, UserInput,
};
pub use error::{GenerationErrorKind, ProfesorError, Result, GENERATION_FAILED_MESSAGE};
pub use generator::CourseGenerator;
pub use navigation::{progress_percent, step, CompletionMap, NavEvent, Navigator, Position, Step};
pub use quiz::{OptionMark, QuizId, QuizPhase, QuizState};
pub use session::{ActiveCourse, RequestState, Session};
pub use validation::{
    validate_and_normalize, CardinalityPolicy, CardinalityWarning, FINAL_ASSESSMENT_QUESTIONS,
    FINAL_PROJECTS, LESSONS_PER_UNIT, QUESTIONS_PER_LESSON, UNITS_PER_COURSE,
};
