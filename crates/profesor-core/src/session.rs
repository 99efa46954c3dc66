//! Session controller.
//!
//! A [`Session`] owns everything the learner's current visit needs: whether
//! a generation request is pending, the loaded course with its navigation
//! and quiz state, and the last message to show. All changes go through the
//! methods here; the presentation layer only reads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::course::{CourseData, LessonKey, QuizQuestion, UserInput};
use crate::error::{ProfesorError, Result};
use crate::generator::CourseGenerator;
use crate::navigation::{NavEvent, Navigator, Position};
use crate::quiz::{QuizId, QuizState};
use crate::validation::{validate, validate_and_normalize, CardinalityPolicy};

/// Whether a generation request is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// No request pending; the form accepts submissions.
    #[default]
    Idle,
    /// A request was sent and has not completed.
    InFlight,
}

/// A loaded course together with the learner's progress through it.
///
/// Course, navigation and quiz state are created and discarded together.
#[derive(Debug, Clone)]
pub struct ActiveCourse {
    course: CourseData,
    navigator: Navigator,
    quizzes: BTreeMap<QuizId, QuizState>,
    loaded_at: DateTime<Utc>,
}

impl ActiveCourse {
    /// Starts a course at its first lesson with no progress.
    #[must_use]
    pub fn new(course: CourseData) -> Self {
        let navigator = Navigator::new(course.shape());
        Self {
            course,
            navigator,
            quizzes: BTreeMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// The course content.
    #[must_use]
    pub const fn course(&self) -> &CourseData {
        &self.course
    }

    /// Navigation position and completion map.
    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// When this course was loaded into the session.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// The current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.navigator.position()
    }

    /// The quiz shown at the current position.
    #[must_use]
    pub fn current_quiz_id(&self) -> QuizId {
        match self.position() {
            Position::Lesson { key } => QuizId::Lesson(key),
            Position::FinalAssessment => QuizId::Final,
        }
    }

    /// The questions of a quiz, if it exists in this course.
    #[must_use]
    pub fn questions(&self, id: QuizId) -> Option<&[QuizQuestion]> {
        match id {
            QuizId::Lesson(key) => self.course.lesson(key).map(|lesson| lesson.quiz.as_slice()),
            QuizId::Final => Some(self.course.final_assessment.as_slice()),
        }
    }

    /// The state of a quiz; untouched quizzes read as fresh.
    #[must_use]
    pub fn quiz(&self, id: QuizId) -> Option<QuizState> {
        if let Some(state) = self.quizzes.get(&id) {
            return Some(state.clone());
        }
        self.questions(id).map(QuizState::new)
    }

    fn quiz_mut(&mut self, id: QuizId) -> Result<&mut QuizState> {
        if !self.quizzes.contains_key(&id) {
            let state = self
                .questions(id)
                .map(QuizState::new)
                .ok_or_else(|| ProfesorError::UnknownQuiz(id.to_string()))?;
            self.quizzes.insert(id, state);
        }
        self.quizzes
            .get_mut(&id)
            .ok_or_else(|| ProfesorError::UnknownQuiz(id.to_string()))
    }
}

/// Session-local state for one learner.
#[derive(Debug, Clone, Default)]
pub struct Session {
    request: RequestState,
    active: Option<ActiveCourse>,
    last_error: Option<String>,
}

impl Session {
    /// Creates a session at home with no course.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a generation request is pending.
    #[must_use]
    pub const fn request_state(&self) -> RequestState {
        self.request
    }

    /// Returns `true` while a generation request is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.request == RequestState::InFlight
    }

    /// The loaded course, or `None` at home.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveCourse> {
        self.active.as_ref()
    }

    /// The message to show after a failed generation, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Accepts a form submission and marks a request as in flight.
    ///
    /// Fails without changing anything if a field is blank or another
    /// request is pending; in those cases no request must be sent.
    pub fn begin_generation(&mut self, input: &UserInput) -> Result<()> {
        if self.is_loading() {
            return Err(ProfesorError::RequestInFlight);
        }
        input.validate()?;
        self.last_error = None;
        self.request = RequestState::InFlight;
        info!(topic = %input.topic, level = %input.level, "Course requested");
        Ok(())
    }

    /// Applies the outcome of the pending request.
    ///
    /// Success replaces any previous course with the new one at its first
    /// lesson. Failure keeps the session as it was before submitting and
    /// records the generic message for the learner.
    pub fn finish_generation(&mut self, result: Result<CourseData>) {
        if let Err(e) = self.complete(result) {
            self.last_error = Some(e.user_message());
        }
    }

    /// Runs one generation request from submission to completion.
    ///
    /// Returns the validation or re-entry error when nothing was sent, and
    /// the generation error when the request failed (its learner-facing
    /// message is also kept in [`Session::last_error`]).
    pub async fn create_course<G: CourseGenerator>(
        &mut self,
        generator: &G,
        input: &UserInput,
    ) -> Result<()> {
        self.begin_generation(input)?;
        let result = generator.generate(input).await;
        self.complete(result).map_err(|e| {
            self.last_error = Some(e.user_message());
            e
        })
    }

    fn complete(&mut self, result: Result<CourseData>) -> Result<()> {
        self.request = RequestState::Idle;
        // Structural invariants hold for every installed course, whatever
        // generator produced it.
        let result =
            result.and_then(|course| validate(&course, CardinalityPolicy::Warn).map(|_| course));
        match result {
            Ok(course) => {
                info!(
                    title = %course.title,
                    units = course.units.len(),
                    lessons = course.total_lessons(),
                    "Course ready"
                );
                self.active = Some(ActiveCourse::new(course));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error generating course");
                Err(e)
            }
        }
    }

    /// Installs an already generated course, e.g. one loaded from disk.
    pub fn load_course(&mut self, course: CourseData) -> Result<()> {
        if self.is_loading() {
            return Err(ProfesorError::RequestInFlight);
        }
        let (course, _) = validate_and_normalize(course, CardinalityPolicy::Warn)?;
        self.last_error = None;
        self.active = Some(ActiveCourse::new(course));
        Ok(())
    }

    /// Discards the course and all progress, returning to the form.
    pub fn reset(&mut self) {
        if self.active.take().is_some() {
            info!("Course session reset");
        }
        self.last_error = None;
    }

    /// Applies a navigation event to the loaded course.
    pub fn navigate(&mut self, event: NavEvent) -> Result<Position> {
        let active = self.active.as_mut().ok_or(ProfesorError::NoCourseLoaded)?;
        active.navigator.apply(event)
    }

    /// The current position, or `None` at home.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.active.as_ref().map(ActiveCourse::position)
    }

    /// Progress over the loaded course, or 0 at home.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.active
            .as_ref()
            .map_or(0, |active| active.navigator.progress_percent())
    }

    /// Returns `true` if the lesson is marked complete.
    #[must_use]
    pub fn is_completed(&self, key: LessonKey) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.navigator.completed().is_completed(key))
    }

    /// The state of a quiz in the loaded course.
    pub fn quiz(&self, id: QuizId) -> Result<QuizState> {
        let active = self.active.as_ref().ok_or(ProfesorError::NoCourseLoaded)?;
        active
            .quiz(id)
            .ok_or_else(|| ProfesorError::UnknownQuiz(id.to_string()))
    }

    /// Selects an answer in a quiz.
    pub fn select_answer(&mut self, id: QuizId, question: usize, option: usize) -> Result<()> {
        let active = self.active.as_mut().ok_or(ProfesorError::NoCourseLoaded)?;
        active.quiz_mut(id)?.select(question, option)
    }

    /// Reveals a quiz's results; requires every question answered.
    pub fn reveal(&mut self, id: QuizId) -> Result<()> {
        let active = self.active.as_mut().ok_or(ProfesorError::NoCourseLoaded)?;
        active.quiz_mut(id)?.reveal()
    }
}
