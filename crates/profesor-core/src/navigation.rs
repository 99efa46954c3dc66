//! Navigation state machine for a loaded course.
//!
//! The learner is always either on a lesson or on the final assessment,
//! modelled by [`Position`]. Moving between them is a pure function,
//! [`step`], which [`Navigator`] commits together with the completion map.
//!
//! From `Lesson(u, l)`:
//! - `Next` marks the lesson complete and advances to the next lesson in the
//!   unit, the first lesson of the next unit, or the final assessment.
//! - `Prev` goes back one lesson, crossing unit boundaries; it is a no-op on
//!   the very first lesson.
//! - `JumpTo` moves directly to any existing lesson without marking anything.
//! - `ShowFinal` moves to the final assessment.
//!
//! From `FinalAssessment`, `Prev` returns to the last lesson of the last unit
//! and `Next` is not defined.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::course::{CourseShape, LessonKey};
use crate::error::{ProfesorError, Result};

// ============================================================================
// Position and NavEvent
// ============================================================================

/// Where the learner currently is inside a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum Position {
    /// Reading a lesson.
    Lesson {
        /// The lesson being read.
        key: LessonKey,
    },
    /// Taking the final assessment.
    FinalAssessment,
}

impl Position {
    /// The position a freshly loaded course starts at.
    pub const START: Self = Self::Lesson {
        key: LessonKey::FIRST,
    };

    /// Returns the lesson being read, if any.
    #[must_use]
    pub const fn lesson(&self) -> Option<LessonKey> {
        match self {
            Self::Lesson { key } => Some(*key),
            Self::FinalAssessment => None,
        }
    }

    /// Returns `true` on the final assessment.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::FinalAssessment)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lesson { key } => write!(f, "lesson {key}"),
            Self::FinalAssessment => write!(f, "final_assessment"),
        }
    }
}

/// A navigation request coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Finish the current lesson and move forward.
    Next,
    /// Move back one lesson.
    Prev,
    /// Open a lesson from the sidebar.
    JumpTo(LessonKey),
    /// Open the final assessment.
    ShowFinal,
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::Prev => write!(f, "prev"),
            Self::JumpTo(key) => write!(f, "jump to {key}"),
            Self::ShowFinal => write!(f, "show final"),
        }
    }
}

/// The outcome of a transition: where to go and what to mark complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The new position.
    pub position: Position,
    /// Lesson to add to the completion map, if any.
    pub completes: Option<LessonKey>,
}

impl Step {
    const fn to(position: Position) -> Self {
        Self {
            position,
            completes: None,
        }
    }
}

/// Computes the transition for `event` from `position` in a course of `shape`.
///
/// This function has no side effects; an error leaves the caller's state as
/// it was.
///
/// # Examples
///
/// ```
/// use profesor_core::{step, CourseShape, LessonKey, NavEvent, Position};
///
/// let shape = CourseShape::new(vec![2, 1]);
/// let at_end = Position::Lesson { key: LessonKey::new(1, 0) };
///
/// let next = step(&shape, at_end, NavEvent::Next).unwrap();
/// assert_eq!(next.position, Position::FinalAssessment);
/// assert_eq!(next.completes, Some(LessonKey::new(1, 0)));
///
/// let back = step(&shape, next.position, NavEvent::Prev).unwrap();
/// assert_eq!(back.position, at_end);
/// ```
pub fn step(shape: &CourseShape, position: Position, event: NavEvent) -> Result<Step> {
    match (position, event) {
        (_, NavEvent::JumpTo(key)) => {
            if shape.contains(key) {
                Ok(Step::to(Position::Lesson { key }))
            } else {
                Err(ProfesorError::LessonOutOfRange {
                    unit: key.unit,
                    lesson: key.lesson,
                })
            }
        }
        (_, NavEvent::ShowFinal) => Ok(Step::to(Position::FinalAssessment)),
        (Position::FinalAssessment, NavEvent::Next) => Err(ProfesorError::invalid_transition(
            position,
            "next lesson (the final assessment is the last view)",
        )),
        (Position::FinalAssessment, NavEvent::Prev) => shape
            .last_lesson()
            .map(|key| Step::to(Position::Lesson { key }))
            .ok_or_else(|| ProfesorError::invalid_transition(position, "previous lesson")),
        (Position::Lesson { key }, NavEvent::Next) => {
            let position = if key.lesson + 1 < shape.lessons_in(key.unit) {
                Position::Lesson {
                    key: LessonKey::new(key.unit, key.lesson + 1),
                }
            } else if key.unit + 1 < shape.unit_count() {
                Position::Lesson {
                    key: LessonKey::new(key.unit + 1, 0),
                }
            } else {
                Position::FinalAssessment
            };
            Ok(Step {
                position,
                completes: Some(key),
            })
        }
        (Position::Lesson { key }, NavEvent::Prev) => {
            let position = if key.lesson > 0 {
                Position::Lesson {
                    key: LessonKey::new(key.unit, key.lesson - 1),
                }
            } else if key.unit > 0 {
                let unit = key.unit - 1;
                let lesson = shape.lessons_in(unit).saturating_sub(1);
                Position::Lesson {
                    key: LessonKey::new(unit, lesson),
                }
            } else {
                position
            };
            Ok(Step::to(position))
        }
    }
}

// ============================================================================
// CompletionMap
// ============================================================================

/// The set of lessons the learner has advanced past.
///
/// Entries are only ever added; marking an already completed lesson changes
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMap {
    completed: BTreeSet<LessonKey>,
}

impl CompletionMap {
    /// Creates an empty completion map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a lesson complete. Returns `true` if it was not already marked.
    pub fn mark(&mut self, key: LessonKey) -> bool {
        self.completed.insert(key)
    }

    /// Returns `true` if the lesson is marked complete.
    #[must_use]
    pub fn is_completed(&self, key: LessonKey) -> bool {
        self.completed.contains(&key)
    }

    /// Number of completed lessons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Returns `true` if nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Percentage of `total` represented by `completed`, rounded half up.
///
/// A course without lessons is 0% complete.
///
/// # Examples
///
/// ```
/// use profesor_core::progress_percent;
///
/// assert_eq!(progress_percent(0, 18), 0);
/// assert_eq!(progress_percent(1, 8), 13); // 12.5 rounds up
/// assert_eq!(progress_percent(18, 18), 100);
/// assert_eq!(progress_percent(0, 0), 0);
/// ```
#[must_use]
pub const fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = if completed > total { total } else { completed };
    #[allow(clippy::cast_possible_truncation)]
    let percent = ((200 * completed + total) / (2 * total)) as u8;
    percent
}

// ============================================================================
// Navigator
// ============================================================================

/// Position plus completion map for one loaded course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    shape: CourseShape,
    position: Position,
    completed: CompletionMap,
}

impl Navigator {
    /// Creates a navigator at the first lesson with nothing completed.
    #[must_use]
    pub fn new(shape: CourseShape) -> Self {
        Self {
            shape,
            position: Position::START,
            completed: CompletionMap::new(),
        }
    }

    /// Applies a navigation event.
    ///
    /// On error the position and completion map are left unchanged.
    pub fn apply(&mut self, event: NavEvent) -> Result<Position> {
        let step = step(&self.shape, self.position, event)?;
        if let Some(key) = step.completes {
            if self.completed.mark(key) {
                debug!(lesson = %key, "Lesson completed");
            }
        }
        debug!(from = %self.position, to = %step.position, %event, "Navigation");
        self.position = step.position;
        Ok(self.position)
    }

    /// The current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The course shape this navigator walks.
    #[must_use]
    pub const fn shape(&self) -> &CourseShape {
        &self.shape
    }

    /// The completion map.
    #[must_use]
    pub const fn completed(&self) -> &CompletionMap {
        &self.completed
    }

    /// Progress percentage over every lesson of the course.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.completed.len(), self.shape.total_lessons())
    }

    /// Returns `false` only on the very first lesson.
    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        self.position != Position::START
    }

    /// Returns `false` on the final assessment.
    #[must_use]
    pub const fn can_go_next(&self) -> bool {
        !self.position.is_final()
    }
}
