//! Quiz interaction state.
//!
//! Each quiz (one per lesson plus the final assessment) is answered
//! independently. Selections can change freely until the results are
//! revealed; after that the quiz is locked for the rest of the session.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::course::{LessonKey, QuizQuestion};
use crate::error::{ProfesorError, Result};

/// Identifies a quiz within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizId {
    /// The quick test at the end of a lesson.
    Lesson(LessonKey),
    /// The final assessment.
    Final,
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lesson(key) => write!(f, "lesson {key} quiz"),
            Self::Final => write!(f, "final assessment"),
        }
    }
}

/// How an option should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMark {
    /// Chosen, results not yet revealed.
    Selected,
    /// Not chosen (before reveal), or neither chosen nor correct (after).
    Unselected,
    /// The correct option, after reveal.
    Correct,
    /// Chosen but wrong, after reveal.
    IncorrectlyChosen,
}

/// Answering phase of a quiz.
///
/// There is no transition from `Revealed` back to `Answering`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// Selections may still change.
    Answering {
        /// Selected option per question index.
        selections: BTreeMap<usize, usize>,
    },
    /// Results are shown and selections are locked.
    Revealed {
        /// Final selected option per question index.
        selections: BTreeMap<usize, usize>,
    },
}

/// State of one quiz instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    option_counts: Vec<usize>,
    answers: Vec<usize>,
    phase: QuizPhase,
}

impl QuizState {
    /// Creates an unanswered quiz for the given questions.
    #[must_use]
    pub fn new(questions: &[QuizQuestion]) -> Self {
        Self {
            option_counts: questions.iter().map(|q| q.options.len()).collect(),
            answers: questions.iter().map(|q| q.correct_option_index).collect(),
            phase: QuizPhase::Answering {
                selections: BTreeMap::new(),
            },
        }
    }

    /// Selects `option` for `question`, replacing any previous choice.
    pub fn select(&mut self, question: usize, option: usize) -> Result<()> {
        let in_range = self
            .option_counts
            .get(question)
            .is_some_and(|count| option < *count);
        match &mut self.phase {
            QuizPhase::Revealed { .. } => Err(ProfesorError::QuizLocked),
            QuizPhase::Answering { .. } if !in_range => {
                Err(ProfesorError::QuizSelectionOutOfRange { question, option })
            }
            QuizPhase::Answering { selections } => {
                selections.insert(question, option);
                Ok(())
            }
        }
    }

    /// The selected option for `question`, if any.
    #[must_use]
    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections().get(&question).copied()
    }

    /// Number of questions in the quiz.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.option_counts.len()
    }

    /// Number of questions with a selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections().len()
    }

    /// Returns `true` once every question has a selection and results are hidden.
    #[must_use]
    pub fn can_reveal(&self) -> bool {
        !self.is_revealed() && self.answered_count() == self.question_count()
    }

    /// Returns `true` after the results have been revealed.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        matches!(self.phase, QuizPhase::Revealed { .. })
    }

    /// Reveals the results and locks the selections.
    ///
    /// Revealing an already revealed quiz does nothing.
    pub fn reveal(&mut self) -> Result<()> {
        match &mut self.phase {
            QuizPhase::Revealed { .. } => Ok(()),
            QuizPhase::Answering { selections } => {
                let answered = selections.len();
                let total = self.option_counts.len();
                if answered < total {
                    return Err(ProfesorError::QuizIncomplete { answered, total });
                }
                let selections = std::mem::take(selections);
                self.phase = QuizPhase::Revealed { selections };
                Ok(())
            }
        }
    }

    /// Classifies an option for display.
    #[must_use]
    pub fn mark(&self, question: usize, option: usize) -> OptionMark {
        let chosen = self.selection(question) == Some(option);
        match self.phase {
            QuizPhase::Answering { .. } if chosen => OptionMark::Selected,
            QuizPhase::Answering { .. } => OptionMark::Unselected,
            QuizPhase::Revealed { .. } => {
                if self.answers.get(question) == Some(&option) {
                    OptionMark::Correct
                } else if chosen {
                    OptionMark::IncorrectlyChosen
                } else {
                    OptionMark::Unselected
                }
            }
        }
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    const fn selections(&self) -> &BTreeMap<usize, usize> {
        match &self.phase {
            QuizPhase::Answering { selections } | QuizPhase::Revealed { selections } => selections,
        }
    }
}
