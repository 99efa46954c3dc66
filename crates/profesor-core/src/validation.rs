//! Validation and normalization of generated courses.
//!
//! A generated payload is only used after it passes through
//! [`validate_and_normalize`]. Structural invariants (a course has units,
//! every lesson has a quiz, every `correctOptionIndex` points at an option)
//! are always enforced. The cardinalities requested from the model (6-8
//! units, 3-5 lessons per unit, ...) are hints: deviations are reported as
//! [`CardinalityWarning`]s and only rejected under
//! [`CardinalityPolicy::Strict`].

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::course::{CourseData, QuizQuestion};
use crate::error::{ProfesorError, Result};

/// Units requested per course.
pub const UNITS_PER_COURSE: RangeInclusive<usize> = 6..=8;
/// Lessons requested per unit.
pub const LESSONS_PER_UNIT: RangeInclusive<usize> = 3..=5;
/// Quiz questions requested per lesson.
pub const QUESTIONS_PER_LESSON: RangeInclusive<usize> = 3..=3;
/// Final assessment questions requested per course.
pub const FINAL_ASSESSMENT_QUESTIONS: RangeInclusive<usize> = 8..=10;
/// Final projects requested per course.
pub const FINAL_PROJECTS: RangeInclusive<usize> = 2..=2;

/// Minimum number of options for a question to be answerable.
const MIN_OPTIONS: usize = 2;

/// How to treat courses that miss the requested cardinalities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardinalityPolicy {
    /// Log each deviation and accept the course (default).
    #[default]
    Warn,
    /// Reject the course on the first deviation.
    Strict,
}

impl CardinalityPolicy {
    /// Parses a policy name, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warn" => Some(Self::Warn),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for CardinalityPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid cardinality policy '{s}': expected one of 'warn', 'strict'"
            ))
        })
    }
}

impl Serialize for CardinalityPolicy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Warn => "warn",
            Self::Strict => "strict",
        };
        serializer.serialize_str(s)
    }
}

/// A requested cardinality the course does not honor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardinalityWarning {
    /// Where the deviation was found.
    pub location: String,
    /// What was counted (e.g. "units").
    pub what: &'static str,
    /// The actual count.
    pub actual: usize,
    /// The requested range.
    pub expected: RangeInclusive<usize>,
}

impl fmt::Display for CardinalityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = (self.expected.start(), self.expected.end());
        if lo == hi {
            write!(
                f,
                "{}: {} {} (expected {lo})",
                self.location, self.actual, self.what
            )
        } else {
            write!(
                f,
                "{}: {} {} (expected {lo}-{hi})",
                self.location, self.actual, self.what
            )
        }
    }
}

/// Normalizes then validates a generated course.
///
/// Returns the normalized course together with any cardinality deviations.
/// Under [`CardinalityPolicy::Warn`] each deviation is logged.
pub fn validate_and_normalize(
    course: CourseData,
    policy: CardinalityPolicy,
) -> Result<(CourseData, Vec<CardinalityWarning>)> {
    let course = normalize(course);
    let warnings = validate(&course, policy)?;
    for warning in &warnings {
        warn!(%warning, "Generated course deviates from requested cardinality");
    }
    debug!(
        units = course.units.len(),
        lessons = course.total_lessons(),
        references = course.references.len(),
        "Course validated"
    );
    Ok((course, warnings))
}

/// Trims text, drops blank list entries and de-duplicates references.
#[must_use]
pub fn normalize(mut course: CourseData) -> CourseData {
    trim_in_place(&mut course.title);
    trim_in_place(&mut course.subtitle);
    course.tags = clean_list(course.tags);
    course.objectives = clean_list(course.objectives);

    let mut seen = HashSet::new();
    course.references = clean_list(course.references)
        .into_iter()
        .filter(|reference| seen.insert(reference.clone()))
        .collect();

    for unit in &mut course.units {
        trim_in_place(&mut unit.title);
        trim_in_place(&mut unit.summary);
        for lesson in &mut unit.lessons {
            trim_in_place(&mut lesson.title);
            trim_in_place(&mut lesson.key_idea);
            trim_in_place(&mut lesson.applied_example);
            trim_in_place(&mut lesson.practical_activity);
            lesson.quiz.iter_mut().for_each(normalize_question);
        }
    }
    course.final_assessment.iter_mut().for_each(normalize_question);
    for project in &mut course.final_projects {
        trim_in_place(&mut project.title);
        trim_in_place(&mut project.description);
    }
    course
}

/// Checks structural invariants and requested cardinalities.
///
/// Structural violations are always errors. Cardinality deviations are
/// returned, or turned into an error under [`CardinalityPolicy::Strict`].
pub fn validate(course: &CourseData, policy: CardinalityPolicy) -> Result<Vec<CardinalityWarning>> {
    if course.title.trim().is_empty() {
        return Err(ProfesorError::malformed("title", "course title is blank"));
    }
    if course.units.is_empty() {
        return Err(ProfesorError::malformed("units", "course has no units"));
    }

    let mut warnings = Vec::new();
    check_count(&mut warnings, "course", "units", course.units.len(), &UNITS_PER_COURSE);

    for (u, unit) in course.units.iter().enumerate() {
        let unit_loc = format!("units[{u}]");
        if unit.title.trim().is_empty() {
            return Err(ProfesorError::malformed(&unit_loc, "unit title is blank"));
        }
        if unit.lessons.is_empty() {
            return Err(ProfesorError::malformed(&unit_loc, "unit has no lessons"));
        }
        check_count(&mut warnings, &unit_loc, "lessons", unit.lessons.len(), &LESSONS_PER_UNIT);

        for (l, lesson) in unit.lessons.iter().enumerate() {
            let lesson_loc = format!("{unit_loc}.lessons[{l}]");
            if lesson.title.trim().is_empty() {
                return Err(ProfesorError::malformed(&lesson_loc, "lesson title is blank"));
            }
            if lesson.key_idea.trim().is_empty() {
                return Err(ProfesorError::malformed(&lesson_loc, "lesson key idea is blank"));
            }
            if lesson.quiz.is_empty() {
                return Err(ProfesorError::malformed(&lesson_loc, "lesson has no quiz"));
            }
            check_count(
                &mut warnings,
                &lesson_loc,
                "quiz questions",
                lesson.quiz.len(),
                &QUESTIONS_PER_LESSON,
            );
            for (q, question) in lesson.quiz.iter().enumerate() {
                check_question(&format!("{lesson_loc}.quiz[{q}]"), question)?;
            }
        }
    }

    if course.final_assessment.is_empty() {
        return Err(ProfesorError::malformed(
            "finalAssessment",
            "course has no final assessment",
        ));
    }
    check_count(
        &mut warnings,
        "course",
        "final assessment questions",
        course.final_assessment.len(),
        &FINAL_ASSESSMENT_QUESTIONS,
    );
    for (q, question) in course.final_assessment.iter().enumerate() {
        check_question(&format!("finalAssessment[{q}]"), question)?;
    }

    check_count(
        &mut warnings,
        "course",
        "final projects",
        course.final_projects.len(),
        &FINAL_PROJECTS,
    );

    if policy == CardinalityPolicy::Strict {
        if let Some(first) = warnings.first() {
            return Err(ProfesorError::malformed(
                first.location.clone(),
                first.to_string(),
            ));
        }
    }

    Ok(warnings)
}

/// Checks a single question: text, option count and answer bounds.
fn check_question(location: &str, question: &QuizQuestion) -> Result<()> {
    if question.question.trim().is_empty() {
        return Err(ProfesorError::malformed(location, "question text is blank"));
    }
    if question.options.len() < MIN_OPTIONS {
        return Err(ProfesorError::malformed(
            location,
            format!(
                "question has {} options (at least {MIN_OPTIONS} required)",
                question.options.len()
            ),
        ));
    }
    if question.options.iter().any(|option| option.trim().is_empty()) {
        return Err(ProfesorError::malformed(location, "question has a blank option"));
    }
    if question.correct_option_index >= question.options.len() {
        return Err(ProfesorError::malformed(
            location,
            format!(
                "correctOptionIndex {} is out of range for {} options",
                question.correct_option_index,
                question.options.len()
            ),
        ));
    }
    Ok(())
}

fn check_count(
    warnings: &mut Vec<CardinalityWarning>,
    location: &str,
    what: &'static str,
    actual: usize,
    expected: &RangeInclusive<usize>,
) {
    if !expected.contains(&actual) {
        warnings.push(CardinalityWarning {
            location: location.to_string(),
            what,
            actual,
            expected: expected.clone(),
        });
    }
}

/// Trims text fields and removes blank options that sit after the answer.
///
/// Blank options before the correct one are kept so the answer index stays
/// valid; [`validate`] reports them.
fn normalize_question(question: &mut QuizQuestion) {
    trim_in_place(&mut question.question);
    question.options.iter_mut().for_each(trim_in_place);
    let answer = question.correct_option_index;
    let blanks_before_answer = question
        .options
        .iter()
        .take(answer)
        .any(String::is_empty);
    if !blanks_before_answer && answer < question.options.len() {
        let mut index = 0;
        question.options.retain(|option| {
            let keep = index <= answer || !option.is_empty();
            index += 1;
            keep
        });
    }
}

fn trim_in_place(text: &mut String) {
    let trimmed = text.trim();
    if trimmed.len() != text.len() {
        *text = trimmed.to_string();
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
