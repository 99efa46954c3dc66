//! Course data model for ProfesorIA.
//!
//! This module defines the learner's course request ([`UserInput`]) and the
//! generated course structure ([`CourseData`] and its units, lessons and
//! quizzes). JSON field names follow the generation contract exactly, so a
//! model response can be deserialized straight into these types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfesorError, Result};

// ============================================================================
// CourseLevel and CourseFormat
// ============================================================================

/// Target level of the course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CourseLevel {
    /// No prior knowledge assumed (default).
    #[default]
    Principiante,
    /// Some familiarity with the topic.
    Intermedio,
    /// Deep prior knowledge.
    Avanzado,
}

impl CourseLevel {
    /// All levels in form order.
    pub const ALL: [Self; 3] = [Self::Principiante, Self::Intermedio, Self::Avanzado];

    /// Returns the label shown to learners and sent to the model.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Principiante => "Principiante",
            Self::Intermedio => "Intermedio",
            Self::Avanzado => "Avanzado",
        }
    }

    /// Parses a level from its label or short alias, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "principiante" | "beginner" => Some(Self::Principiante),
            "intermedio" | "intermediate" => Some(Self::Intermedio),
            "avanzado" | "advanced" => Some(Self::Avanzado),
            _ => None,
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CourseLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid course level '{s}': expected one of 'Principiante', 'Intermedio', 'Avanzado'"
            ))
        })
    }
}

impl Serialize for CourseLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Preferred study format of the course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CourseFormat {
    /// Short readings only.
    LecturasBreves,
    /// Readings plus exercises.
    LecturasEjercicios,
    /// Outlines plus problems.
    EsquemasProblemas,
    /// A mix of everything (default).
    #[default]
    Mixto,
}

impl CourseFormat {
    /// All formats in form order.
    pub const ALL: [Self; 4] = [
        Self::LecturasBreves,
        Self::LecturasEjercicios,
        Self::EsquemasProblemas,
        Self::Mixto,
    ];

    /// Returns the label shown to learners and sent to the model.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LecturasBreves => "Lecturas breves",
            Self::LecturasEjercicios => "Lecturas + ejercicios",
            Self::EsquemasProblemas => "Esquemas + problemas",
            Self::Mixto => "Mixto",
        }
    }

    /// Parses a format from its label or short alias, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        let found = Self::ALL
            .into_iter()
            .find(|format| format.label().to_lowercase() == lowered);
        if found.is_some() {
            return found;
        }
        match lowered.as_str() {
            "lecturas" | "breves" => Some(Self::LecturasBreves),
            "ejercicios" => Some(Self::LecturasEjercicios),
            "esquemas" | "problemas" => Some(Self::EsquemasProblemas),
            "mixto" | "mixed" => Some(Self::Mixto),
            _ => None,
        }
    }
}

impl fmt::Display for CourseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CourseFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid course format '{s}': expected one of 'Lecturas breves', 'Lecturas + ejercicios', 'Esquemas + problemas', 'Mixto'"
            ))
        })
    }
}

impl Serialize for CourseFormat {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

// ============================================================================
// UserInput
// ============================================================================

/// The learner's course request, as submitted from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// What the course is about.
    pub topic: String,
    /// Target level.
    pub level: CourseLevel,
    /// Who the learner is.
    pub profile: String,
    /// What the learner wants to achieve.
    pub goal: String,
    /// How much time the learner can dedicate.
    pub time_available: String,
    /// Preferred study format.
    pub format: CourseFormat,
}

impl UserInput {
    /// Checks that every required free-text field has content.
    ///
    /// Whitespace-only values count as blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use profesor_core::{ProfesorError, UserInput};
    ///
    /// let input = UserInput {
    ///     topic: "Astronomía".to_string(),
    ///     profile: "Estudiante".to_string(),
    ///     goal: "Entender el cielo nocturno".to_string(),
    ///     time_available: "   ".to_string(),
    ///     ..Default::default()
    /// };
    /// assert!(matches!(
    ///     input.validate(),
    ///     Err(ProfesorError::MissingField { field: "timeAvailable" })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("topic", &self.topic),
            ("profile", &self.profile),
            ("goal", &self.goal),
            ("timeAvailable", &self.time_available),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ProfesorError::MissingField { field });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Course structure
// ============================================================================

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The question text.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct_option_index: usize,
}

/// One lesson: explanation, example, activity and a short quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    /// Lesson title.
    pub title: String,
    /// The concept explained in a few sentences ("Idea clave").
    pub key_idea: String,
    /// A real-world application ("Ejemplo aplicado").
    pub applied_example: String,
    /// A task for the learner ("Actividad práctica").
    pub practical_activity: String,
    /// Quick test ("Test rápido"), normally three questions.
    pub quiz: Vec<QuizQuestion>,
}

/// A named group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit title.
    pub title: String,
    /// One-sentence summary.
    pub summary: String,
    /// Lessons in study order.
    pub lessons: Vec<LessonContent>,
}

/// A closing practical project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalProject {
    /// Project title.
    pub title: String,
    /// What the learner has to build or do.
    pub description: String,
}

/// A complete generated course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseData {
    /// Course title.
    pub title: String,
    /// Two or three sentence description.
    pub subtitle: String,
    /// Display tags, normally level, estimated duration and target profile.
    pub tags: Vec<String>,
    /// Learning objectives.
    pub objectives: Vec<String>,
    /// Units in study order.
    pub units: Vec<Unit>,
    /// Questions covering the whole course.
    pub final_assessment: Vec<QuizQuestion>,
    /// Closing practical projects.
    pub final_projects: Vec<FinalProject>,
    /// Sources and bibliography.
    #[serde(default)]
    pub references: Vec<String>,
}

impl CourseData {
    /// Parses a course from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a course previously exported as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Total number of lessons across all units.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.units.iter().map(|unit| unit.lessons.len()).sum()
    }

    /// Returns the lesson at the given address, if it exists.
    #[must_use]
    pub fn lesson(&self, key: LessonKey) -> Option<&LessonContent> {
        self.units.get(key.unit)?.lessons.get(key.lesson)
    }

    /// Returns the lesson counts per unit.
    #[must_use]
    pub fn shape(&self) -> CourseShape {
        CourseShape::new(self.units.iter().map(|unit| unit.lessons.len()).collect())
    }
}

// ============================================================================
// LessonKey and CourseShape
// ============================================================================

/// Address of a lesson inside a course (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LessonKey {
    /// Unit index.
    pub unit: usize,
    /// Lesson index within the unit.
    pub lesson: usize,
}

impl LessonKey {
    /// The first lesson of the first unit.
    pub const FIRST: Self = Self { unit: 0, lesson: 0 };

    /// Creates a lesson key.
    #[must_use]
    pub const fn new(unit: usize, lesson: usize) -> Self {
        Self { unit, lesson }
    }
}

impl fmt::Display for LessonKey {
    /// Formats the key one-based, the way learners read it (`1.1` is the first lesson).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit + 1, self.lesson + 1)
    }
}

/// Lesson counts per unit; fixed once a course is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseShape {
    lessons_per_unit: Vec<usize>,
}

impl CourseShape {
    /// Creates a shape from per-unit lesson counts.
    #[must_use]
    pub const fn new(lessons_per_unit: Vec<usize>) -> Self {
        Self { lessons_per_unit }
    }

    /// Number of units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.lessons_per_unit.len()
    }

    /// Number of lessons in `unit`, zero if the unit does not exist.
    #[must_use]
    pub fn lessons_in(&self, unit: usize) -> usize {
        self.lessons_per_unit.get(unit).copied().unwrap_or(0)
    }

    /// Total number of lessons.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons_per_unit.iter().sum()
    }

    /// Returns `true` if `key` addresses an existing lesson.
    #[must_use]
    pub fn contains(&self, key: LessonKey) -> bool {
        key.lesson < self.lessons_in(key.unit)
    }

    /// The last lesson of the last non-empty unit.
    #[must_use]
    pub fn last_lesson(&self) -> Option<LessonKey> {
        self.lessons_per_unit
            .iter()
            .enumerate()
            .rev()
            .find(|(_, count)| **count > 0)
            .map(|(unit, count)| LessonKey::new(unit, count - 1))
    }

    /// Iterates over every lesson key in study order.
    pub fn keys(&self) -> impl Iterator<Item = LessonKey> + '_ {
        self.lessons_per_unit
            .iter()
            .enumerate()
            .flat_map(|(unit, count)| (0..*count).map(move |lesson| LessonKey::new(unit, lesson)))
    }
}

// ============================================================================
// Tests
// ============================================================================
