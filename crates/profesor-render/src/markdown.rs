//! Markdown views of a course.
//!
//! [`MarkdownRenderer`] draws what the learner sees for the current session
//! state: the lesson view, the final assessment view and the navigation
//! sidebar. [`MarkdownRenderer::course_document`] renders a whole course,
//! answer keys included, for export.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use profesor_core::{
    ActiveCourse, CourseData, LessonKey, OptionMark, Position, QuizId, QuizQuestion, QuizState,
};

/// Width of the textual progress bar, in cells.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Renders session views of an active course.
pub struct MarkdownRenderer<'a> {
    active: &'a ActiveCourse,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates a renderer for the given course session.
    #[must_use]
    pub const fn new(active: &'a ActiveCourse) -> Self {
        Self { active }
    }

    /// Renders the view for the current position.
    #[must_use]
    pub fn current_view(&self) -> String {
        match self.active.position() {
            Position::Lesson { key } => self.lesson_view(key).unwrap_or_default(),
            Position::FinalAssessment => self.final_view(),
        }
    }

    /// Renders one lesson with its quick test.
    ///
    /// Returns `None` if the lesson does not exist.
    #[must_use]
    pub fn lesson_view(&self, key: LessonKey) -> Option<String> {
        let course = self.active.course();
        let unit = course.units.get(key.unit)?;
        let lesson = unit.lessons.get(key.lesson)?;
        let quiz = self.active.quiz(QuizId::Lesson(key))?;
        let mut output = String::new();

        write_tags(&mut output, &course.tags);
        let _ = writeln!(output, "# {}\n", lesson.title);
        let _ = writeln!(output, "_Unidad {}: {}_\n", key.unit + 1, unit.title);
        if self.active.navigator().completed().is_completed(key) {
            let _ = writeln!(output, "> Lección completada\n");
        }

        let _ = writeln!(output, "## Idea Clave\n\n{}\n", lesson.key_idea);
        let _ = writeln!(output, "## Ejemplo Aplicado\n\n{}\n", lesson.applied_example);
        let _ = writeln!(
            output,
            "## Actividad Práctica\n\n{}\n",
            lesson.practical_activity
        );

        let _ = writeln!(output, "## Test Rápido\n");
        write_quiz(&mut output, &lesson.quiz, &quiz);
        self.write_navigation(&mut output);

        Some(output)
    }

    /// Renders the final assessment, projects and references.
    #[must_use]
    pub fn final_view(&self) -> String {
        let course = self.active.course();
        let mut output = String::new();

        let _ = writeln!(output, "# Evaluación Final y Proyecto\n");
        let _ = writeln!(output, "## Examen Final\n");
        if let Some(quiz) = self.active.quiz(QuizId::Final) {
            write_quiz(&mut output, &course.final_assessment, &quiz);
        }

        let _ = writeln!(output, "## Proyectos Finales\n");
        for (i, project) in course.final_projects.iter().enumerate() {
            let _ = writeln!(output, "### {}. {}\n\n{}\n", i + 1, project.title, project.description);
        }

        write_references(&mut output, &course.references);
        self.write_navigation(&mut output);
        output
    }

    /// Renders the navigation sidebar: progress and the lesson index.
    #[must_use]
    pub fn sidebar(&self) -> String {
        let course = self.active.course();
        let navigator = self.active.navigator();
        let position = navigator.position();
        let mut output = String::new();

        let _ = writeln!(output, "**{}**\n", course.title);
        let _ = writeln!(output, "{}\n", progress_bar(navigator.progress_percent()));

        for (u, unit) in course.units.iter().enumerate() {
            let _ = writeln!(output, "Unidad {}: {}", u + 1, unit.title);
            for (l, lesson) in unit.lessons.iter().enumerate() {
                let key = LessonKey::new(u, l);
                let marker = if position == (Position::Lesson { key }) {
                    "▶"
                } else if navigator.completed().is_completed(key) {
                    "✓"
                } else {
                    "○"
                };
                let _ = writeln!(output, "  {marker} {key} {}", lesson.title);
            }
        }

        let marker = if position.is_final() { "▶" } else { "○" };
        let _ = writeln!(output, "{marker} Evaluación Final");
        output
    }

    /// Renders a complete course with answer keys, for export.
    #[must_use]
    pub fn course_document(course: &CourseData) -> String {
        Self::course_document_at(course, Utc::now())
    }

    fn course_document_at(course: &CourseData, generated_at: DateTime<Utc>) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# {}\n", course.title);
        let _ = writeln!(output, "{}\n", course.subtitle);
        write_tags(&mut output, &course.tags);

        if !course.objectives.is_empty() {
            let _ = writeln!(output, "## Objetivos\n");
            for objective in &course.objectives {
                let _ = writeln!(output, "- {objective}");
            }
            let _ = writeln!(output);
        }

        for (u, unit) in course.units.iter().enumerate() {
            let _ = writeln!(output, "## Unidad {}: {}\n", u + 1, unit.title);
            let _ = writeln!(output, "_{}_\n", unit.summary);
            for (l, lesson) in unit.lessons.iter().enumerate() {
                let key = LessonKey::new(u, l);
                let _ = writeln!(output, "### Lección {key}: {}\n", lesson.title);
                let _ = writeln!(output, "#### Idea Clave\n\n{}\n", lesson.key_idea);
                let _ = writeln!(output, "#### Ejemplo Aplicado\n\n{}\n", lesson.applied_example);
                let _ = writeln!(
                    output,
                    "#### Actividad Práctica\n\n{}\n",
                    lesson.practical_activity
                );
                let _ = writeln!(output, "#### Test Rápido\n");
                write_answer_key(&mut output, &lesson.quiz);
            }
        }

        let _ = writeln!(output, "## Evaluación Final\n");
        write_answer_key(&mut output, &course.final_assessment);

        let _ = writeln!(output, "## Proyectos Finales\n");
        for (i, project) in course.final_projects.iter().enumerate() {
            let _ = writeln!(output, "### {}. {}\n\n{}\n", i + 1, project.title, project.description);
        }

        write_references(&mut output, &course.references);

        let _ = writeln!(output, "---");
        let _ = writeln!(
            output,
            "*Generado por ProfesorIA el {}*",
            generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        output
    }

    fn write_navigation(&self, output: &mut String) {
        let navigator = self.active.navigator();
        let mut actions = Vec::new();
        if navigator.can_go_prev() {
            actions.push("`p` anterior");
        }
        if navigator.can_go_next() {
            actions.push("`n` siguiente");
        }
        if !navigator.position().is_final() {
            actions.push("`f` evaluación final");
        }
        if !actions.is_empty() {
            let _ = writeln!(output, "---\n{}", actions.join(" · "));
        }
    }
}

/// Formats the progress bar line, e.g. `[████░░░░] 50% completado`.
#[must_use]
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {percent}% completado",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// Letter for an option index: A, B, C...
fn option_label(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| (index + 1).to_string(), |i| char::from(b'A' + i).to_string())
}

const fn mark_symbol(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Selected => "(•)",
        OptionMark::Unselected => "( )",
        OptionMark::Correct => " ✔ ",
        OptionMark::IncorrectlyChosen => " ✘ ",
    }
}

fn write_tags(output: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    let line: Vec<String> = tags.iter().map(|tag| format!("`{tag}`")).collect();
    let _ = writeln!(output, "{}\n", line.join(" · "));
}

/// Shown under a revealed quiz; the marks carry the outcome, no score is kept.
const QUIZ_DONE: &str = "Has completado el test. Revisa tus respuestas arriba.";

fn write_quiz(output: &mut String, questions: &[QuizQuestion], state: &QuizState) {
    for (q, question) in questions.iter().enumerate() {
        let _ = writeln!(output, "**{}. {}**\n", q + 1, question.question);
        for (o, option) in question.options.iter().enumerate() {
            let _ = writeln!(
                output,
                "    {} {}) {option}",
                mark_symbol(state.mark(q, o)),
                option_label(o)
            );
        }
        let _ = writeln!(output);
    }

    if state.is_revealed() {
        let _ = writeln!(output, "{QUIZ_DONE}\n");
    } else if state.can_reveal() {
        let _ = writeln!(
            output,
            "Todas las preguntas respondidas. Usa `r` para ver los resultados.\n"
        );
    } else {
        let _ = writeln!(
            output,
            "Respondidas {}/{}. Responde todas para ver los resultados.\n",
            state.answered_count(),
            state.question_count()
        );
    }
}

fn write_answer_key(output: &mut String, questions: &[QuizQuestion]) {
    for (q, question) in questions.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", q + 1, question.question);
        for (o, option) in question.options.iter().enumerate() {
            let _ = writeln!(output, "   - {}) {option}", option_label(o));
        }
        if let Some(answer) = question.options.get(question.correct_option_index) {
            let _ = writeln!(
                output,
                "   **Respuesta correcta:** {}) {answer}",
                option_label(question.correct_option_index)
            );
        }
        let _ = writeln!(output);
    }
}

fn write_references(output: &mut String, references: &[String]) {
    if references.is_empty() {
        return;
    }
    let _ = writeln!(output, "## Fuentes y Referencias\n");
    for reference in references {
        let _ = writeln!(output, "- {reference}");
    }
    let _ = writeln!(output);
}
