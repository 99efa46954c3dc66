//! Response schema for structured course output.
//!
//! Uses the OpenAPI subset accepted by `generationConfig.responseSchema`.
//! Cardinality hints live in `description`; the schema itself cannot express
//! them, which is why the parsed course is validated afterwards.

use serde_json::{json, Value};

fn quiz_question() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correctOptionIndex": { "type": "INTEGER" }
        },
        "required": ["question", "options", "correctOptionIndex"]
    })
}

/// The schema every generated course must follow.
#[must_use]
pub fn course_response_schema() -> Value {
    let lesson = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "keyIdea": {
                "type": "STRING",
                "description": "4-8 sentences explaining the concept."
            },
            "appliedExample": {
                "type": "STRING",
                "description": "Real-world application example."
            },
            "practicalActivity": {
                "type": "STRING",
                "description": "A practical task for the student."
            },
            "quiz": {
                "type": "ARRAY",
                "items": quiz_question(),
                "description": "Exactly 3 distinct multiple choice questions."
            }
        },
        "required": ["title", "keyIdea", "appliedExample", "practicalActivity", "quiz"]
    });

    let unit = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Attractive unit title." },
            "summary": { "type": "STRING", "description": "Clear summary phrase." },
            "lessons": {
                "type": "ARRAY",
                "description": "3 to 5 lessons per unit.",
                "items": lesson
            }
        },
        "required": ["title", "summary", "lessons"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A catchy, academic title for the course."
            },
            "subtitle": {
                "type": "STRING",
                "description": "A 2-3 sentence description/subtitle."
            },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 tags: Level, Estimated Duration, and Target Profile Summary."
            },
            "objectives": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "5-7 learning objectives."
            },
            "units": {
                "type": "ARRAY",
                "description": "6 to 8 units/learning paths.",
                "items": unit
            },
            "finalAssessment": {
                "type": "ARRAY",
                "description": "8-10 questions covering the entire course.",
                "items": quiz_question()
            },
            "finalProjects": {
                "type": "ARRAY",
                "description": "2 practical final projects.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["title", "description"]
                }
            },
            "references": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of real books, reputable websites, or articles used as grounding."
            }
        },
        "required": [
            "title",
            "subtitle",
            "tags",
            "objectives",
            "units",
            "finalAssessment",
            "finalProjects",
            "references"
        ]
    })
}
