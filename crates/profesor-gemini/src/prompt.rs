//! Instruction text sent with every generation request.

use profesor_core::UserInput;

/// Builds the Spanish instruction for `input`.
///
/// Every form field is embedded verbatim, followed by the structural and
/// tone requirements the course must satisfy.
#[must_use]
pub fn build_prompt(input: &UserInput) -> String {
    format!(
        "Actúa como un Diseñador Instruccional Senior. Crea un curso completo en JSON español basado en:\n\
         - Tema: {topic}\n\
         - Nivel: {level}\n\
         - Perfil del alumno: {profile}\n\
         - Objetivo: {goal}\n\
         - Tiempo disponible: {time}\n\
         - Formato: {format}\n\
         \n\
         Requisitos:\n\
         1. Usa Google Search para encontrar información actualizada y veraz.\n\
         2. Estructura el curso en 6-8 unidades, con 3-5 lecciones cada una.\n\
         3. Cada lección incluye exactamente 3 preguntas de opción múltiple distintas.\n\
         4. La evaluación final tiene entre 8 y 10 preguntas y hay 2 proyectos finales prácticos.\n\
         5. El tono debe ser educativo pero motivador.\n\
         6. Asegúrate de incluir referencias bibliográficas reales en el campo 'references'.\n",
        topic = input.topic.trim(),
        level = input.level,
        profile = input.profile.trim(),
        goal = input.goal.trim(),
        time = input.time_available.trim(),
        format = input.format,
    )
}
