//! Prompts sent to the language model
//!
//! Every prompt ends with the strict answer format that `parse` reads back.

/// First pass over a chunk: candidate ambiguous ideas
pub fn ambiguity_candidates(chunk: &str) -> String {
    format!(
        "Tienes el siguiente fragmento de una tesis en español. Tu tarea consiste en:\n\
         1. Identificar las ideas que quedan ambiguas o los conceptos que hace falta \
         explicar porque dependen del contexto (por ejemplo, adverbios de modo que \
         dependen de un punto de referencia). Si la idea se explica en otra parte del \
         texto, no se considera ambigua.\n\
         ### Texto a analizar:\n{chunk}\n\
         ### Formato de respuesta (usa este formato estricto):\n\
         Si no hay ideas ambiguas devuelve: NO\n\
         Si hay ideas ambiguas devuelve, por cada una:\n\
         Idea: [oración exacta del texto]\n\
         Por qué es ambigua: [explicación]\n"
    )
}

/// Second pass: confirm or reject the candidates
pub fn ambiguity_confirmation(chunk: &str, candidates: &str) -> String {
    format!(
        "Tienes el siguiente fragmento de una tesis en español y una lista de ideas. \
         Tu tarea consiste en:\n\
         1. Decidir si cada idea queda ambigua, es decir, si después de leer el \
         fragmento no es posible responder las preguntas que surgen al leerla.\n\
         ### Texto a analizar:\n{chunk}\n\
         ### Ideas:\n{candidates}\n\
         ### Formato de respuesta (usa este formato estricto):\n\
         Idea: [oración exacta del texto]\n\
         Ambigua/No ambigua: [Sí/No]\n\
         Por qué: [explicación]\n"
    )
}

/// Transitions into each section. `sections` holds one
/// `{Sección name: Párrafo anterior: {...} Párrafo siguiente a sección: {...}}`
/// line per section.
pub fn transitions(sections: &str) -> String {
    format!(
        "A continuación tienes un conjunto de inicios de secciones con la estructura:\n\
         Sección nombre_de_sección: Párrafo anterior: {{}} Párrafo siguiente a sección: {{}}\n\
         Tu tarea consiste en:\n\
         1. Para cada sección, determinar si el párrafo que la precede y el que la sigue \
         están conectados, es decir, si hay una transición de una sección a la otra. \
         El último párrafo de una sección debería conectar con el primero de la siguiente.\n\
         ### Texto a analizar:\n{sections}\n\
         ### Formato de respuesta (usa este formato estricto):\n\
         Nombre de sección: [sección]\n\
         Transición: [Sí/No]\n\
         Sugerencia para incluir transición: [sugerencia]\n"
    )
}

/// Whether each chapter opens with an introduction
pub fn chapter_introduction(openings: &str) -> String {
    format!(
        "A continuación tienes el primer párrafo de cada capítulo con la estructura:\n\
         {{Capítulo nombre_capítulo: primer párrafo}}\n\
         Tu tarea consiste en:\n\
         1. Determinar si el párrafo con el que comienza el capítulo sirve como una \
         pequeña introducción al tema del capítulo.\n\
         ### Texto a analizar:\n{openings}\n\
         ### Formato de respuesta (usa este formato estricto):\n\
         Introducción: [Sí/No]\n\
         Sugerencia para mejorar introducción: [sugerencia]\n"
    )
}

/// Whether the sections follow a logical order
pub fn logical_order(structure: &str) -> String {
    format!(
        "A continuación tienes la lista de capítulos y secciones de una tesis, en el \
         orden en que aparecen. Un capítulo da nombre al tema de las secciones que lo \
         siguen; no sugieras cambios sobre los capítulos.\n\
         Tu tarea consiste en:\n\
         1. Determinar si el orden de las secciones es adecuado para el capítulo y, en \
         caso contrario, sugerir otro orden justificando la propuesta.\n\
         ### Estructura:\n{structure}\n\
         ### Formato de respuesta (usa este formato estricto):\n\
         Orden lógico: [Sí/No]\n\
         Sugerencias de mejora para el orden: [sugerencias]\n"
    )
}
