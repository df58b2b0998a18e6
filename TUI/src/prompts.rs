//! Prompt templates and user-facing fallback lines (Spanish).

use serde_json::{json, Value};

/// Every fallback line starts with this; the ice-breaker screen uses it to
/// tell a real batch from an apology.
pub const APOLOGY_PREFIX: &str = "Lo siento";

pub const GENERATION_FALLBACK: &str =
    "Lo siento, no pude generar frases en este momento. Inténtalo de nuevo.";

pub const FORMAT_FALLBACK: &str =
    "Lo siento, la respuesta del modelo no tuvo el formato esperado. Inténtalo de nuevo.";

pub const REPLY_FALLBACK: &str =
    "Lo siento, no pude analizar la imagen. Por favor, intenta de nuevo.";

pub const ICE_BREAKER_PROMPT: &str = "Genera 5 frases ingeniosas y coquetas para romper el hielo en una app de citas. Deben ser cortas, divertidas y originales.";

/// Tone buckets, upper bound inclusive. Anything above the last bound uses
/// [`TONE_MAX`].
pub const TONE_BUCKETS: &[(u8, &str)] = &[
    (20, "ingeniosa, sutil y un poco nerd. Usa referencias inteligentes."),
    (40, "divertida, casual y amigable. Haz preguntas abiertas."),
    (60, "juguetona y un poco coqueta, pero sin ser demasiado directo."),
    (80, "confiado, atrevido y con un toque de misterio, sugiriendo planes futuros sin ser explícito."),
];

pub const TONE_MAX: &str = "atrevido, carismático y magnético. Usa humor juguetón y metáforas ingeniosas para crear respuestas inesperadas y memorables.";

/// Structured-output schema for the ice-breaker call: `{ice_breakers: [string]}`.
pub fn ice_breaker_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ice_breakers": {
                "type": "ARRAY",
                "items": {
                    "type": "STRING",
                    "description": "Una frase para romper el hielo."
                },
                "description": "Una lista de frases para romper el hielo."
            }
        },
        "required": ["ice_breakers"]
    })
}

/// Instruction sent alongside the chat screenshot.
pub fn chat_reply_prompt(tone_description: &str) -> String {
    format!(
        r#"**MISIÓN:** Eres un coach de ligue de clase mundial, un maestro del ingenio. Tu objetivo es crear la respuesta perfecta para un usuario en una app de citas.

**CONTEXTO:** Te proporcionaré una captura de pantalla de una conversación.
- Los mensajes de **TU USUARIO** (a quien estás ayudando) están en el lado **DERECHO**.
- Los mensajes de la **OTRA PERSONA** están en el lado **IZQUIERDO**.

**TAREA:**
1. **Analiza** la conversación completa para entender el tema, el ambiente y el contexto.
2. **Identifica** el último mensaje enviado por la persona de la **IZQUIERDA**. Este es el mensaje al que debes responder.
3. **Crea** una respuesta corta, ingeniosa y carismática para que tu usuario (el de la derecha) la envíe.
4. La respuesta debe tener un tono **{tone_description}**.
5. La respuesta debe ser en español.

**EJEMPLOS DE ORO DE RESPUESTAS ATREVIDAS:**
- Si te preguntan "¿quién eres?", una buena respuesta es: "la persona que te va a invitar a salir, ¿quién más?"
- Si te preguntan "¿cuál dinero???", una buena respuesta es: "¿crees que vivir en mi corazón es gratis? 👀"

**REGLA CRÍTICA DE SALIDA:**
Responde **ÚNICAMENTE** con el texto del mensaje que tu usuario debe enviar. No añadas comillas, ni "Respuesta:", ni "Aquí tienes una sugerencia:", ni ninguna otra explicación. Solo el texto puro de la respuesta."#
    )
}
