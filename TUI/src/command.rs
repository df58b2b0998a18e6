use std::path::Path;

use crate::action::Action;

pub struct CommandParser;

impl CommandParser {
    /// Parse the analyzer's command line. A bare path (what a terminal pastes
    /// when a file is dropped on it) is treated as `/open <path>`, absolute
    /// paths included.
    pub fn parse(input: &str) -> Result<Action, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Nada que hacer".to_string());
        }
        if !input.starts_with('/') {
            return Ok(Action::AttachImage(input.to_string()));
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "/open" => {
                if args.is_empty() {
                    Err("Uso: /open <ruta>\n  Ejemplo: /open ~/captura.png".to_string())
                } else {
                    Ok(Action::AttachImage(args.to_string()))
                }
            }
            "/tone" => match args.parse::<u8>() {
                Ok(tone) if tone <= 100 => Ok(Action::SetTone(tone)),
                _ => Err("Uso: /tone <0-100>".to_string()),
            },
            "/generate" => Ok(Action::Generate),
            "/copy" => Ok(Action::CopyReply),
            "/back" => Ok(Action::Back),
            "/quit" => Ok(Action::Quit),
            // Absolute paths start with '/' too
            _ if cmd[1..].contains('/') || names_a_file(input) => Ok(Action::AttachImage(input.to_string())),
            _ => Err(format!("Comando desconocido: {}. Usa /open, /tone, /generate o /copy.", cmd)),
        }
    }
}

/// A root-level path like `/captura.png` has no second slash. Take it as a
/// path when it exists or carries an image extension.
fn names_a_file(input: &str) -> bool {
    let path = Path::new(input);
    path.exists()
        || mime_guess::from_path(path)
            .first()
            .map_or(false, |mime| mime.type_() == mime_guess::mime::IMAGE)
}

/// Analyzer commands for the hint line
pub const COMMANDS: &[(&str, &str)] = &[
    ("/open", "Subir captura"),
    ("/tone", "Ajustar tono"),
    ("/generate", "Generar respuesta"),
    ("/copy", "Copiar respuesta"),
];
