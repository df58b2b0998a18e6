//! Application configuration and constants.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Inline image payloads above this size are rejected by the API.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// How long the "copied" badge stays up
    pub copy_flash_ms: u64,

    /// Duration of the dashboard stat count-up
    pub stat_animation_ms: u64,

    /// Tone slider increment per key press
    pub tone_step: u8,

    /// Gemini API key; generation degrades to fallback lines without one
    pub api_key: Option<String>,

    pub model: String,

    pub api_base: String,

    pub connect_timeout_secs: u64,

    pub request_timeout_secs: u64,

    /// Where the stats file and logs live
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            copy_flash_ms: 2000,
            stat_animation_ms: 1000,
            tone_step: 5,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Defaults overridden by `GEMINI_API_KEY` (or `API_KEY`), `FLECHAZO_MODEL`,
    /// `FLECHAZO_API_BASE` and `FLECHAZO_DATA_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.api_key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        if let Some(model) = non_empty_var("FLECHAZO_MODEL") {
            config.model = model;
        }
        if let Some(base) = non_empty_var("FLECHAZO_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(dir) = non_empty_var("FLECHAZO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    /// Apply `--data-dir <path>` and `--model <id>` from the command line.
    pub fn apply_args(&mut self, args: &[String]) {
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--data-dir" | "-d" => {
                    if let Some(dir) = iter.next() {
                        self.data_dir = PathBuf::from(dir);
                    }
                }
                "--model" | "-m" => {
                    if let Some(model) = iter.next() {
                        self.model = model.clone();
                    }
                }
                _ => {}
            }
        }
    }

    /// Convert a millisecond duration to main-loop ticks (at least one).
    pub fn ms_to_ticks(&self, ms: u64) -> u64 {
        (ms / self.tick_rate_ms.max(1)).max(1)
    }

    pub fn copy_flash_ticks(&self) -> u64 {
        self.ms_to_ticks(self.copy_flash_ms)
    }

    pub fn stat_animation_ticks(&self) -> u64 {
        self.ms_to_ticks(self.stat_animation_ms)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flechazo")
}

/// Dashboard menu entries, in the order the number keys select them
pub const MENU_ITEMS: &[(&str, &str)] = &[
    ("1", "Empieza la Conversación"),
    ("2", "Analizar Conversación"),
    ("3", "Más Opciones"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_flash_is_two_seconds_of_ticks() {
        let config = Config::default();
        assert_eq!(config.copy_flash_ticks(), 125);
    }

    #[test]
    fn ms_to_ticks_never_returns_zero() {
        let config = Config::default();
        assert_eq!(config.ms_to_ticks(0), 1);
        assert_eq!(config.ms_to_ticks(5), 1);
    }

    #[test]
    fn args_override_data_dir_and_model() {
        let mut config = Config::default();
        let args: Vec<String> = ["flechazo", "--data-dir", "/tmp/fz", "-m", "gemini-2.5-pro"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        config.apply_args(&args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/fz"));
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn dangling_flag_is_ignored() {
        let mut config = Config::default();
        let before = config.data_dir.clone();
        config.apply_args(&["flechazo".to_string(), "--data-dir".to_string()]);
        assert_eq!(config.data_dir, before);
    }
}
