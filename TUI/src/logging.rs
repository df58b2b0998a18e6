//! File logging for the TUI.
//!
//! stderr belongs to the alternate screen, so `log` records go to
//! `<data_dir>/logs/flechazo-YYYY-MM-DD.log` instead. `RUST_LOG` overrides the
//! default `info` filter.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use env_logger::{Builder, Env, Target};

/// Get the log directory path
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Get today's log file path
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    log_dir(data_dir).join(format!("flechazo-{}.log", today))
}

/// Initialize the logger. Returns the log file path on success; on failure
/// the app runs without logging.
pub fn init_logging(data_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = log_dir(data_dir);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    let path = log_file_path(data_dir);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;

    log::info!("Flechazo logging initialized");
    Ok(path)
}
