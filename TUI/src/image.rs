//! Screenshot attachments for the chat analyzer.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::config::MAX_IMAGE_BYTES;
use crate::error::ImageError;
use crate::gemini::InlineImage;

/// A user-selected image. `path`/`file_name` are what the screen shows; the
/// base64 `data` and `mime_type` are what the model gets.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub data: String,
    pub mime_type: String,
}

impl ImageAttachment {
    /// Read and encode an image file. The media type comes from the extension
    /// and must be `image/*`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = expand_home(path.as_ref());

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ImageError::UnsupportedType(mime.essence_str().to_string()));
        }

        let size_bytes = fs::metadata(&path)?.len();
        if size_bytes > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size: size_bytes,
                max: MAX_IMAGE_BYTES,
            });
        }

        let bytes = fs::read(&path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            file_name,
            size_bytes,
            data: BASE64.encode(bytes),
            mime_type: mime.essence_str().to_string(),
            path,
        })
    }

    pub fn inline(&self) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }

    /// "123 KB"-style size for the attachment card
    pub fn size_label(&self) -> String {
        if self.size_bytes < 1024 {
            format!("{} B", self.size_bytes)
        } else if self.size_bytes < 1024 * 1024 {
            format!("{} KB", self.size_bytes / 1024)
        } else {
            format!("{:.1} MB", self.size_bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Pasted and typed paths often come quoted or with a leading `~`.
fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}
