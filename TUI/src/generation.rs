//! Ice-breaker and chat-reply generation on top of a [`GenerativeModel`].
//!
//! Both calls are single attempts and never fail outward: every error path
//! is logged and turned into a Spanish fallback line.

use std::sync::Arc;

use serde_json::Value;

use crate::gemini::{GenerationRequest, GenerativeModel};
use crate::image::ImageAttachment;
use crate::prompts::{
    chat_reply_prompt, ice_breaker_schema, FORMAT_FALLBACK, GENERATION_FALLBACK,
    ICE_BREAKER_PROMPT, REPLY_FALLBACK, TONE_BUCKETS, TONE_MAX,
};

#[derive(Clone)]
pub struct Generator {
    model: Arc<dyn GenerativeModel>,
}

impl Generator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Five short openers, or a single fallback line. Never empty.
    pub async fn generate_ice_breakers(&self) -> Vec<String> {
        let request = GenerationRequest {
            prompt: ICE_BREAKER_PROMPT.to_string(),
            image: None,
            response_schema: Some(ice_breaker_schema()),
        };

        let text = match self.model.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error generating ice breakers: {}", e);
                return vec![GENERATION_FALLBACK.to_string()];
            }
        };

        let json_text = text.trim();
        let parsed: Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(e) => {
                log::error!("Error generating ice breakers: {}", e);
                return vec![GENERATION_FALLBACK.to_string()];
            }
        };

        match extract_ice_breakers(&parsed) {
            Some(lines) => lines,
            None => {
                log::error!("Unexpected response format from API: {}", json_text);
                vec![FORMAT_FALLBACK.to_string()]
            }
        }
    }

    /// One reply to the other person's latest message in the screenshot.
    pub async fn generate_chat_reply(&self, image: &ImageAttachment, tone: u8) -> String {
        let request = GenerationRequest {
            prompt: chat_reply_prompt(tone_to_description(tone)),
            image: Some(image.inline()),
            response_schema: None,
        };

        match self.model.generate(request).await {
            Ok(text) => {
                let reply = clean_reply(&text);
                if reply.is_empty() {
                    log::warn!("Model returned an empty reply");
                    REPLY_FALLBACK.to_string()
                } else {
                    reply
                }
            }
            Err(e) => {
                log::error!("Error generating chat reply: {}", e);
                REPLY_FALLBACK.to_string()
            }
        }
    }
}

/// `ice_breakers` as a non-empty array of strings, or `None`.
fn extract_ice_breakers(value: &Value) -> Option<Vec<String>> {
    let lines = value
        .get("ice_breakers")?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()?;

    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

/// Style instruction for a slider value. Values above 100 land in the top bucket.
pub fn tone_to_description(tone: u8) -> &'static str {
    TONE_BUCKETS
        .iter()
        .find(|(upper, _)| tone <= *upper)
        .map(|(_, description)| *description)
        .unwrap_or(TONE_MAX)
}

/// Trim, then drop one pair of surrounding double quotes.
pub fn clean_reply(text: &str) -> String {
    let reply = text.trim();
    if reply.len() >= 2 && reply.starts_with('"') && reply.ends_with('"') {
        reply[1..reply.len() - 1].to_string()
    } else {
        reply.to_string()
    }
}
