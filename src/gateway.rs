use std::sync::Arc;

use crate::error::GatewayError;
use crate::models::{GeminiContent, GeminiRequest, GenerationConfig, SafetySetting};
use crate::transport::Transport;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

pub fn generation_config() -> GenerationConfig {
    GenerationConfig {
        temperature: 0.7,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 2000,
    }
}

pub fn safety_settings() -> Vec<SafetySetting> {
    SAFETY_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: SAFETY_THRESHOLD.to_string(),
        })
        .collect()
}

/// Wraps assembled messages with the fixed generation and safety settings.
pub fn build_request(contents: Vec<GeminiContent>) -> GeminiRequest {
    GeminiRequest {
        contents,
        generation_config: generation_config(),
        safety_settings: safety_settings(),
    }
}

/// Sends one advice request and pulls out the first candidate's text.
pub struct AdviceGateway {
    tx: Arc<dyn Transport>,
}

impl AdviceGateway {
    pub fn new(tx: Arc<dyn Transport>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, messages: Vec<GeminiContent>) -> Result<String, GatewayError> {
        let request = build_request(messages);
        let response = self.tx.generate(&request).await?;

        if response.candidates.is_empty() {
            return Err(GatewayError::EmptyResponse(
                "No response generated".to_string(),
            ));
        }

        match response.first_text() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(GatewayError::EmptyResponse(
                "Empty response from API".to_string(),
            )),
        }
    }
}
