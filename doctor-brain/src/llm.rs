use crate::config::Settings;
use crate::error::ModelError;
use crate::models::{PromptContent, PromptPart};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use serde_json::{Value, json};
use std::io::Cursor;
use tracing::info;

/// A generative model that turns an ordered prompt into raw reply text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, content: &PromptContent) -> Result<String, ModelError>;
}

/// Vision-capable chat completion over the OpenRouter API.
pub struct OpenRouterModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenRouterModel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_tokens: settings.max_tokens,
        }
    }
}

#[async_trait]
impl GenerativeModel for OpenRouterModel {
    async fn generate(&self, content: &PromptContent) -> Result<String, ModelError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": to_message_content(content)?
                }
            ],
            "max_tokens": self.max_tokens
        });

        info!(
            "Calling {} with {} prompt parts ({} images)",
            self.model,
            content.len(),
            content.image_count()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ModelError::Status(response.status()));
        }

        let response_json: Value = response.json().await?;
        extract_reply_text(&response_json)
    }
}

/// Map prompt parts onto the chat-completions multi-part content array.
fn to_message_content(content: &PromptContent) -> Result<Vec<Value>, ModelError> {
    content
        .parts()
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => Ok(json!({
                "type": "text",
                "text": text
            })),
            PromptPart::Image(image) => Ok(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/png;base64,{}", image_to_base64(image)?)
                }
            })),
        })
        .collect()
}

fn extract_reply_text(response_json: &Value) -> Result<String, ModelError> {
    response_json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ModelError::InvalidResponse)
}

fn image_to_base64(image: &DynamicImage) -> Result<String, ModelError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(STANDARD.encode(&buffer))
}
