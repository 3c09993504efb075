//! OpenAI-compatible chat-completions client.
//!
//! One client backs both text summarization and image captioning; the
//! caption path sends the image as a base64 data URL content part.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{Captioner, ServiceOptions, Summarizer};

/// Instruction sent with every caption request.
const CAPTION_PROMPT: &str = "Caption this image in detail.";

/// Chat-completions client with bounded retry.
pub struct ChatClient {
    client: Client,
    options: ServiceOptions,
}

impl ChatClient {
    /// Create a new client.
    pub fn new(options: ServiceOptions) -> Result<Self> {
        options.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self { client, options })
    }

    /// Send a chat request, retrying on rate limits and transport errors.
    async fn send_request(&self, request: &ChatRequest<'_>) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.options.base_url);
        let mut retry_delay = Duration::from_secs(2);
        let max_retries = self.options.max_retries;

        for retry in 0..=max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.options.api_key)
                .json(request)
                .send()
                .await;

            match response {
                Ok(r) if r.status().as_u16() == 429 => {
                    log::warn!("chat service rate limited, retry {}/{}", retry + 1, max_retries);
                    continue;
                }
                Ok(r) if r.status().is_success() => {
                    let parsed: ChatResponse = r.json().await?;
                    return parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|choice| choice.message.content)
                        .ok_or_else(|| {
                            Error::ServiceResponse("chat response had no choices".to_string())
                        });
                }
                Ok(r) => {
                    let status = r.status().as_u16();
                    let message = r.text().await.unwrap_or_default();
                    return Err(Error::Service { status, message });
                }
                Err(e) => {
                    if retry == max_retries {
                        return Err(Error::Http(e));
                    }
                    log::warn!("chat request failed ({}), retry {}/{}", e, retry + 1, max_retries);
                }
            }
        }

        Err(Error::ServiceResponse("retry budget exhausted".to_string()))
    }
}

#[async_trait]
impl Summarizer for ChatClient {
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.options.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(instruction.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Text(content.to_string()),
                },
            ],
            max_tokens: self.options.max_tokens,
            temperature: 0.2,
        };

        self.send_request(&request).await
    }
}

#[async_trait]
impl Captioner for ChatClient {
    async fn caption(&self, png_data: &[u8]) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_data);
        let data_url = format!("data:image/png;base64,{}", encoded);

        let request = ChatRequest {
            model: &self.options.caption_model,
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: CAPTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            }],
            max_tokens: self.options.max_tokens,
            temperature: 0.2,
        };

        self.send_request(&request).await
    }
}

// API request/response types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
