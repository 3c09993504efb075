//! OpenAI-compatible text-to-speech client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{Error, Result};

use super::{ServiceOptions, SpeechSynthesizer};

/// MIME type of the audio the speech endpoint returns.
pub const AUDIO_MEDIA_TYPE: &str = "audio/mpeg";

/// Speech synthesis client.
pub struct SpeechClient {
    client: Client,
    options: ServiceOptions,
}

impl SpeechClient {
    /// Create a new client.
    pub fn new(options: ServiceOptions) -> Result<Self> {
        options.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self { client, options })
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/audio/speech", self.options.base_url);
        let request = SpeechRequest {
            model: &self.options.speech_model,
            voice: &self.options.voice,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.options.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Service { status, message });
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(Error::ServiceResponse(
                "speech response carried no audio".to_string(),
            ));
        }

        Ok(audio)
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}
