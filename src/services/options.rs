//! Configuration for the bundled service clients.

use crate::error::{Error, Result};

/// Options shared by the chat and speech clients.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Bearer token for the service
    pub api_key: String,

    /// Base URL of the API (no trailing slash)
    pub base_url: String,

    /// Model used for text summarization
    pub chat_model: String,

    /// Model used for image captioning
    pub caption_model: String,

    /// Model used for speech synthesis
    pub speech_model: String,

    /// Voice preset for speech synthesis
    pub voice: String,

    /// Upper bound on generated summary tokens
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for rate-limited or failed requests
    pub max_retries: u32,
}

impl ServiceOptions {
    /// Create options with the given API key and defaults for the rest.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read options from the environment.
    ///
    /// `PAPERCAST_API_KEY` is required; `PAPERCAST_BASE_URL`,
    /// `PAPERCAST_CHAT_MODEL`, `PAPERCAST_CAPTION_MODEL`,
    /// `PAPERCAST_SPEECH_MODEL`, and `PAPERCAST_VOICE` override the
    /// defaults when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PAPERCAST_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("PAPERCAST_API_KEY is not set".to_string()))?;

        let mut options = Self::new(api_key);

        if let Ok(base_url) = std::env::var("PAPERCAST_BASE_URL") {
            options.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("PAPERCAST_CHAT_MODEL") {
            options.chat_model = model;
        }
        if let Ok(model) = std::env::var("PAPERCAST_CAPTION_MODEL") {
            options.caption_model = model;
        }
        if let Ok(model) = std::env::var("PAPERCAST_SPEECH_MODEL") {
            options.speech_model = model;
        }
        if let Ok(voice) = std::env::var("PAPERCAST_VOICE") {
            options.voice = voice;
        }

        Ok(options)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the summarization model.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the captioning model.
    pub fn with_caption_model(mut self, model: impl Into<String>) -> Self {
        self.caption_model = model.into();
        self
    }

    /// Set the speech model.
    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    /// Set the speech voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the generation token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Validate that the options can back a client.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key is empty".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base URL is empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            caption_model: "gpt-4o-mini".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            max_tokens: 1024,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}
