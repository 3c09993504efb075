//! External service boundary: summarization, captioning, and speech.
//!
//! The pipeline only talks to these traits; the bundled implementations
//! ([`ChatClient`], [`SpeechClient`]) speak OpenAI-compatible HTTP APIs
//! and can be swapped for anything else that implements the traits.

mod chat;
mod options;
mod speech;

pub use chat::ChatClient;
pub use options::ServiceOptions;
pub use speech::{SpeechClient, AUDIO_MEDIA_TYPE};

use async_trait::async_trait;

use crate::error::Result;

/// Opaque text-generation service used for document and topic syntheses.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate a summary of `content`, steered by `instruction`.
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String>;
}

/// Opaque image-captioning service.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Caption a PNG-encoded image.
    async fn caption(&self, png_data: &[u8]) -> Result<String>;
}

/// Opaque text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render text to binary audio.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
