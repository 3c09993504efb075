//! The pipeline driver: one document in, one report out.

use std::io::Cursor;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use image::ImageFormat;

use crate::classify::classify;
use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::extract::ExtractorRegistry;
use crate::model::{
    AudioAsset, CaptionedImage, ImageUnit, Outcome, PipelineReport, TopicSection,
};
use crate::services::{
    Captioner, ChatClient, ServiceOptions, SpeechClient, SpeechSynthesizer, Summarizer,
    AUDIO_MEDIA_TYPE,
};
use crate::synthesize::{synthesize_document, synthesize_topics};

/// Largest width/height forwarded to the captioning service; bigger
/// images are scaled down before PNG re-encoding.
const MAX_CAPTION_DIMENSION: u32 = 1600;

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Whether to call the captioning service for extracted images
    pub caption_images: bool,

    /// Whether to narrate summaries through the speech service
    pub generate_audio: bool,
}

impl PipelineOptions {
    /// Create options with defaults (captions and audio enabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable image captioning.
    pub fn with_captions(mut self, caption_images: bool) -> Self {
        self.caption_images = caption_images;
        self
    }

    /// Enable or disable audio narration.
    pub fn with_audio(mut self, generate_audio: bool) -> Self {
        self.generate_audio = generate_audio;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            caption_images: true,
            generate_audio: true,
        }
    }
}

/// Sequences extraction, captioning, classification, synthesis, and
/// narration for a single document.
///
/// The pipeline owns nothing mutable across runs; each [`run`] returns a
/// fresh [`PipelineReport`] to the caller.
///
/// [`run`]: Pipeline::run
pub struct Pipeline {
    summarizer: Arc<dyn Summarizer>,
    captioner: Arc<dyn Captioner>,
    speech: Arc<dyn SpeechSynthesizer>,
    registry: ExtractorRegistry,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline over explicit service implementations.
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        captioner: Arc<dyn Captioner>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            summarizer,
            captioner,
            speech,
            registry: ExtractorRegistry::with_defaults(),
            options: PipelineOptions::default(),
        }
    }

    /// Create a pipeline backed by the bundled HTTP clients.
    pub fn from_service_options(options: ServiceOptions) -> Result<Self> {
        let chat = Arc::new(ChatClient::new(options.clone())?);
        let speech = Arc::new(SpeechClient::new(options)?);
        Ok(Self::new(chat.clone(), chat, speech))
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Process one document end to end.
    ///
    /// Stages run in strict sequence: extract, caption each image,
    /// classify against the topics, synthesize the document and each
    /// non-empty topic bucket, then narrate every successful summary.
    /// Service failures surface as [`Outcome::Failed`] markers at their
    /// position or key; they never abort sibling work.
    pub async fn run(
        &self,
        data: &[u8],
        format: DocumentFormat,
        topics: &[String],
    ) -> Result<PipelineReport> {
        let extraction = self.registry.extract(data, format)?;
        log::info!(
            "extracted {} text units and {} images",
            extraction.text_units.len(),
            extraction.image_units.len()
        );

        // Captions pair with image units strictly by position; a failed
        // caption occupies its slot as a marker.
        let captions: Vec<Outcome<String>> = join_all(
            extraction
                .image_units
                .iter()
                .map(|unit| self.caption_unit(unit)),
        )
        .await;

        let buckets = if topics.iter().any(|t| !t.trim().is_empty()) {
            classify(&extraction.text_units, topics)
        } else {
            Default::default()
        };

        let summary = if extraction.text_units.is_empty() {
            Outcome::Failed("document contained no extractable text".to_string())
        } else {
            Outcome::from_result(
                synthesize_document(self.summarizer.as_ref(), &extraction.text_units).await,
            )
        };

        let topic_summaries = synthesize_topics(self.summarizer.as_ref(), &buckets).await;

        let summary_audio = self.narrate_summary(&summary).await;

        let topic_sections: Vec<TopicSection> = join_all(topic_summaries.into_iter().map(
            |(topic, outcome)| {
                let matched = buckets.get(&topic).map(|b| b.len()).unwrap_or(0);
                async move {
                    let audio = self.narrate_summary(&outcome).await;
                    TopicSection {
                        topic,
                        matched,
                        summary: outcome,
                        audio,
                    }
                }
            },
        ))
        .await;

        let text_units = extraction.text_units.len();
        let images: Vec<CaptionedImage> = extraction
            .image_units
            .into_iter()
            .zip(captions)
            .map(|(unit, caption)| CaptionedImage { unit, caption })
            .collect();

        Ok(PipelineReport {
            format,
            generated_at: Utc::now(),
            text_units,
            summary,
            summary_audio,
            topics: topic_sections,
            images,
        })
    }

    /// Caption one image unit, capturing preprocessing and service
    /// failures as markers.
    async fn caption_unit(&self, unit: &ImageUnit) -> Outcome<String> {
        if !self.options.caption_images {
            return Outcome::Failed("captioning disabled".to_string());
        }

        let png = match prepare_png(&unit.data) {
            Ok(png) => png,
            Err(e) => {
                log::warn!("could not prepare {} for captioning: {}", unit.label, e);
                return Outcome::Failed(e.to_string());
            }
        };

        Outcome::from_result(self.captioner.caption(&png).await)
    }

    /// Narrate a summary outcome, skipping failed summaries entirely.
    async fn narrate_summary(&self, summary: &Outcome<String>) -> Option<Outcome<AudioAsset>> {
        if !self.options.generate_audio {
            return None;
        }

        let text = summary.success()?;
        let result = self
            .speech
            .synthesize(text)
            .await
            .map(|data| AudioAsset::new(data, AUDIO_MEDIA_TYPE));
        Some(Outcome::from_result(result))
    }
}

/// Re-encode raw embedded image bytes as PNG for the captioning service,
/// downscaling oversized images.
pub fn prepare_png(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| Error::ImageEncode(format!("failed to decode image: {}", e)))?;

    let (width, height) = (img.width(), img.height());
    let img = if width > MAX_CAPTION_DIMENSION || height > MAX_CAPTION_DIMENSION {
        let scale = MAX_CAPTION_DIMENSION as f32 / width.max(height) as f32;
        img.resize(
            (width as f32 * scale) as u32,
            (height as f32 * scale) as u32,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        img
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| Error::ImageEncode(format!("failed to encode PNG: {}", e)))?;

    Ok(buffer)
}
