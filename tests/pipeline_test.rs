//! Integration tests for the pipeline driver with scripted services.

use std::io::{Cursor, Write};
use std::sync::Arc;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use papercast::{
    Captioner, DocumentFormat, Error, Outcome, Pipeline, PipelineOptions, SpeechSynthesizer,
    Summarizer,
};

/// Echoes the delegated prompt so assertions can see the exact context.
struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, _instruction: &str, content: &str) -> papercast::Result<String> {
        Ok(format!("SUMMARY:{}", content))
    }
}

/// Fails whenever the delegated context contains the poison word.
struct PoisonSummarizer;

#[async_trait]
impl Summarizer for PoisonSummarizer {
    async fn summarize(&self, _instruction: &str, content: &str) -> papercast::Result<String> {
        if content.contains("poison") {
            Err(Error::Service {
                status: 500,
                message: "summarizer refused".to_string(),
            })
        } else {
            Ok("fine".to_string())
        }
    }
}

/// Captions by decoded image width; width 3 simulates a backend outage.
struct WidthCaptioner;

#[async_trait]
impl Captioner for WidthCaptioner {
    async fn caption(&self, png_data: &[u8]) -> papercast::Result<String> {
        let img = image::load_from_memory(png_data)
            .map_err(|e| Error::ServiceResponse(e.to_string()))?;
        if img.width() == 3 {
            return Err(Error::Service {
                status: 503,
                message: "caption backend down".to_string(),
            });
        }
        Ok(format!("an image {} pixels wide", img.width()))
    }
}

/// Returns a constant audio blob; fails when the text carries the marker.
struct MockSpeech;

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str) -> papercast::Result<Vec<u8>> {
        if text.contains("unspeakable") {
            return Err(Error::Service {
                status: 500,
                message: "voice lost".to_string(),
            });
        }
        Ok(b"ID3-fake-audio".to_vec())
    }
}

fn pipeline(summarizer: impl Summarizer + 'static) -> Pipeline {
    Pipeline::new(
        Arc::new(summarizer),
        Arc::new(WidthCaptioner),
        Arc::new(MockSpeech),
    )
}

fn png_of_width(width: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, 1);
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// DOCX with one paragraph and three images: widths 1 and 3 plus one
/// undecodable blob in the middle.
fn docx_with_images() -> Vec<u8> {
    let document_xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>A paper with figures.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    let rels_xml = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type=".../image" Target="media/image1.png"/>
  <Relationship Id="rId2" Type=".../image" Target="media/image2.png"/>
  <Relationship Id="rId3" Type=".../image" Target="media/image3.png"/>
</Relationships>"#;

    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();

        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(rels_xml.as_bytes()).unwrap();

        zip.start_file("word/media/image1.png", options).unwrap();
        zip.write_all(&png_of_width(1)).unwrap();

        zip.start_file("word/media/image2.png", options).unwrap();
        zip.write_all(b"not an image at all").unwrap();

        zip.start_file("word/media/image3.png", options).unwrap();
        zip.write_all(&png_of_width(3)).unwrap();

        zip.finish().unwrap();
    }
    buf
}

#[tokio::test]
async fn full_run_over_plain_text() {
    let data = b"alpha beta\ngamma delta";
    let topics = vec!["alpha".to_string(), "zulu".to_string(), String::new()];

    let report = pipeline(EchoSummarizer)
        .run(data, DocumentFormat::PlainText, &topics)
        .await
        .unwrap();

    assert_eq!(report.format, DocumentFormat::PlainText);
    assert_eq!(report.text_units, 1);

    // Document summary delegates the full concatenated context.
    let summary = report.summary.success().unwrap();
    assert!(summary.starts_with("SUMMARY:Summarize the following:"));
    assert!(summary.contains("alpha beta"));

    // Narration of the successful summary.
    let audio = report.summary_audio.as_ref().unwrap().success().unwrap();
    assert_eq!(audio.data, b"ID3-fake-audio");
    assert_eq!(audio.media_type, "audio/mpeg");

    // Only the matching topic is synthesized; "zulu" and the empty topic
    // never reach the service.
    assert_eq!(report.topics.len(), 1);
    let section = &report.topics[0];
    assert_eq!(section.topic, "alpha");
    assert_eq!(section.matched, 1);
    assert!(section.summary.success().unwrap().contains("alpha beta"));
    assert!(section.audio.as_ref().unwrap().is_success());

    assert!(report.images.is_empty());
}

#[tokio::test]
async fn caption_failures_keep_their_position() {
    let data = docx_with_images();

    let report = pipeline(EchoSummarizer)
        .run(&data, DocumentFormat::Docx, &[])
        .await
        .unwrap();

    // One entry per extracted image, in extraction order.
    assert_eq!(report.images.len(), 3);

    let first = &report.images[0];
    assert_eq!(first.unit.label, "Document Image 1");
    assert_eq!(
        first.caption,
        Outcome::Success("an image 1 pixels wide".to_string())
    );

    // Undecodable blob: preprocessing fails, marker holds the slot.
    let second = &report.images[1];
    assert_eq!(second.unit.label, "Document Image 2");
    assert!(second
        .caption
        .failure()
        .unwrap()
        .contains("Image encoding error"));

    // Service outage for the third image only.
    let third = &report.images[2];
    assert_eq!(third.unit.label, "Document Image 3");
    assert_eq!(
        third.caption.failure(),
        Some("Service error (503): caption backend down")
    );

    // No topics were supplied, so classification was skipped.
    assert!(report.topics.is_empty());
}

#[tokio::test]
async fn empty_document_short_circuits_synthesis() {
    let data = b"   \n\t\n  ";
    let topics = vec!["anything".to_string()];

    let report = pipeline(EchoSummarizer)
        .run(data, DocumentFormat::PlainText, &topics)
        .await
        .unwrap();

    assert_eq!(report.text_units, 0);
    assert_eq!(
        report.summary.failure(),
        Some("document contained no extractable text")
    );
    assert!(report.summary_audio.is_none());
    assert!(report.topics.is_empty());
}

#[tokio::test]
async fn topic_failure_is_isolated_and_unnarrated() {
    // Two windows: the second carries the poison word, so the document
    // summary (full context) and the second topic fail while the first
    // topic still succeeds.
    let mut lines: Vec<String> = vec!["topicone content is good".to_string()];
    lines.extend((2..=40).map(|i| format!("filler line {}", i)));
    lines.push("poison topictwo content".to_string());
    let data = lines.join("\n").into_bytes();

    let topics = vec!["topicone".to_string(), "topictwo".to_string()];

    let report = pipeline(PoisonSummarizer)
        .run(&data, DocumentFormat::PlainText, &topics)
        .await
        .unwrap();

    assert_eq!(report.text_units, 2);

    // Whole-document context contains the poison word.
    assert_eq!(
        report.summary.failure(),
        Some("Service error (500): summarizer refused")
    );
    assert!(report.summary_audio.is_none());

    assert_eq!(report.topics.len(), 2);
    assert_eq!(report.topics[0].topic, "topicone");
    assert!(report.topics[0].summary.is_success());
    assert!(report.topics[0].audio.as_ref().unwrap().is_success());

    assert_eq!(report.topics[1].topic, "topictwo");
    assert!(!report.topics[1].summary.is_success());
    // A failed summary is never narrated.
    assert!(report.topics[1].audio.is_none());
}

#[tokio::test]
async fn audio_failure_is_a_marker_not_a_fault() {
    // Summary succeeds but contains the marker the speech mock rejects.
    let data = b"this content is unspeakable";

    let report = pipeline(EchoSummarizer)
        .run(data, DocumentFormat::PlainText, &[])
        .await
        .unwrap();

    assert!(report.summary.is_success());
    let audio = report.summary_audio.as_ref().unwrap();
    assert_eq!(audio.failure(), Some("Service error (500): voice lost"));
}

#[tokio::test]
async fn options_disable_audio_and_captions() {
    let data = docx_with_images();

    let report = pipeline(EchoSummarizer)
        .with_options(PipelineOptions::new().with_captions(false).with_audio(false))
        .run(&data, DocumentFormat::Docx, &[])
        .await
        .unwrap();

    assert!(report.summary.is_success());
    assert!(report.summary_audio.is_none());

    // Images stay accounted for even with captioning disabled.
    assert_eq!(report.images.len(), 3);
    for image in &report.images {
        assert_eq!(image.caption.failure(), Some("captioning disabled"));
    }
}
