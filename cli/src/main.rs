//! papercast CLI - research paper summarization and narration

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use papercast::{
    acquire, detect_format_from_bytes, detect_format_from_path, DocumentFormat, Outcome,
    Pipeline, PipelineOptions, PipelineReport, ServiceOptions,
};

#[derive(Parser)]
#[command(name = "papercast")]
#[command(version)]
#[command(about = "Summarize and narrate a research paper", long_about = None)]
struct Cli {
    /// Input document (pdf, docx, or txt)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Fetch the paper by DOI instead of reading a file
    #[arg(long, value_name = "DOI")]
    doi: Option<String>,

    /// Fetch the paper from a URL instead of reading a file
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Comma-separated topics to classify against
    #[arg(short, long, value_name = "LIST", default_value = "")]
    topics: String,

    /// Declared document format (pdf, docx, plain-text); detected when omitted
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Skip image captioning
    #[arg(long)]
    no_captions: bool,

    /// Skip audio narration
    #[arg(long)]
    no_audio: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some((data, format, stem)) = resolve_document(&cli).await? else {
        // Acquisition came back empty: no document, nothing to process.
        println!("{}", "No document retrieved; nothing to do.".yellow());
        return Ok(());
    };

    let topics: Vec<String> = cli
        .topics
        .split(',')
        .map(|t| t.trim().to_string())
        .collect();

    let options = ServiceOptions::from_env()?;
    let pipeline = Pipeline::from_service_options(options)?.with_options(
        PipelineOptions::new()
            .with_captions(!cli.no_captions)
            .with_audio(!cli.no_audio),
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Processing {} document...", format));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let report = pipeline.run(&data, format, &topics).await?;
    spinner.finish_and_clear();

    print_report(&report);

    let output_dir = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_papercast", stem)));
    write_outputs(&report, &output_dir)?;

    Ok(())
}

/// Resolve the document bytes, format, and a name stem for outputs.
///
/// An uploaded file takes precedence over a DOI, which takes precedence
/// over a URL. Returns `None` when acquisition produced no document.
async fn resolve_document(
    cli: &Cli,
) -> Result<Option<(Vec<u8>, DocumentFormat, String)>, Box<dyn std::error::Error>> {
    let declared = cli
        .format
        .as_deref()
        .map(DocumentFormat::parse)
        .transpose()?;

    if let Some(ref path) = cli.input {
        let data = fs::read(path)?;
        let format = match declared {
            Some(format) => format,
            None => detect_format_from_path(path)
                .unwrap_or_else(|_| detect_format_from_bytes(&data)),
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "paper".to_string());
        return Ok(Some((data, format, stem)));
    }

    let client = reqwest::Client::new();

    if let Some(ref doi) = cli.doi {
        println!("{} {}", "Fetching DOI".cyan(), doi);
        let Some(data) = acquire::fetch_from_doi(&client, doi).await else {
            return Ok(None);
        };
        let format = declared.unwrap_or_else(|| detect_format_from_bytes(&data));
        let stem = doi.replace('/', "_");
        return Ok(Some((data, format, stem)));
    }

    if let Some(ref url) = cli.url {
        println!("{} {}", "Fetching".cyan(), url);
        let Some(data) = acquire::fetch_from_url(&client, url).await else {
            return Ok(None);
        };
        let format = declared.unwrap_or_else(|| detect_format_from_bytes(&data));
        return Ok(Some((data, format, "paper".to_string())));
    }

    Err("no input given: pass a FILE, --doi, or --url (see --help)".into())
}

fn print_report(report: &PipelineReport) {
    println!();
    println!("{}", "Document Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    match &report.summary {
        Outcome::Success(summary) => println!("{}", summary),
        Outcome::Failed(reason) => println!("{} {}", "unavailable:".yellow(), reason),
    }

    if !report.topics.is_empty() {
        println!();
        println!("{}", "Topic Syntheses".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for section in &report.topics {
            println!(
                "{} {}",
                section.topic.bold(),
                format!("({} matching units)", section.matched).dimmed()
            );
            match &section.summary {
                Outcome::Success(summary) => println!("{}", summary),
                Outcome::Failed(reason) => println!("{} {}", "unavailable:".yellow(), reason),
            }
            println!();
        }
    }

    if !report.images.is_empty() {
        println!();
        println!("{}", "Image Captions".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for image in &report.images {
            match &image.caption {
                Outcome::Success(caption) => {
                    println!("{}: {}", image.unit.label.bold(), caption)
                }
                Outcome::Failed(reason) => {
                    println!("{}: {}", image.unit.label.bold(), reason.yellow())
                }
            }
        }
    }
}

fn write_outputs(
    report: &PipelineReport,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    if let Some(summary) = report.summary.success() {
        fs::write(output_dir.join("summary.md"), summary)?;
    }
    if let Some(Outcome::Success(audio)) = &report.summary_audio {
        fs::write(output_dir.join("summary.mp3"), &audio.data)?;
    }

    if !report.topics.is_empty() {
        let topics_dir = output_dir.join("topics");
        fs::create_dir_all(&topics_dir)?;
        for section in &report.topics {
            let slug = slugify(&section.topic);
            if let Some(summary) = section.summary.success() {
                fs::write(topics_dir.join(format!("{}.md", slug)), summary)?;
            }
            if let Some(Outcome::Success(audio)) = &section.audio {
                fs::write(topics_dir.join(format!("{}.mp3", slug)), &audio.data)?;
            }
        }
    }

    if !report.images.is_empty() {
        let images_dir = output_dir.join("images");
        fs::create_dir_all(&images_dir)?;
        for (index, image) in report.images.iter().enumerate() {
            let filename = format!("image{}.{}", index + 1, image.unit.extension());
            fs::write(images_dir.join(filename), &image.unit.data)?;
        }
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(output_dir.join("report.json"), json)?;

    println!();
    println!(
        "{} {}",
        "Output written to".green().bold(),
        output_dir.display()
    );

    Ok(())
}

/// Turn a topic into a safe file name.
fn slugify(topic: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;
    for c in topic.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "topic".to_string()
    } else {
        slug
    }
}
