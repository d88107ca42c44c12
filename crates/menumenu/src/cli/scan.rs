//! The `menumenu scan` command: analyze a local menu photo.
//!
//! Runs the extractor once, then looks up an image for every dish. With
//! JSONL the analysis and each image record are streamed as they complete;
//! with JSON everything is collected into one report.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use menumenu_core::{
    Config, DishImage, FanOutStats, ImageInput, MenuMenu, OutputFormat as CoreOutputFormat,
    OutputRecord, OutputWriter, ScanReport,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// One JSON report with the analysis and all images
    Json,
    /// One JSON record per line, streamed
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Menu photo (JPEG, PNG, WebP, GIF or HEIC)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Translate into this language instead of `analysis.target_language`
    #[arg(short, long)]
    pub language: Option<String>,

    /// Maximum simultaneous image lookups (overrides `fanout.max_concurrent`)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Only analyze the menu; skip image lookups
    #[arg(long)]
    pub no_images: bool,
}

/// Options for one scan run, detached from clap.
struct ScanOptions<'a> {
    language: Option<&'a str>,
    parallel: Option<usize>,
    images: bool,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {:?}", args.input))?;
    let image = ImageInput::from_bytes(&bytes, &image_format(&args.input));

    let menu = MenuMenu::new(config)?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {path:?}"))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    let mut writer = OutputWriter::new(sink, args.format.into(), true);

    let options = ScanOptions {
        language: args.language.as_deref(),
        parallel: args.parallel,
        images: !args.no_images,
    };
    let stats = run_scan(&menu, image, &options, &mut writer).await?;

    if let Some(stats) = stats {
        log_fanout_stats(stats);
    }
    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}

/// Analyze, then fan out, writing records as configured.
///
/// Returns the fan-out tally, or `None` when images were skipped.
async fn run_scan<W: Write>(
    menu: &MenuMenu,
    image: ImageInput,
    options: &ScanOptions<'_>,
    writer: &mut OutputWriter<W>,
) -> anyhow::Result<Option<FanOutStats>> {
    let analysis = menu.extractor().analyze(image, options.language).await?;
    tracing::info!(
        "Found {} dishes on a {} menu",
        analysis.dishes.len(),
        analysis.detected_language
    );

    let streaming = writer.format() == CoreOutputFormat::JsonLines;
    if streaming {
        writer.write(&OutputRecord::Analysis(analysis.clone()))?;
        writer.flush()?;
    }

    if !options.images {
        if !streaming {
            writer.write(&analysis)?;
        }
        writer.flush()?;
        return Ok(None);
    }

    let progress = create_progress_bar(analysis.dishes.len() as u64);
    let fanout = menu.fanout(options.parallel);
    let (tx, mut rx) = mpsc::unbounded_channel::<DishImage>();

    let lookups = fanout.resolve_all(&analysis.dishes, move |image| {
        // Receiver only goes away if writing failed
        let _ = tx.send(image);
    });
    let drain = async {
        let mut collected = Vec::new();
        while let Some(image) = rx.recv().await {
            if let Some(dish) = analysis.dish(&image.dish_id) {
                progress.set_message(dish.translated_name.clone());
            }
            progress.inc(1);
            if streaming {
                writer.write(&OutputRecord::Image(image))?;
                writer.flush()?;
            } else {
                collected.push(image);
            }
        }
        Ok::<_, std::io::Error>(collected)
    };

    let (stats, collected) = tokio::join!(lookups, drain);
    progress.finish_and_clear();
    let images = collected?;

    if !streaming {
        writer.write(&ScanReport { analysis, images })?;
    }
    writer.flush()?;
    Ok(Some(stats))
}

/// Image format from the file extension; unknown extensions are sent as JPEG.
fn image_format(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpeg".to_string())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

fn log_fanout_stats(stats: FanOutStats) {
    if stats.failed > 0 {
        tracing::warn!(
            "Image lookup: {} found, {} without image, {} failed",
            stats.found,
            stats.empty,
            stats.failed
        );
    } else {
        tracing::info!(
            "Image lookup: {} found, {} without image",
            stats.found,
            stats.empty
        );
    }
}
