//! Output records and JSON / JSONL writing for menu scans.
//!
//! A scan produces one analysis followed by one image record per dish, in
//! completion order. JSONL streams them as they happen; JSON collects them
//! into a single report.

use crate::types::{DishImage, MenuAnalysis};
use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON report
    Json,
    /// One JSON record per line (newline-delimited JSON)
    JsonLines,
}

/// A single streamed record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRecord {
    /// The extracted menu
    Analysis(MenuAnalysis),
    /// One dish's image lookup
    Image(DishImage),
}

/// Everything a scan produced, for single-document output.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    #[serde(flatten)]
    pub analysis: MenuAnalysis,
    pub images: Vec<DishImage>,
}

/// A writer that serializes records to JSON or JSONL format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects JSON format; JSONL is always one line per record.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a single item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
