//! Repeat report writers
//!
//! Tables carry one row per repeat with the columns in [`TABLE_COLUMNS`].
//! Positions are 0-based run starts.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::types::RepeatPattern;

pub const TABLE_COLUMNS: [&str; 6] = [
    "reference_position",
    "length",
    "repeat_count",
    "is_reverse",
    "anchor_sequence",
    "query_position",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown report format '{0}' (expected csv, tsv, json or details)")]
    UnknownFormat(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Tsv,
    Json,
    /// Numbered human-readable blocks
    Details,
}

impl ReportFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("tsv") => ReportFormat::Tsv,
            Some("json") => ReportFormat::Json,
            Some("txt") => ReportFormat::Details,
            _ => ReportFormat::Csv,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            "json" => Ok(ReportFormat::Json),
            "details" | "txt" => Ok(ReportFormat::Details),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
            ReportFormat::Json => "json",
            ReportFormat::Details => "details",
        };
        f.write_str(name)
    }
}

/// Write `repeats` to `writer` in the given format.
pub fn write_report<W: Write>(
    writer: &mut W,
    repeats: &[RepeatPattern],
    format: ReportFormat,
) -> ReportResult<()> {
    match format {
        ReportFormat::Csv => write_table(writer, repeats, ','),
        ReportFormat::Tsv => write_table(writer, repeats, '\t'),
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, repeats)?;
            writeln!(writer)?;
            Ok(())
        }
        ReportFormat::Details => write_details(writer, repeats),
    }
}

/// Create (or truncate) `path` and write the report to it.
pub fn write_report_file<P: AsRef<Path>>(
    path: P,
    repeats: &[RepeatPattern],
    format: ReportFormat,
) -> ReportResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_report(&mut writer, repeats, format)?;
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, repeats: &[RepeatPattern], separator: char) -> ReportResult<()> {
    let header = TABLE_COLUMNS.join(&separator.to_string());
    writeln!(writer, "{}", header)?;
    for repeat in repeats {
        writeln!(
            writer,
            "{1}{0}{2}{0}{3}{0}{4}{0}{5}{0}{6}",
            separator,
            repeat.reference_position,
            repeat.length,
            repeat.repeat_count,
            repeat.is_reverse,
            repeat.anchor_string(),
            repeat.query_position,
        )?;
    }
    Ok(())
}

fn write_details<W: Write>(writer: &mut W, repeats: &[RepeatPattern]) -> ReportResult<()> {
    for (i, repeat) in repeats.iter().enumerate() {
        writeln!(writer, "Repeat #{}:", i + 1)?;
        writeln!(writer, "  Reference position: {}", repeat.reference_position)?;
        writeln!(writer, "  Length: {}", repeat.length)?;
        writeln!(writer, "  Repeat count: {}", repeat.repeat_count)?;
        writeln!(writer, "  Strand: {}", repeat.strand())?;
        writeln!(writer, "  Anchor sequence: {}", repeat.anchor_string())?;
        writeln!(writer, "  Query position: {}", repeat.query_position)?;
        writeln!(writer)?;
    }
    Ok(())
}
