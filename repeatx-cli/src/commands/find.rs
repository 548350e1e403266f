//! Find command implementation - run the repeat finder over two sequence files

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use repeatx_core::io::{write_report, write_report_file, FastaParser, ReportFormat, SequenceStatistics};
use repeatx_core::{FinderParams, RepeatFinder, RepeatPattern, Sequence};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Reference sequence file (FASTA/FASTQ/plain text, optionally .gz)
    #[arg(long = "ref", required = true)]
    pub reference: PathBuf,

    /// Query sequence file (FASTA/FASTQ/plain text, optionally .gz)
    #[arg(long = "qry", required = true)]
    pub query: PathBuf,

    /// Report file; written to stdout when omitted
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Report format (defaults to the configured format, then the output extension)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shortest seed window
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Longest seed window
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Minimum identity for a hash hit to count as a seed, in (0, 1]
    #[arg(long)]
    pub similarity: Option<f64>,

    /// Maximum number of repeats reported
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Only seed windows that occur once in the reference
    #[arg(long)]
    pub unique_anchor: bool,
}

pub fn execute(config: &Config, args: FindArgs) -> Result<()> {
    log::info!("Reference: {}", args.reference.display());
    log::info!("Query: {}", args.query.display());

    let params = build_finder_params(config, &args);
    let finder = RepeatFinder::new(params).map_err(|e| CliError::config(e.to_string()))?;
    let format = resolve_format(config, &args)?;

    let reference = load_sequence(&args.reference).context("Failed to load reference sequence")?;
    let query = load_sequence(&args.query).context("Failed to load query sequence")?;

    let started = Instant::now();
    let repeats = finder.find_repeats(reference.bases(), query.bases())?;
    log::info!(
        "Found {} repeat(s) in {:.2} ms",
        repeats.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    log_top_repeats(&repeats, config.output.top);

    match &args.out {
        Some(path) => {
            write_report_file(path, &repeats, format)
                .map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
            log::info!("Wrote {} report to {}", format, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&mut stdout.lock(), &repeats, format)
                .map_err(|e| CliError::output(e.to_string()))?;
        }
    }

    Ok(())
}

/// Configured engine parameters with command-line overrides applied.
fn build_finder_params(config: &Config, args: &FindArgs) -> FinderParams {
    let mut params = config.finder.clone();
    if let Some(min) = args.min_length {
        params.min_window_length = min;
    }
    if let Some(max) = args.max_length {
        params.max_window_length = max;
    }
    if let Some(similarity) = args.similarity {
        params.similarity_threshold = similarity;
    }
    if let Some(max_results) = args.max_results {
        params.max_results = max_results;
    }
    if args.unique_anchor {
        params.require_unique_anchor = true;
    }
    log::debug!("Finder parameters: {:?}", params);
    params
}

/// Flag, then config, then output extension, then CSV.
fn resolve_format(config: &Config, args: &FindArgs) -> CliResult<ReportFormat> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    if let Some(format) = config.output.report_format()? {
        return Ok(format);
    }
    Ok(args
        .out
        .as_deref()
        .map(ReportFormat::from_path)
        .unwrap_or(ReportFormat::Csv))
}

fn load_sequence(path: &Path) -> Result<Sequence> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }

    let sequence = FastaParser::load_single(path)
        .map_err(|e| CliError::invalid_input(path.display().to_string(), format!("{:#}", e)))?;

    let stats = SequenceStatistics::from_sequences(std::slice::from_ref(&sequence));
    log::info!(
        "Loaded {} ({} bp, GC {:.1}%, unknown {:.2}%)",
        sequence.id,
        stats.total_length,
        stats.gc_content,
        stats.unknown_content
    );
    if stats.unknown_content > 0.0 {
        log::warn!("{} contains unknown symbols; they never match", sequence.id);
    }

    Ok(sequence)
}

fn log_top_repeats(repeats: &[RepeatPattern], top: usize) {
    for (i, repeat) in repeats.iter().take(top).enumerate() {
        log::info!(
            "Repeat #{}: position {}, length {}, extra copies {}, strand {}, query {}",
            i + 1,
            repeat.reference_position,
            repeat.length,
            repeat.repeat_count,
            repeat.strand(),
            repeat.query_position
        );
    }
}
