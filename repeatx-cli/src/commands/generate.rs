//! Generate command implementation - write a synthetic pair and its answer key

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use repeatx_core::io::{write_fasta, write_report_file, ReportFormat};
use repeatx_core::{Sequence, SyntheticPair, SyntheticParams};

use crate::config::Config;
use crate::error::CliError;

pub const REFERENCE_FILE: &str = "reference.fa";
pub const QUERY_FILE: &str = "query.fa";
pub const ANSWER_KEY_FILE: &str = "answer_key.csv";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory receiving reference.fa, query.fa and answer_key.csv
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Reference length in bases
    #[arg(long)]
    pub reference_length: Option<usize>,

    /// Number of planted repeats
    #[arg(long)]
    pub planted: Option<usize>,

    /// Shortest planted unit
    #[arg(long)]
    pub min_unit: Option<usize>,

    /// Longest planted unit
    #[arg(long)]
    pub max_unit: Option<usize>,

    /// Most copies after the first one
    #[arg(long)]
    pub max_copies: Option<usize>,

    /// Probability that a planted repeat is reverse-complemented
    #[arg(long)]
    pub reverse_fraction: Option<f64>,

    /// Random bases around each planted run
    #[arg(long)]
    pub spacer: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(config: &Config, args: GenerateArgs) -> Result<()> {
    let params = build_synthetic_params(config, &args);
    let pair = SyntheticPair::generate(&params).map_err(|e| CliError::config(e.to_string()))?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory {}", args.out_dir.display()))?;

    let line_width = config.output.line_width;
    write_sequence(&args.out_dir.join(REFERENCE_FILE), &pair.reference, line_width)?;
    write_sequence(&args.out_dir.join(QUERY_FILE), &pair.query, line_width)?;

    let answer_key = args.out_dir.join(ANSWER_KEY_FILE);
    write_report_file(&answer_key, &pair.planted, ReportFormat::Csv)
        .map_err(|e| CliError::output(format!("{}: {}", answer_key.display(), e)))?;

    log::info!(
        "Wrote reference ({} bp), query ({} bp) and {} planted repeats to {}",
        pair.reference.len(),
        pair.query.len(),
        pair.planted.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn build_synthetic_params(config: &Config, args: &GenerateArgs) -> SyntheticParams {
    let defaults = &config.generate;
    SyntheticParams {
        reference_length: args.reference_length.unwrap_or(defaults.reference_length),
        planted: args.planted.unwrap_or(defaults.planted),
        min_unit_length: args.min_unit.unwrap_or(defaults.min_unit_length),
        max_unit_length: args.max_unit.unwrap_or(defaults.max_unit_length),
        max_extra_copies: args.max_copies.unwrap_or(defaults.max_extra_copies),
        reverse_fraction: args.reverse_fraction.unwrap_or(defaults.reverse_fraction),
        spacer_length: args.spacer.unwrap_or(defaults.spacer_length),
        seed: args.seed.unwrap_or(defaults.seed),
    }
}

fn write_sequence(path: &Path, sequence: &Sequence, line_width: usize) -> Result<()> {
    let file = File::create(path).map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    write_fasta(&mut writer, sequence, line_width)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::find::{self, FindArgs};
    use repeatx_core::io::FastaParser;

    fn args(out_dir: PathBuf) -> GenerateArgs {
        GenerateArgs {
            out_dir,
            reference_length: Some(600),
            planted: Some(3),
            min_unit: Some(15),
            max_unit: Some(30),
            max_copies: None,
            reverse_fraction: None,
            spacer: None,
            seed: Some(5),
        }
    }

    #[test]
    fn test_generate_writes_pair_and_answer_key() {
        let dir = tempfile::tempdir().unwrap();
        execute(&Config::default(), args(dir.path().to_path_buf())).unwrap();

        let reference = FastaParser::load_single(dir.path().join(REFERENCE_FILE)).unwrap();
        assert_eq!(reference.len(), 600);

        let fasta = std::fs::read_to_string(dir.path().join(QUERY_FILE)).unwrap();
        assert!(fasta.lines().skip(1).all(|line| line.len() <= 80));

        let key = std::fs::read_to_string(dir.path().join(ANSWER_KEY_FILE)).unwrap();
        assert_eq!(key.lines().count(), 4);
    }

    #[test]
    fn test_generated_pair_round_trips_through_find() {
        let dir = tempfile::tempdir().unwrap();
        execute(&Config::default(), args(dir.path().to_path_buf())).unwrap();

        let report = dir.path().join("found.csv");
        let find_args = FindArgs {
            reference: dir.path().join(REFERENCE_FILE),
            query: dir.path().join(QUERY_FILE),
            out: Some(report.clone()),
            format: None,
            min_length: Some(15),
            max_length: Some(30),
            similarity: None,
            max_results: None,
            unique_anchor: false,
        };
        find::execute(&Config::default(), find_args).unwrap();

        let found = std::fs::read_to_string(report).unwrap();
        let key = std::fs::read_to_string(dir.path().join(ANSWER_KEY_FILE)).unwrap();
        for planted in key.lines().skip(1) {
            assert!(found.lines().any(|line| line == planted), "missing {}", planted);
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.generate.spacer_length = 10;
        let params = build_synthetic_params(&config, &args(PathBuf::from(".")));
        assert_eq!(params.reference_length, 600);
        assert_eq!(params.spacer_length, 10);
        assert_eq!(params.seed, 5);
    }

    #[test]
    fn test_invalid_params_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = args(dir.path().to_path_buf());
        bad.min_unit = Some(40);
        let err = execute(&Config::default(), bad).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Config { .. })));
    }
}
