use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use anyhow::{Result, Context};

mod config;
mod commands;
mod error;

use config::Config;
use error::CliError;
use repeatx_core::io::ReportFormat;

#[derive(Parser)]
#[command(name = "repeatx")]
#[command(about = "RepeatX - tandem and reverse-complement repeat finder")]
#[command(version)]
#[command(long_about = "
RepeatX reports reference segments that recur back to back in a query sequence,
either verbatim or as reverse complements.

Examples:
  repeatx find --ref reference.fa --qry query.fa --out repeats.csv
  repeatx find --ref reference.txt --qry query.txt --min-length 20 --format details
  repeatx generate --out-dir synthetic --planted 10 --seed 7
  repeatx config --example > repeatx.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find repeats of reference segments in a query sequence
    Find(commands::find::FindArgs),

    /// Generate a synthetic reference/query pair with planted repeats
    Generate(commands::generate::GenerateArgs),

    /// Print or write configuration
    Config {
        /// Print the default configuration
        #[arg(long)]
        example: bool,

        /// Write the effective configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
    Details,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Tsv => ReportFormat::Tsv,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Details => ReportFormat::Details,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
        log::debug!("Using {} worker threads", threads);
    }

    match cli.command {
        Commands::Find(args) => commands::find::execute(&config, args)?,
        Commands::Generate(args) => commands::generate::execute(&config, args)?,
        Commands::Config { example, output } => {
            let effective = if example { Config::default() } else { config };
            match output {
                Some(path) => {
                    effective.save_to_file(&path)?;
                    log::info!("Configuration written to {}", path.display());
                }
                None if example => print!("{}", Config::example_toml()?),
                None => print!("{}", toml::to_string_pretty(&effective).context("Failed to serialize configuration")?),
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            error::print_error_and_exit(cli_err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
