//! Error handling for RepeatX CLI

use thiserror::Error;
use std::path::PathBuf;

/// User-facing failures that come with suggestions
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid sequence input in {file}: {message}")]
    InvalidInput { file: String, message: String },

    #[error("Output error: {message}")]
    Output { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_input<F: Into<String>, S: Into<String>>(file: F, message: S) -> Self {
        Self::InvalidInput {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output { message: message.into() }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidInput { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use FASTA, FASTQ (optionally .gz) or a bare ACGT text file\n\
                 • Make sure the file holds at least one non-empty sequence",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your repeatx.toml configuration file\n\
                 • Use 'repeatx config --example' to generate a sample configuration\n\
                 • Window lengths need 1 <= min <= max and similarity must be in (0, 1]",
            );
        }

        CliError::Output { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the output directory exists and is writable",
            );
        }
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
