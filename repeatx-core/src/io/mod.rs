//! Sequence loading and report writing for RepeatX
//!
//! The engine itself never touches files; these modules sit on either side
//! of it.

#[cfg(feature = "io-fasta")] pub mod fasta;
pub mod report;

#[cfg(feature = "io-fasta")] pub use fasta::{write_fasta, FastaParser, FastaError, SequenceStatistics};
pub use report::{write_report, write_report_file, ReportError, ReportFormat, ReportResult};
