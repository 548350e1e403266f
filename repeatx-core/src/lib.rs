//! RepeatX Core Library
//!
//! Hash-indexed seed-and-extend detection of reference segments that recur
//! back to back in a query, verbatim or reverse-complemented.

pub mod types;
pub mod seed;
pub mod extend;
pub mod tandem;
pub mod rank;
pub mod engine;
pub mod io;
#[cfg(feature = "synth")] pub mod synth;

// Re-export commonly used types and functions
pub use types::{reverse_complement, Base, Position, RepeatPattern, Sequence, Strand};
pub use seed::{build_index, find_seeds, Seed, SeedParams, WindowIndex};
pub use extend::{extend, MatchSpan};
pub use tandem::{count_run, following_copies};
pub use rank::finalize;
pub use engine::{find_repeats, FinderError, FinderParams, FinderResult, RepeatFinder};
pub use io::{write_report, ReportFormat};
#[cfg(feature = "synth")]
pub use synth::{SyntheticPair, SyntheticParams};

/// Version information for the RepeatX core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
