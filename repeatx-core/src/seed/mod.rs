//! Seeding for RepeatX
//!
//! Builds rolling-hash window indexes over the reference and its reverse
//! complement, then scans the query for verified window matches that the
//! extender grows into maximal spans.

pub use crate::types::Strand;

pub mod finder;
pub mod index;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use finder::{find_seeds, find_seeds_in_range, Seed};
pub use index::{build_index, WindowIndex};

/// Verification rules applied to every hash hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedParams {
    /// Minimum identity fraction between hit windows; 1.0 means exact
    pub similarity_threshold: f64,
    /// Accept a window only when it verifies at exactly one reference position
    pub require_unique_anchor: bool,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 1.0,
            require_unique_anchor: false,
        }
    }
}
