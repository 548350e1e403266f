//! Candidate seed discovery
//!
//! Slides a window over the probe (query) sequence, looks each window's hash
//! up in the forward reference index and in the index over the reference's
//! reverse complement, and keeps only hits whose content verifies.

use std::ops::Range;

use super::index::WindowIndex;
use super::utils::{windows_agree, WindowHashes};
use super::SeedParams;
use crate::types::{Base, Position, Strand};

/// A verified window match between reference and probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    /// Window start in the reference (forward coordinates for both strands)
    pub ref_pos: Position,
    /// Window start in the probe
    pub query_pos: Position,
    pub strand: Strand,
}

impl Seed {
    pub fn is_reverse(&self) -> bool {
        self.strand.is_reverse()
    }
}

/// Find seeds over every probe position.
///
/// `forward` indexes the reference, `reverse` indexes its reverse complement;
/// both must use `window_length`. Seeds come out ordered by probe position,
/// then reference position, forward before reverse.
pub fn find_seeds(
    forward: &WindowIndex<'_>,
    probe: &[Base],
    window_length: usize,
    reverse: &WindowIndex<'_>,
    params: &SeedParams,
) -> Vec<Seed> {
    find_seeds_in_range(forward, probe, window_length, reverse, params, 0..probe.len())
}

/// Find seeds for probe windows starting inside `probe_range`.
///
/// Disjoint ranges produce disjoint seed sets, so a probe scan can be split
/// across workers and concatenated in range order.
pub fn find_seeds_in_range(
    forward: &WindowIndex<'_>,
    probe: &[Base],
    window_length: usize,
    reverse: &WindowIndex<'_>,
    params: &SeedParams,
    probe_range: Range<Position>,
) -> Vec<Seed> {
    if window_length == 0
        || window_length > probe.len()
        || forward.window() != window_length
        || reverse.window() != window_length
    {
        log::trace!("No seeds for window {} (probe length {})", window_length, probe.len());
        return Vec::new();
    }

    let reference_len = forward.source().len();
    let mut seeds = Vec::new();
    let mut at_position: Vec<Seed> = Vec::new();
    let mut rejected = 0usize;

    for (query_pos, hash) in
        WindowHashes::with_range(probe, window_length, probe_range.start, probe_range.end)
    {
        let probe_window = &probe[query_pos..query_pos + window_length];
        at_position.clear();

        let forward_hits = verified_hits(forward, hash, probe_window, params, &mut rejected);
        at_position.extend(forward_hits.into_iter().map(|ref_pos| Seed {
            ref_pos,
            query_pos,
            strand: Strand::Forward,
        }));

        // Position p on the reverse complement covers reference
        // [len - p - L, len - p).
        let reverse_hits = verified_hits(reverse, hash, probe_window, params, &mut rejected);
        at_position.extend(reverse_hits.into_iter().map(|rc_pos| Seed {
            ref_pos: reference_len - rc_pos - window_length,
            query_pos,
            strand: Strand::Reverse,
        }));

        at_position.sort_by_key(|seed| (seed.ref_pos, seed.strand));
        seeds.extend_from_slice(&at_position);
    }

    log::trace!(
        "Window {}: {} seeds accepted, {} hash hits rejected on verification",
        window_length,
        seeds.len(),
        rejected
    );

    seeds
}

/// Positions in `index` whose window verifies against `probe_window`.
fn verified_hits(
    index: &WindowIndex<'_>,
    hash: u64,
    probe_window: &[Base],
    params: &SeedParams,
    rejected: &mut usize,
) -> Vec<Position> {
    let candidates = index.positions(hash);
    let mut accepted = Vec::with_capacity(candidates.len());

    for &position in candidates {
        if windows_agree(index.window_at(position), probe_window, params.similarity_threshold) {
            accepted.push(position);
        } else {
            *rejected += 1;
        }
    }

    if params.require_unique_anchor && accepted.len() != 1 {
        accepted.clear();
    }

    accepted
}
