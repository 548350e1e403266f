//! Rolling-hash window index
//!
//! Maps the hash of every window of a fixed length to the ascending list of
//! start positions where that window occurs. The index borrows the source
//! sequence so hash hits can be verified against actual content.

use std::collections::HashMap;

use super::utils::WindowHashes;
use crate::types::{Base, Position};

/// Hash-to-positions table for one sequence and one window length.
#[derive(Debug, Clone)]
pub struct WindowIndex<'a> {
    source: &'a [Base],
    window: usize,
    table: HashMap<u64, Vec<Position>>,
}

impl<'a> WindowIndex<'a> {
    pub fn window(&self) -> usize {
        self.window
    }

    /// The indexed sequence.
    pub fn source(&self) -> &'a [Base] {
        self.source
    }

    /// Start positions sharing `hash`, ascending. Empty when the hash is absent.
    pub fn positions(&self, hash: u64) -> &[Position] {
        self.table.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Content of the window starting at `position`.
    pub fn window_at(&self, position: Position) -> &'a [Base] {
        &self.source[position..position + self.window]
    }

    /// Number of distinct hashes stored.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Total number of indexed windows.
    pub fn total_positions(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }
}

/// Index every window of `window_length` in `sequence`.
///
/// Returns an empty index when the window is longer than the sequence or zero.
pub fn build_index(sequence: &[Base], window_length: usize) -> WindowIndex<'_> {
    let mut table: HashMap<u64, Vec<Position>> = HashMap::new();
    for (start, hash) in WindowHashes::new(sequence, window_length) {
        table.entry(hash).or_default().push(start);
    }

    WindowIndex {
        source: sequence,
        window: window_length,
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::utils::RollingHash;
    use crate::types::bases_from_ascii;

    #[test]
    fn test_index_positions_sorted_and_complete() {
        let seq = bases_from_ascii(b"ACGTACGTACGT");
        let index = build_index(&seq, 4);

        let acgt = RollingHash::of_window(&bases_from_ascii(b"ACGT"));
        assert_eq!(index.positions(acgt), &[0, 4, 8]);
        // ACGT, CGTA, GTAC, TACG
        assert_eq!(index.len(), 4);
        assert_eq!(index.total_positions(), seq.len() - 4 + 1);

        for hash in [acgt] {
            let positions = index.positions(hash);
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert!(positions.iter().all(|&p| p + 4 <= seq.len()));
        }
    }

    #[test]
    fn test_index_empty_when_window_too_long() {
        let seq = bases_from_ascii(b"ACG");
        let index = build_index(&seq, 4);
        assert!(index.is_empty());
        assert_eq!(index.total_positions(), 0);
    }

    #[test]
    fn test_missing_hash_yields_empty_slice() {
        let seq = bases_from_ascii(b"AAAAAA");
        let index = build_index(&seq, 3);
        let ccc = RollingHash::of_window(&bases_from_ascii(b"CCC"));
        assert!(index.positions(ccc).is_empty());
        assert_eq!(index.window_at(2), &bases_from_ascii(b"AAA")[..]);
    }

    #[test]
    fn test_unknown_windows_are_indexed() {
        let seq = bases_from_ascii(b"ANNA");
        let index = build_index(&seq, 2);
        let nn = RollingHash::of_window(&bases_from_ascii(b"NN"));
        assert_eq!(index.positions(nn), &[1]);
    }
}
