//! Match extension
//!
//! Grows a verified seed greedily in both directions to the maximal exactly
//! matching span. On the reverse strand the probe and reference walk in
//! opposite directions and each reference base is compared through its
//! complement.

use crate::types::{reverse_complement, Base, Position, Strand};

/// A maximal match between a reference interval and a probe interval of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    /// Start of the span in the reference
    pub ref_start: Position,
    /// Start of the span in the probe
    pub query_start: Position,
    pub length: usize,
    pub strand: Strand,
}

impl MatchSpan {
    /// The unextended seed window as a span.
    pub fn seed(ref_pos: Position, query_pos: Position, length: usize, strand: Strand) -> Self {
        Self {
            ref_start: ref_pos,
            query_start: query_pos,
            length,
            strand,
        }
    }

    pub fn query_end(&self) -> Position {
        self.query_start + self.length
    }

    /// The span's reference segment as it reads in the probe.
    pub fn segment(&self, reference: &[Base]) -> Vec<Base> {
        let forward = &reference[self.ref_start..self.ref_start + self.length];
        match self.strand {
            Strand::Forward => forward.to_vec(),
            Strand::Reverse => reverse_complement(forward),
        }
    }

    /// Whether a seed window on the same strand lies inside this span and on
    /// its diagonal, meaning extension from it reaches the same maximal span.
    pub fn covers(&self, ref_pos: Position, query_pos: Position, seed_length: usize, strand: Strand) -> bool {
        if strand != self.strand
            || query_pos < self.query_start
            || query_pos + seed_length > self.query_end()
        {
            return false;
        }
        let offset = query_pos - self.query_start;
        match strand {
            Strand::Forward => ref_pos == self.ref_start + offset,
            // probe offset k pairs with reference window ending `k` before the span end
            Strand::Reverse => ref_pos + seed_length + offset == self.ref_start + self.length,
        }
    }
}

/// Extend a seed of `seed_length` at (`ref_pos`, `probe_pos`) to its maximal span.
///
/// Extension never leaves either sequence and stops at the first mismatch or
/// unknown symbol in each direction.
pub fn extend(
    reference: &[Base],
    probe: &[Base],
    ref_pos: Position,
    probe_pos: Position,
    seed_length: usize,
    is_reverse: bool,
) -> MatchSpan {
    if is_reverse {
        extend_reverse(reference, probe, ref_pos, probe_pos, seed_length)
    } else {
        extend_forward(reference, probe, ref_pos, probe_pos, seed_length)
    }
}

fn extend_forward(
    reference: &[Base],
    probe: &[Base],
    ref_pos: Position,
    probe_pos: Position,
    seed_length: usize,
) -> MatchSpan {
    // Rightward from the seed end
    let mut right = 0;
    while ref_pos + seed_length + right < reference.len()
        && probe_pos + seed_length + right < probe.len()
        && reference[ref_pos + seed_length + right].matches(probe[probe_pos + seed_length + right])
    {
        right += 1;
    }

    // Leftward from the seed start
    let mut left = 0;
    while left < ref_pos
        && left < probe_pos
        && reference[ref_pos - left - 1].matches(probe[probe_pos - left - 1])
    {
        left += 1;
    }

    MatchSpan {
        ref_start: ref_pos - left,
        query_start: probe_pos - left,
        length: seed_length + left + right,
        strand: Strand::Forward,
    }
}

fn extend_reverse(
    reference: &[Base],
    probe: &[Base],
    ref_pos: Position,
    probe_pos: Position,
    seed_length: usize,
) -> MatchSpan {
    // Probe rightward pairs with reference leftward
    let mut probe_right = 0;
    while probe_right < ref_pos
        && probe_pos + seed_length + probe_right < probe.len()
        && reference[ref_pos - probe_right - 1]
            .complement()
            .matches(probe[probe_pos + seed_length + probe_right])
    {
        probe_right += 1;
    }

    // Probe leftward pairs with reference rightward
    let mut probe_left = 0;
    while probe_left < probe_pos
        && ref_pos + seed_length + probe_left < reference.len()
        && reference[ref_pos + seed_length + probe_left]
            .complement()
            .matches(probe[probe_pos - probe_left - 1])
    {
        probe_left += 1;
    }

    MatchSpan {
        ref_start: ref_pos - probe_right,
        query_start: probe_pos - probe_left,
        length: seed_length + probe_left + probe_right,
        strand: Strand::Reverse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{bases_from_ascii, bases_to_string};

    #[test]
    fn test_forward_extension_both_directions() {
        let reference = bases_from_ascii(b"TTGATTACAGG");
        let probe = bases_from_ascii(b"CCGATTACACC");
        // Seed ATTA at reference 3, probe 3
        let span = extend(&reference, &probe, 3, 3, 4, false);
        assert_eq!(span.ref_start, 2);
        assert_eq!(span.query_start, 2);
        assert_eq!(span.length, 7); // GATTACA
        assert_eq!(bases_to_string(&span.segment(&reference)), "GATTACA");
    }

    #[test]
    fn test_forward_extension_stops_at_bounds() {
        let reference = bases_from_ascii(b"ACGTACGT");
        let probe = bases_from_ascii(b"ACGTACGTACGT");
        let span = extend(&reference, &probe, 0, 0, 4, false);
        assert_eq!(span, MatchSpan::seed(0, 0, 8, Strand::Forward));

        let span = extend(&reference, &probe, 4, 0, 4, false);
        assert_eq!(span, MatchSpan::seed(4, 0, 4, Strand::Forward));
    }

    #[test]
    fn test_reverse_extension_mirrors_direction() {
        // Probe holds the reverse complement of reference 2..9
        let reference = bases_from_ascii(b"TTCGATCCATT");
        let segment = bases_from_ascii(b"CGATCCA"); // reference 2..9
        let rc = reverse_complement(&segment); // TGGATCG
        let mut probe = bases_from_ascii(b"GG");
        probe.extend_from_slice(&rc);
        probe.extend_from_slice(&bases_from_ascii(b"GG"));

        // Seed: probe window 4..7 ("GAT") is the reverse complement of reference 4..7 ("ATC")
        let span = extend(&reference, &probe, 4, 4, 3, true);
        assert_eq!(span.strand, Strand::Reverse);
        assert_eq!(span.ref_start, 2);
        assert_eq!(span.query_start, 2);
        assert_eq!(span.length, 7);
        assert_eq!(span.segment(&reference), rc);
    }

    #[test]
    fn test_unknown_stops_extension() {
        let reference = bases_from_ascii(b"ACGTNACGT");
        let probe = bases_from_ascii(b"ACGTNACGT");
        let span = extend(&reference, &probe, 0, 0, 4, false);
        assert_eq!(span.length, 4);
    }

    #[test]
    fn test_covers_same_diagonal() {
        let forward = MatchSpan::seed(10, 20, 8, Strand::Forward);
        assert!(forward.covers(12, 22, 4, Strand::Forward));
        assert!(!forward.covers(12, 23, 4, Strand::Forward));
        assert!(!forward.covers(14, 24, 5, Strand::Forward));
        assert!(!forward.covers(12, 22, 4, Strand::Reverse));

        // Reverse span: probe 20..28 reads reference 10..18 backwards
        let reverse = MatchSpan::seed(10, 20, 8, Strand::Reverse);
        assert!(reverse.covers(14, 20, 4, Strand::Reverse));
        assert!(reverse.covers(10, 24, 4, Strand::Reverse));
        assert!(!reverse.covers(10, 20, 4, Strand::Reverse));
    }
}
