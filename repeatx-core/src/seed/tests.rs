//! Seeding tests over small hand-built sequence pairs

use super::*;
use crate::types::{bases_from_ascii, reverse_complement, Base};

/// Test sequences for seeding scenarios
pub struct TestSequences;

impl TestSequences {
    /// Reference containing one tandem unit twice, query containing it three times
    pub fn tandem() -> (Vec<Base>, Vec<Base>) {
        (bases_from_ascii(b"ACGTACGT"), bases_from_ascii(b"ACGTACGTACGT"))
    }

    /// A unique reference segment whose reverse complement sits back to back in the query
    pub fn inverted_tandem() -> (Vec<Base>, Vec<Base>) {
        let reference = bases_from_ascii(b"CTGATCCGTAAAAACCCCTGCAGTCATG");
        let query = bases_from_ascii(b"TCTAGCGGGGTTTTGGGGTTTTCAGCTA");
        (reference, query)
    }

    /// Sequences sharing no window of length 6 on either strand
    pub fn disjoint() -> (Vec<Base>, Vec<Base>) {
        (bases_from_ascii(b"AAAAAAAAAAAA"), bases_from_ascii(b"CACACACACACA"))
    }

    /// Shared window interrupted by an ambiguous symbol in the query
    pub fn ambiguous() -> (Vec<Base>, Vec<Base>) {
        (bases_from_ascii(b"GATTACAGATTACA"), bases_from_ascii(b"GATTNCAGATTNCA"))
    }
}

fn seeds(reference: &[Base], query: &[Base], window: usize, params: &SeedParams) -> Vec<Seed> {
    let rc = reverse_complement(reference);
    let forward = build_index(reference, window);
    let reverse = build_index(&rc, window);
    find_seeds(&forward, query, window, &reverse, params)
}

#[cfg(test)]
mod seeding_tests {
    use super::*;

    #[test]
    fn test_tandem_seeds_cover_every_copy() {
        let (reference, query) = TestSequences::tandem();
        let found = seeds(&reference, &query, 4, &SeedParams::default());

        for query_pos in [0, 4, 8] {
            assert!(found
                .iter()
                .any(|s| s.query_pos == query_pos && s.ref_pos == 0 && s.strand == Strand::Forward));
        }
        for seed in &found {
            assert!(seed.ref_pos + 4 <= reference.len());
            assert!(seed.query_pos + 4 <= query.len());
        }
    }

    #[test]
    fn test_inverted_tandem_seeds() {
        let (reference, query) = TestSequences::inverted_tandem();
        let found = seeds(&reference, &query, 8, &SeedParams::default());

        let reverse: Vec<_> = found.iter().filter(|s| s.is_reverse()).collect();
        assert_eq!(reverse.len(), 2);
        assert!(reverse.iter().all(|s| s.ref_pos == 10));
        assert_eq!(reverse[0].query_pos, 6);
        assert_eq!(reverse[1].query_pos, 14);
    }

    #[test]
    fn test_disjoint_sequences() {
        let (reference, query) = TestSequences::disjoint();
        assert!(seeds(&reference, &query, 6, &SeedParams::default()).is_empty());
    }

    #[test]
    fn test_ambiguous_symbols_block_exact_seeds() {
        let (reference, query) = TestSequences::ambiguous();
        let exact = seeds(&reference, &query, 7, &SeedParams::default());
        assert!(exact.is_empty());
    }

    #[test]
    fn test_every_seed_verifies() {
        let (reference, query) = TestSequences::inverted_tandem();
        let rc = reverse_complement(&reference);
        for seed in seeds(&reference, &query, 5, &SeedParams::default()) {
            let probe = &query[seed.query_pos..seed.query_pos + 5];
            let expected: Vec<Base> = if seed.is_reverse() {
                let rc_pos = reference.len() - seed.ref_pos - 5;
                rc[rc_pos..rc_pos + 5].to_vec()
            } else {
                reference[seed.ref_pos..seed.ref_pos + 5].to_vec()
            };
            assert_eq!(probe, &expected[..]);
        }
    }
}
