//! Deterministic synthetic sequence pairs
//!
//! Builds a random reference and a query holding back-to-back copies of
//! chosen reference segments, together with the repeats a perfect finder
//! should report for them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{reverse_complement, Base, RepeatPattern, Sequence};

const CANONICAL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Invalid synthetic parameters: {0}")]
    InvalidParams(String),
}

/// Shape of a generated pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticParams {
    pub reference_length: usize,
    /// Number of planted repeats
    pub planted: usize,
    pub min_unit_length: usize,
    pub max_unit_length: usize,
    /// Upper bound on copies after the first one
    pub max_extra_copies: usize,
    /// Probability that a planted repeat is reverse-complemented
    pub reverse_fraction: f64,
    /// Random bases before, between and after planted runs in the query
    pub spacer_length: usize,
    pub seed: u64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            reference_length: 1000,
            planted: 5,
            min_unit_length: 12,
            max_unit_length: 40,
            max_extra_copies: 3,
            reverse_fraction: 0.5,
            spacer_length: 50,
            seed: 42,
        }
    }
}

impl SyntheticParams {
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.min_unit_length == 0 || self.min_unit_length > self.max_unit_length {
            return Err(SynthError::InvalidParams(format!(
                "unit length range {}..={} is empty or starts at 0",
                self.min_unit_length, self.max_unit_length
            )));
        }
        if self.planted > 0 && self.max_unit_length > self.reference_length {
            return Err(SynthError::InvalidParams(format!(
                "max_unit_length ({}) exceeds reference_length ({})",
                self.max_unit_length, self.reference_length
            )));
        }
        if self.max_extra_copies == 0 {
            return Err(SynthError::InvalidParams(
                "max_extra_copies must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reverse_fraction) {
            return Err(SynthError::InvalidParams(format!(
                "reverse_fraction must be in [0, 1], got {}",
                self.reverse_fraction
            )));
        }
        Ok(())
    }
}

/// A generated reference/query pair and its answer key
#[derive(Debug, Clone)]
pub struct SyntheticPair {
    pub reference: Sequence,
    pub query: Sequence,
    /// Planted repeats, in query order
    pub planted: Vec<RepeatPattern>,
}

impl SyntheticPair {
    pub fn generate(params: &SyntheticParams) -> Result<Self, SynthError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let reference = random_bases(&mut rng, params.reference_length);
        let mut query = random_bases(&mut rng, params.spacer_length);
        let mut planted = Vec::with_capacity(params.planted);

        for _ in 0..params.planted {
            let length = rng.gen_range(params.min_unit_length..=params.max_unit_length);
            let reference_position = rng.gen_range(0..=params.reference_length - length);
            let is_reverse = rng.gen_bool(params.reverse_fraction);
            let extra = rng.gen_range(1..=params.max_extra_copies);

            let segment = &reference[reference_position..reference_position + length];
            let unit = if is_reverse {
                reverse_complement(segment)
            } else {
                segment.to_vec()
            };

            let query_position = query.len();
            for _ in 0..=extra {
                query.extend_from_slice(&unit);
            }
            query.extend(random_bases(&mut rng, params.spacer_length));

            planted.push(RepeatPattern {
                reference_position,
                length,
                repeat_count: extra,
                is_reverse,
                anchor_sequence: unit,
                query_position,
            });
        }

        log::debug!(
            "Generated reference ({} bp) and query ({} bp) with {} planted repeats",
            reference.len(),
            query.len(),
            planted.len()
        );

        Ok(Self {
            reference: Sequence::new("synthetic_reference", reference),
            query: Sequence::new("synthetic_query", query),
            planted,
        })
    }

    /// Two independent random sequences with nothing planted.
    pub fn unrelated(reference_length: usize, query_length: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let reference = random_bases(&mut rng, reference_length);
        let query = random_bases(&mut rng, query_length);
        Self {
            reference: Sequence::new("random_reference", reference),
            query: Sequence::new("random_query", query),
            planted: Vec::new(),
        }
    }
}

/// Uniform random bases over the canonical alphabet.
pub fn random_bases<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<Base> {
    (0..length).map(|_| CANONICAL[rng.gen_range(0..4)]).collect()
}
