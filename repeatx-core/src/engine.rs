//! Repeat finder
//!
//! Runs the seed, extend and count pipeline once per window length, in
//! parallel. Each window keeps only the preferred repeat per anchor, and the
//! windows are merged the same way before [`finalize`] ranks them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::extend::{extend, MatchSpan};
use crate::rank::{anchor_preference, finalize, keep_best, Anchor};
use crate::seed::utils::windows_agree;
use crate::seed::{build_index, find_seeds, Seed, SeedParams};
use crate::tandem::{count_run, following_copies};
use crate::types::{reverse_complement, Base, RepeatPattern, Strand};

/// Result type for repeat finding
pub type FinderResult<T> = Result<T, FinderError>;

/// Errors that can occur while finding repeats
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Repeat search cancelled")]
    Cancelled,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderParams {
    /// Shortest seed window scanned
    pub min_window_length: usize,
    /// Longest seed window scanned; clipped to the shorter sequence
    pub max_window_length: usize,
    /// Minimum identity for a hash hit to count as a seed, in (0, 1]
    pub similarity_threshold: f64,
    /// Output cap; 0 yields no results
    pub max_results: usize,
    /// Only seed windows that occur exactly once in the reference (per strand)
    pub require_unique_anchor: bool,
}

impl Default for FinderParams {
    fn default() -> Self {
        Self {
            min_window_length: 10,
            max_window_length: 120,
            similarity_threshold: 1.0,
            max_results: 1000,
            require_unique_anchor: false,
        }
    }
}

impl FinderParams {
    /// Check the configuration before any indexing work.
    pub fn validate(&self) -> FinderResult<()> {
        if self.min_window_length < 1 {
            return Err(FinderError::InvalidConfiguration(
                "min_window_length must be at least 1".to_string(),
            ));
        }
        if self.min_window_length > self.max_window_length {
            return Err(FinderError::InvalidConfiguration(format!(
                "min_window_length ({}) exceeds max_window_length ({})",
                self.min_window_length, self.max_window_length
            )));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(FinderError::InvalidConfiguration(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    pub fn seed_params(&self) -> SeedParams {
        SeedParams {
            similarity_threshold: self.similarity_threshold,
            require_unique_anchor: self.require_unique_anchor,
        }
    }

    /// Window lengths that fit both sequences.
    pub fn window_lengths(&self, reference_len: usize, query_len: usize) -> RangeInclusive<usize> {
        let longest = self.max_window_length.min(reference_len).min(query_len);
        self.min_window_length..=longest
    }
}

/// Seed-and-extend repeat finder over a validated configuration.
#[derive(Debug, Clone)]
pub struct RepeatFinder {
    params: FinderParams,
}

impl RepeatFinder {
    pub fn new(params: FinderParams) -> FinderResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FinderParams {
        &self.params
    }

    /// Find repeats of `reference` segments in `query`, ranked and truncated.
    pub fn find_repeats(&self, reference: &[Base], query: &[Base]) -> FinderResult<Vec<RepeatPattern>> {
        let never = AtomicBool::new(false);
        self.find_repeats_with_cancel(reference, query, &never)
    }

    /// Like [`find_repeats`](Self::find_repeats), checking `cancel` before each
    /// window length.
    pub fn find_repeats_with_cancel(
        &self,
        reference: &[Base],
        query: &[Base],
        cancel: &AtomicBool,
    ) -> FinderResult<Vec<RepeatPattern>> {
        if reference.is_empty() || query.is_empty() {
            log::debug!(
                "Empty input (reference {}, query {}), no repeats",
                reference.len(),
                query.len()
            );
            return Ok(Vec::new());
        }

        let windows = self.params.window_lengths(reference.len(), query.len());
        if windows.is_empty() {
            log::debug!(
                "Every window from {} is longer than the shorter sequence ({})",
                self.params.min_window_length,
                reference.len().min(query.len())
            );
            return Ok(Vec::new());
        }

        log::info!(
            "Scanning windows {}..={} over reference ({} bp) and query ({} bp)",
            windows.start(),
            windows.end(),
            reference.len(),
            query.len()
        );

        let reverse_reference = reverse_complement(reference);
        let best = windows
            .into_par_iter()
            .map(|window| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(FinderError::Cancelled);
                }
                Ok(self.best_in_window(reference, &reverse_reference, query, window))
            })
            .try_reduce(HashMap::new, |mut merged, found| {
                for repeat in found.into_values() {
                    keep_best(&mut merged, repeat);
                }
                Ok(merged)
            })?;

        let anchors = best.len();
        let repeats = finalize(best.into_values(), self.params.max_results);
        log::info!("Kept {} of {} anchored repeats", repeats.len(), anchors);

        Ok(repeats)
    }

    /// Unranked repeats for one window length, the preferred one per anchor,
    /// ordered by reference position then orientation.
    ///
    /// `reverse_reference` must be the reverse complement of `reference`.
    pub fn scan_window(
        &self,
        reference: &[Base],
        reverse_reference: &[Base],
        query: &[Base],
        window: usize,
    ) -> Vec<RepeatPattern> {
        let mut repeats: Vec<RepeatPattern> = self
            .best_in_window(reference, reverse_reference, query, window)
            .into_values()
            .collect();
        repeats.sort_by_key(|r| (r.reference_position, r.is_reverse));
        repeats
    }

    fn best_in_window(
        &self,
        reference: &[Base],
        reverse_reference: &[Base],
        query: &[Base],
        window: usize,
    ) -> HashMap<Anchor, RepeatPattern> {
        if window == 0 || window > reference.len() || window > query.len() {
            log::trace!("Window {} skipped: longer than an input sequence", window);
            return HashMap::new();
        }

        let forward_index = build_index(reference, window);
        let reverse_index = build_index(reverse_reference, window);
        let seeds = find_seeds(&forward_index, query, window, &reverse_index, &self.params.seed_params());

        let all_exact = self.params.similarity_threshold >= 1.0;
        let following = following_copies(query, window);
        // Latest maximal span per diagonal; seeds arrive in query order, so an
        // earlier span on the same diagonal can never cover a later seed.
        let mut open_spans: HashMap<(Strand, isize), OpenSpan> = HashMap::new();
        let mut best: HashMap<Anchor, Candidate> = HashMap::new();

        for seed in &seeds {
            if !all_exact && !seed_is_exact(reference, reverse_reference, query, seed, window) {
                let span = extend_seed(reference, query, seed, window);
                let candidate = run_from(reference, query, span).or_else(|| {
                    if span.length > window {
                        run_from(reference, query, MatchSpan::seed(seed.ref_pos, seed.query_pos, window, seed.strand))
                    } else {
                        None
                    }
                });
                if let Some(candidate) = candidate {
                    offer(&mut best, candidate);
                }
                continue;
            }

            let key = diagonal(seed);
            let cached = open_spans
                .get(&key)
                .copied()
                .filter(|open| open.span.covers(seed.ref_pos, seed.query_pos, window, seed.strand));
            let open = match cached {
                Some(open) => open,
                None => {
                    let span = extend_seed(reference, query, seed, window);
                    // An exact span reads the same in the query as in the reference
                    let extra = count_run(query, &query[span.query_start..span.query_end()], span.query_end());
                    let open = OpenSpan { span, extra };
                    open_spans.insert(key, open);
                    if extra > 0 {
                        offer(&mut best, Candidate { span, extra });
                    }
                    open
                }
            };

            // A span grown past the seed can swallow the following copies of a
            // shorter unit, so the bare seed window is tried when it has no run.
            if open.extra == 0 && open.span.length > window && following[seed.query_pos] > 0 {
                offer(
                    &mut best,
                    Candidate {
                        span: MatchSpan::seed(seed.ref_pos, seed.query_pos, window, seed.strand),
                        extra: following[seed.query_pos],
                    },
                );
            }
        }

        log::debug!(
            "Window {}: {} seeds, {} spans, {} anchored repeats",
            window,
            seeds.len(),
            open_spans.len(),
            best.len()
        );

        best.into_iter()
            .map(|(anchor, candidate)| (anchor, candidate.into_repeat(reference)))
            .collect()
    }
}

/// A maximal span and the number of copies that follow it in the query.
#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    span: MatchSpan,
    extra: usize,
}

/// A repeat whose anchor sequence is not materialized yet.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    span: MatchSpan,
    extra: usize,
}

impl Candidate {
    fn anchor(&self) -> Anchor {
        (self.span.ref_start, self.span.strand.is_reverse())
    }

    fn into_repeat(self, reference: &[Base]) -> RepeatPattern {
        RepeatPattern {
            reference_position: self.span.ref_start,
            length: self.span.length,
            repeat_count: self.extra,
            is_reverse: self.span.strand.is_reverse(),
            anchor_sequence: self.span.segment(reference),
            query_position: self.span.query_start,
        }
    }
}

fn offer(best: &mut HashMap<Anchor, Candidate>, candidate: Candidate) {
    let rank = |c: &Candidate| anchor_preference(c.span.length, c.extra, c.span.query_start);
    match best.entry(candidate.anchor()) {
        Entry::Occupied(mut current) => {
            if rank(&candidate) > rank(current.get()) {
                current.insert(candidate);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
    }
}

/// Seeds on one diagonal extend along it: reference and query advance together
/// on the forward strand and in opposite directions on the reverse strand.
fn diagonal(seed: &Seed) -> (Strand, isize) {
    let (reference, query) = (seed.ref_pos as isize, seed.query_pos as isize);
    match seed.strand {
        Strand::Forward => (Strand::Forward, reference - query),
        Strand::Reverse => (Strand::Reverse, reference + query),
    }
}

fn seed_is_exact(
    reference: &[Base],
    reverse_reference: &[Base],
    query: &[Base],
    seed: &Seed,
    window: usize,
) -> bool {
    let anchor = match seed.strand {
        Strand::Forward => &reference[seed.ref_pos..seed.ref_pos + window],
        Strand::Reverse => {
            let start = reference.len() - seed.ref_pos - window;
            &reverse_reference[start..start + window]
        }
    };
    windows_agree(anchor, &query[seed.query_pos..seed.query_pos + window], 1.0)
}

/// Find repeats with a one-off finder.
pub fn find_repeats(
    reference: &[Base],
    query: &[Base],
    params: &FinderParams,
) -> FinderResult<Vec<RepeatPattern>> {
    RepeatFinder::new(params.clone())?.find_repeats(reference, query)
}

fn extend_seed(reference: &[Base], query: &[Base], seed: &Seed, window: usize) -> MatchSpan {
    extend(reference, query, seed.ref_pos, seed.query_pos, window, seed.is_reverse())
}

fn run_from(reference: &[Base], query: &[Base], span: MatchSpan) -> Option<Candidate> {
    let extra = count_run(query, &span.segment(reference), span.query_end());
    (extra > 0).then_some(Candidate { span, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bases_from_ascii;

    fn params(min: usize, max: usize) -> FinderParams {
        FinderParams {
            min_window_length: min,
            max_window_length: max,
            ..FinderParams::default()
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(FinderParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configuration() {
        let cases = [
            params(0, 10),
            params(12, 10),
            FinderParams { similarity_threshold: 0.0, ..FinderParams::default() },
            FinderParams { similarity_threshold: 1.5, ..FinderParams::default() },
            FinderParams { similarity_threshold: f64::NAN, ..FinderParams::default() },
        ];
        for case in cases {
            assert!(matches!(
                RepeatFinder::new(case),
                Err(FinderError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let finder = RepeatFinder::new(params(4, 8)).unwrap();
        let query = bases_from_ascii(b"ACGTACGT");
        assert!(finder.find_repeats(&[], &query).unwrap().is_empty());
        assert!(finder.find_repeats(&query, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_windows_longer_than_input_are_skipped() {
        let finder = RepeatFinder::new(params(20, 30)).unwrap();
        let reference = bases_from_ascii(b"ACGTACGT");
        let query = bases_from_ascii(b"ACGTACGTACGT");
        assert!(finder.find_repeats(&reference, &query).unwrap().is_empty());
        assert!(params(20, 30).window_lengths(8, 12).is_empty());
        assert_eq!(params(4, 30).window_lengths(8, 12), 4..=8);
    }

    #[test]
    fn test_exact_tandem() {
        let reference = bases_from_ascii(b"ACGTACGT");
        let query = bases_from_ascii(b"ACGTACGTACGT");
        let repeats = find_repeats(&reference, &query, &params(4, 120)).unwrap();

        let tandem = repeats
            .iter()
            .find(|r| r.reference_position == 0 && !r.is_reverse)
            .expect("tandem repeat at reference 0");
        assert_eq!(tandem.length, 4);
        assert_eq!(tandem.repeat_count, 2);
        assert_eq!(tandem.query_position, 0);
        assert_eq!(tandem.anchor_string(), "ACGT");
    }

    #[test]
    fn test_scan_window_uses_seed_when_span_swallows_run() {
        let reference = bases_from_ascii(b"ACGTACGT");
        let query = bases_from_ascii(b"ACGTACGTACGT");
        let finder = RepeatFinder::new(params(4, 4)).unwrap();
        let raw = finder.scan_window(&reference, &reverse_complement(&reference), &query, 4);
        assert!(raw.iter().any(|r| r.reference_position == 0
            && r.length == 4
            && r.repeat_count == 2
            && r.query_position == 0));
    }

    #[test]
    fn test_scan_window_keeps_one_repeat_per_anchor() {
        let unit = bases_from_ascii("CAG".repeat(40).as_bytes());
        let finder = RepeatFinder::new(params(6, 6)).unwrap();
        let raw = finder.scan_window(&unit, &reverse_complement(&unit), &unit, 6);

        let mut anchors: Vec<_> = raw.iter().map(|r| (r.reference_position, r.is_reverse)).collect();
        anchors.dedup();
        assert_eq!(anchors.len(), raw.len());
        // reference 60 onwards is query 0..60 with one copy behind it
        assert!(raw.iter().any(|r| r.reference_position == 60 && r.length == 60 && r.repeat_count == 1));
    }

    #[test]
    fn test_fuzzy_threshold_on_low_complexity_input() {
        let reference = bases_from_ascii("CAG".repeat(20).as_bytes());
        let query = bases_from_ascii(format!("TT{}GA", "CAG".repeat(25)).as_bytes());
        let exact = find_repeats(&reference, &query, &params(4, 12)).unwrap();
        let fuzzy = find_repeats(
            &reference,
            &query,
            &FinderParams { similarity_threshold: 0.8, ..params(4, 12) },
        )
        .unwrap();
        assert!(!exact.is_empty());
        assert_eq!(exact, fuzzy);
    }

    #[test]
    fn test_cancelled_before_work() {
        let finder = RepeatFinder::new(params(4, 8)).unwrap();
        let reference = bases_from_ascii(b"ACGTACGT");
        let query = bases_from_ascii(b"ACGTACGTACGT");
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            finder.find_repeats_with_cancel(&reference, &query, &cancel),
            Err(FinderError::Cancelled)
        ));
    }

    #[test]
    fn test_zero_max_results() {
        let reference = bases_from_ascii(b"ACGTACGT");
        let query = bases_from_ascii(b"ACGTACGTACGT");
        let config = FinderParams { max_results: 0, ..params(4, 8) };
        assert!(find_repeats(&reference, &query, &config).unwrap().is_empty());
    }

    #[test]
    fn test_results_are_within_bounds() {
        let reference = bases_from_ascii(b"GATCGATCCAGCAGCAGTTAGG");
        let query = bases_from_ascii(b"CAGCAGCAGCAGGATCGATCGATCCTAACTAACTAA");
        let repeats = find_repeats(&reference, &query, &params(3, 12)).unwrap();
        assert!(!repeats.is_empty());
        for repeat in &repeats {
            assert!(repeat.reference_position + repeat.length <= reference.len());
            assert!(repeat.query_position + repeat.length <= query.len());
            assert!(repeat.query_end() <= query.len());
            assert!(repeat.repeat_count >= 1);
        }
    }

    #[test]
    fn test_params_serde_defaults() {
        let json = serde_json::to_string(&FinderParams::default()).unwrap();
        let parsed: FinderParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FinderParams::default());

        let partial: FinderParams = serde_json::from_str(r#"{"min_window_length": 6}"#).unwrap();
        assert_eq!(partial.min_window_length, 6);
        assert_eq!(partial.max_results, 1000);
    }
}
