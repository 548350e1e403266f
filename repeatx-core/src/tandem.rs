//! Consecutive-copy counting

use crate::types::{Base, Position};

/// Count back-to-back copies of `segment` in `probe` starting at `start_after`.
///
/// `start_after` is the position right after the first matched copy. Counting
/// stops at the first window that differs or would run past the probe end.
/// Returns 0 when nothing follows, which callers treat as "not a repeat".
pub fn count_run(probe: &[Base], segment: &[Base], start_after: Position) -> usize {
    let length = segment.len();
    if length == 0 {
        return 0;
    }

    let mut count = 0;
    let mut cursor = start_after;
    while cursor + length <= probe.len() && is_copy(&probe[cursor..cursor + length], segment) {
        count += 1;
        cursor += length;
    }
    count
}

/// Run length for every window start of `probe` in one pass.
///
/// Entry `q` equals `count_run(probe, &probe[q..q + length], q + length)`.
/// Empty when `length` is zero or longer than the probe.
pub fn following_copies(probe: &[Base], length: usize) -> Vec<usize> {
    if length == 0 || length > probe.len() {
        return Vec::new();
    }
    let starts = probe.len() - length + 1;

    // agree[i]: consecutive positions from i that match the base `length` further on
    let mut agree = vec![0usize; starts];
    for i in (0..starts - 1).rev() {
        if probe[i].matches(probe[i + length]) {
            agree[i] = agree[i + 1] + 1;
        }
    }

    let mut copies = vec![0usize; starts];
    for q in (0..starts).rev() {
        if agree[q] >= length {
            copies[q] = copies[q + length] + 1;
        }
    }
    copies
}

#[inline]
fn is_copy(window: &[Base], segment: &[Base]) -> bool {
    window.iter().zip(segment).all(|(a, b)| a.matches(*b))
}
