//! Nested-repeat collapse and ranking
//!
//! Repeats anchored at the same reference position and orientation are
//! collapsed to the longest one; survivors are ordered by information content
//! (`length * repeat_count`) and truncated.

use std::cmp::{Ordering, Reverse};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::{Position, RepeatPattern};

/// Collapse, rank and truncate raw repeats.
///
/// The result depends only on the multiset of inputs, never on their order.
/// `max_results == 0` yields an empty list.
pub fn finalize<I>(raw_repeats: I, max_results: usize) -> Vec<RepeatPattern>
where
    I: IntoIterator<Item = RepeatPattern>,
{
    if max_results == 0 {
        return Vec::new();
    }

    let mut best = HashMap::new();
    for repeat in raw_repeats {
        keep_best(&mut best, repeat);
    }

    let mut ranked: Vec<RepeatPattern> = best.into_values().collect();
    ranked.sort_by(report_order);
    ranked.truncate(max_results);
    ranked
}

/// Reference position and orientation a repeat is grouped under.
pub(crate) type Anchor = (Position, bool);

/// Preference within one anchor group: longer, then more copies, then the
/// earliest first copy in the query.
pub(crate) fn anchor_preference(
    length: usize,
    repeat_count: usize,
    query_position: Position,
) -> (usize, usize, Reverse<Position>) {
    (length, repeat_count, Reverse(query_position))
}

/// Store `repeat` under its anchor unless a preferred repeat is already there.
///
/// Ties carry identical records, so the fold is order independent and can be
/// applied per window before the final [`finalize`].
pub(crate) fn keep_best(best: &mut HashMap<Anchor, RepeatPattern>, repeat: RepeatPattern) {
    let rank = |r: &RepeatPattern| anchor_preference(r.length, r.repeat_count, r.query_position);
    match best.entry((repeat.reference_position, repeat.is_reverse)) {
        Entry::Occupied(mut current) => {
            if rank(&repeat) > rank(current.get()) {
                current.insert(repeat);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(repeat);
        }
    }
}

/// Total order for reporting: score descending, then reference position.
/// Remaining keys only separate the two orientations of one anchor.
fn report_order(a: &RepeatPattern, b: &RepeatPattern) -> Ordering {
    let key = |r: &RepeatPattern| {
        (
            Reverse(r.score()),
            r.reference_position,
            r.is_reverse,
            Reverse(r.length),
            r.query_position,
        )
    };
    key(a).cmp(&key(b))
}
