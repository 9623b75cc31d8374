//! Counting how many reference intervals are hit by a query set.
//!
//! A reference interval is hit when it shares at least one base pair with some
//! query interval; it is counted once however many queries hit it.

use crate::models::{GenomicInterval, IntervalSet};

///
/// Count hit reference intervals given sorted, non-overlapping `(begin, end)` bounds
/// of one sequence.
///
pub fn count_overlapping_bounds<R, Q>(refs: R, queries: Q) -> i64
where
    R: IntoIterator<Item = (i64, i64)>,
    Q: IntoIterator<Item = (i64, i64)>,
{
    let mut queries = queries.into_iter().peekable();
    let mut count = 0;

    for (ref_begin, ref_end) in refs {
        // queries ending at or before this reference can't hit any later one either
        while queries
            .peek()
            .is_some_and(|&(_, query_end)| query_end <= ref_begin)
        {
            queries.next();
        }

        if let Some(&(query_begin, _)) = queries.peek() {
            if query_begin < ref_end {
                count += 1;
            }
        }
    }

    count
}

///
/// Count hits for intervals of a single sequence. Both slices must be sorted and
/// non-overlapping.
///
pub fn count_overlaps_single_sequence(
    refs: &[GenomicInterval],
    queries: &[GenomicInterval],
) -> i64 {
    count_overlapping_bounds(
        refs.iter().map(|interval| (interval.begin, interval.end)),
        queries.iter().map(|interval| (interval.begin, interval.end)),
    )
}

///
/// Genome-wide hit count: the sum of per-sequence counts.
///
/// Both sets are expected to be normalized (see [IntervalSet::normalize]).
///
pub fn count_overlaps(refs: &IntervalSet, queries: &IntervalSet) -> i64 {
    refs.iter_sequences()
        .map(|sequence_id| {
            let mut sequence_refs: Vec<(i64, i64)> = refs
                .iter_sequence_intervals(sequence_id)
                .map(|interval| (interval.begin, interval.end))
                .collect();
            let mut sequence_queries: Vec<(i64, i64)> = queries
                .iter_sequence_intervals(sequence_id)
                .map(|interval| (interval.begin, interval.end))
                .collect();
            sequence_refs.sort();
            sequence_queries.sort();

            count_overlapping_bounds(sequence_refs, sequence_queries)
        })
        .sum()
}
