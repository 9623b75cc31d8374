//! Splitting (possibly overlapping or nested) windows into elementary sections.
//!
//! Every distinct window boundary cuts the sequence; each piece covered by at least
//! one window becomes a [Section]. A window is then a contiguous run of sections,
//! recorded as its span.

use std::collections::{BTreeMap, BTreeSet};

use winsig_core::models::GenomicInterval;

use crate::errors::ModelError;
use crate::models::{IntervalRange, Section, SectionSplit};

///
/// Fail unless `intervals` are sorted and pairwise disjoint.
///
pub fn check_non_overlapping(intervals: &[GenomicInterval]) -> Result<(), ModelError> {
    for pair in intervals.windows(2) {
        if pair[1].begin < pair[0].end {
            return Err(ModelError::OverlappingIntervals {
                first: (pair[0].begin, pair[0].end),
                second: (pair[1].begin, pair[1].end),
            });
        }
    }
    Ok(())
}

/// Advances over a sorted disjoint arena alongside sorted disjoint sections.
struct RangeCursor<'a> {
    arena: &'a [GenomicInterval],
    lo: usize,
    hi: usize,
}

impl<'a> RangeCursor<'a> {
    fn new(arena: &'a [GenomicInterval]) -> Self {
        RangeCursor { arena, lo: 0, hi: 0 }
    }

    fn range_for(&mut self, begin: i64, end: i64) -> IntervalRange {
        while self.lo < self.arena.len() && self.arena[self.lo].end <= begin {
            self.lo += 1;
        }
        self.hi = self.hi.max(self.lo);
        while self.hi < self.arena.len() && self.arena[self.hi].begin < end {
            self.hi += 1;
        }

        if self.lo == self.hi {
            return IntervalRange {
                start: self.lo,
                end: self.hi,
                first_intersected: false,
                last_intersected: false,
            };
        }

        IntervalRange {
            start: self.lo,
            end: self.hi,
            first_intersected: self.arena[self.lo].begin < begin,
            last_intersected: self.arena[self.hi - 1].end > end,
        }
    }
}

///
/// Decompose `windows` into sections and find the span of every window.
///
/// All inputs belong to one sequence. `refs` and `queries` must be sorted and
/// non-overlapping; windows may come in any order and may overlap or nest.
/// Spans are returned in the order of `windows`. An empty window gets an empty span.
///
pub fn split_windows_into_sections(
    windows: &[GenomicInterval],
    refs: &[GenomicInterval],
    queries: &[GenomicInterval],
) -> Result<SectionSplit, ModelError> {
    check_non_overlapping(refs)?;
    check_non_overlapping(queries)?;

    let Some(sequence_id) = windows.first().map(|window| window.sequence_id.as_str()) else {
        return Ok(SectionSplit::default());
    };

    // +1 where a window opens, -1 where one closes; zero sums still cut
    let mut boundaries: BTreeMap<i64, i64> = BTreeMap::new();
    for window in windows.iter().filter(|window| !window.is_empty()) {
        *boundaries.entry(window.begin).or_default() += 1;
        *boundaries.entry(window.end).or_default() -= 1;
    }

    let mut ref_cursor = RangeCursor::new(refs);
    let mut query_cursor = RangeCursor::new(queries);
    let mut sections = Vec::new();
    let mut open = 0;
    let mut previous: Option<i64> = None;

    for (&position, &delta) in &boundaries {
        if let Some(begin) = previous {
            if open > 0 {
                sections.push(Section::new(
                    GenomicInterval::new(sequence_id, begin, position),
                    ref_cursor.range_for(begin, position),
                    query_cursor.range_for(begin, position),
                ));
            }
        }
        open += delta;
        previous = Some(position);
    }

    let spans = windows
        .iter()
        .map(|window| {
            let start = sections.partition_point(|section| section.interval.begin < window.begin);
            let end = sections.partition_point(|section| section.interval.begin < window.end);
            (start, end.max(start))
        })
        .collect();

    Ok(SectionSplit { sections, spans })
}

///
/// Clip `intervals` to every window.
///
/// Returns, per window in input order, the non-empty `(begin, end)` pieces of the
/// intervals that fall inside it, in increasing order. `intervals` must be sorted and
/// non-overlapping.
///
pub fn intervals_by_window(
    windows: &[GenomicInterval],
    intervals: &[GenomicInterval],
) -> Vec<Vec<(i64, i64)>> {
    // (position, is_start, is_interval, index): ends sort before starts and window
    // ends before interval ends, so nothing is clipped to zero length
    let mut events: Vec<(i64, bool, bool, usize)> = Vec::new();
    for (idx, window) in windows.iter().enumerate().filter(|(_, w)| !w.is_empty()) {
        events.push((window.begin, true, false, idx));
        events.push((window.end, false, false, idx));
    }
    for (idx, interval) in intervals.iter().enumerate().filter(|(_, i)| !i.is_empty()) {
        events.push((interval.begin, true, true, idx));
        events.push((interval.end, false, true, idx));
    }
    events.sort_unstable();

    let mut clipped: Vec<Vec<(i64, i64)>> = vec![Vec::new(); windows.len()];
    let mut open_windows: BTreeSet<usize> = BTreeSet::new();
    let mut open_intervals: BTreeSet<usize> = BTreeSet::new();

    for (position, is_start, is_interval, idx) in events {
        match (is_start, is_interval) {
            (true, false) => {
                open_windows.insert(idx);
            }
            (true, true) => {
                open_intervals.insert(idx);
            }
            (false, false) => {
                open_windows.remove(&idx);
                let window = &windows[idx];
                for &interval_idx in &open_intervals {
                    let begin = intervals[interval_idx].begin.max(window.begin);
                    if begin < position {
                        clipped[idx].push((begin, position));
                    }
                }
            }
            (false, true) => {
                open_intervals.remove(&idx);
                let interval = &intervals[idx];
                for &window_idx in &open_windows {
                    let begin = interval.begin.max(windows[window_idx].begin);
                    if begin < position {
                        clipped[window_idx].push((begin, position));
                    }
                }
            }
        }
    }

    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn intervals(bounds: &[(i64, i64)]) -> Vec<GenomicInterval> {
        bounds
            .iter()
            .map(|&(begin, end)| GenomicInterval::new("chr1", begin, end))
            .collect()
    }

    fn section_bounds(split: &SectionSplit) -> Vec<(i64, i64)> {
        split
            .sections
            .iter()
            .map(|section| (section.interval.begin, section.interval.end))
            .collect()
    }

    #[rstest]
    fn test_single_window() {
        let split = split_windows_into_sections(&intervals(&[(100, 300)]), &[], &[]).unwrap();
        assert_eq!(section_bounds(&split), vec![(100, 300)]);
        assert_eq!(split.spans, vec![(0, 1)]);
    }

    #[rstest]
    fn test_two_overlapping_windows() {
        let split =
            split_windows_into_sections(&intervals(&[(100, 300), (200, 400)]), &[], &[]).unwrap();
        assert_eq!(section_bounds(&split), vec![(100, 200), (200, 300), (300, 400)]);
        assert_eq!(split.spans, vec![(0, 2), (1, 3)]);
    }

    #[rstest]
    fn test_three_overlapping_windows() {
        let split = split_windows_into_sections(
            &intervals(&[(0, 30), (10, 40), (20, 50)]),
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(split.sections.len(), 5);
        assert_eq!(split.spans, vec![(0, 3), (1, 4), (2, 5)]);
    }

    #[rstest]
    fn test_adjacent_windows() {
        let split =
            split_windows_into_sections(&intervals(&[(0, 10), (10, 20)]), &[], &[]).unwrap();
        assert_eq!(section_bounds(&split), vec![(0, 10), (10, 20)]);
        assert_eq!(split.spans, vec![(0, 1), (1, 2)]);
    }

    #[rstest]
    fn test_gap_between_windows_has_no_section() {
        let split = split_windows_into_sections(
            &intervals(&[(50, 60), (0, 10), (5, 55)]),
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(
            section_bounds(&split),
            vec![(0, 5), (5, 10), (10, 50), (50, 55), (55, 60)]
        );
        assert_eq!(split.spans, vec![(3, 5), (0, 2), (1, 4)]);
    }

    #[rstest]
    fn test_empty_window_has_empty_span() {
        let split =
            split_windows_into_sections(&intervals(&[(0, 10), (5, 5)]), &[], &[]).unwrap();
        assert_eq!(section_bounds(&split), vec![(0, 10)]);
        assert_eq!(split.spans[1].0, split.spans[1].1);
    }

    #[rstest]
    fn test_interval_ranges() {
        let refs = intervals(&[(5, 15), (20, 22), (28, 35), (60, 70)]);
        let split =
            split_windows_into_sections(&intervals(&[(0, 30), (10, 50)]), &refs, &[]).unwrap();

        assert_eq!(section_bounds(&split), vec![(0, 10), (10, 30), (30, 50)]);
        assert_eq!(
            split.sections[0].refs,
            IntervalRange {
                start: 0,
                end: 1,
                first_intersected: false,
                last_intersected: true
            }
        );
        assert_eq!(
            split.sections[1].refs,
            IntervalRange {
                start: 0,
                end: 3,
                first_intersected: true,
                last_intersected: true
            }
        );
        assert_eq!(
            split.sections[2].refs,
            IntervalRange {
                start: 2,
                end: 3,
                first_intersected: true,
                last_intersected: false
            }
        );
    }

    #[rstest]
    fn test_spanning_interval_range() {
        let refs = intervals(&[(0, 100)]);
        let split =
            split_windows_into_sections(&intervals(&[(10, 30), (20, 40)]), &refs, &[]).unwrap();

        assert!(split.sections.iter().all(|section| section.refs.is_spanning()));
    }

    #[rstest]
    fn test_overlapping_intervals_fail() {
        let refs = intervals(&[(0, 10), (5, 20)]);
        assert_eq!(
            split_windows_into_sections(&intervals(&[(0, 30)]), &refs, &[]),
            Err(ModelError::OverlappingIntervals {
                first: (0, 10),
                second: (5, 20)
            })
        );
    }

    #[rstest]
    fn test_intervals_by_window_nested() {
        let clipped = intervals_by_window(&intervals(&[(5, 10), (0, 20)]), &intervals(&[(7, 12)]));
        assert_eq!(clipped, vec![vec![(7, 10)], vec![(7, 12)]]);
    }

    #[rstest]
    fn test_intervals_by_window_touching_bounds() {
        let clipped = intervals_by_window(
            &intervals(&[(0, 10), (10, 20)]),
            &intervals(&[(2, 4), (6, 10), (10, 12), (15, 25)]),
        );
        assert_eq!(
            clipped,
            vec![vec![(2, 4), (6, 10)], vec![(10, 12), (15, 20)]]
        );
    }

    #[rstest]
    fn test_intervals_by_window_spanning() {
        let clipped = intervals_by_window(
            &intervals(&[(10, 20), (5, 5), (30, 40)]),
            &intervals(&[(0, 100)]),
        );
        assert_eq!(clipped, vec![vec![(10, 20)], vec![], vec![(30, 40)]]);
    }
}
