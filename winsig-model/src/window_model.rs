//! Hit count distributions for every window of a genome.

use std::collections::HashMap;

use rayon::prelude::*;

use winsig_core::models::GenomicInterval;
use winsig_core::overlaps::count_overlapping_bounds;

use crate::diagnostics::Diagnostics;
use crate::dp::eval_tensor;
use crate::errors::ModelError;
use crate::logspace::merge_multi_probs;
use crate::markov_chain::MarkovChain;
use crate::merge::{correct_ends, join_sections, prepare_section};
use crate::models::{Algorithm, Arena, WindowResult};
use crate::sections::{check_non_overlapping, intervals_by_window, split_windows_into_sections};

/// The slice of `intervals` (sorted by sequence) that lies on `sequence_id`.
fn sequence_slice<'a>(intervals: &'a [GenomicInterval], sequence_id: &str) -> &'a [GenomicInterval] {
    let start = intervals.partition_point(|interval| interval.sequence_id.as_str() < sequence_id);
    let end = intervals.partition_point(|interval| interval.sequence_id.as_str() <= sequence_id);
    &intervals[start..end]
}

fn degenerate_result(window: &GenomicInterval) -> WindowResult {
    WindowResult {
        window: window.clone(),
        overlap_count: 0,
        probs: vec![0.0],
    }
}

///
/// Evaluates the significance model for a set of windows.
///
/// Reference and query intervals must already be normalized: merged, non-empty and
/// restricted to sequences present in the size map.
///
#[derive(Debug, Clone)]
pub struct WindowModel {
    windows: Vec<GenomicInterval>,
    refs: Vec<GenomicInterval>,
    queries: Vec<GenomicInterval>,
    sequence_sizes: HashMap<String, i64>,
    algorithm: Algorithm,
}

impl WindowModel {
    pub fn new(
        mut windows: Vec<GenomicInterval>,
        mut refs: Vec<GenomicInterval>,
        mut queries: Vec<GenomicInterval>,
        sequence_sizes: &HashMap<String, i64>,
        algorithm: Algorithm,
    ) -> Self {
        windows.sort();
        refs.sort();
        queries.sort();

        WindowModel {
            windows,
            refs,
            queries,
            sequence_sizes: sequence_sizes.clone(),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Names of the sequences the model will evaluate, sorted.
    pub fn sequence_ids(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.sequence_sizes.keys().collect();
        names.sort();
        names
    }

    ///
    /// Compute one [WindowResult] per window, ordered by sequence then window position.
    ///
    /// Sequences are evaluated in parallel. Windows on sequences missing from the size
    /// map are dropped with a warning.
    ///
    pub fn run(&self, diagnostics: &dyn Diagnostics) -> Result<Vec<WindowResult>, ModelError> {
        let names = self.sequence_ids();

        let unknown = self
            .windows
            .iter()
            .filter(|window| !self.sequence_sizes.contains_key(&window.sequence_id))
            .count();
        if unknown > 0 {
            diagnostics.warn(&format!(
                "Dropping {} windows on sequences without a known size",
                unknown
            ));
        }

        diagnostics.info(&format!(
            "Evaluating {} windows on {} sequences with the {} algorithm",
            self.windows.len() - unknown,
            names.len(),
            self.algorithm
        ));

        let per_sequence: Vec<Vec<WindowResult>> = names
            .par_iter()
            .map(|name| -> Result<Vec<WindowResult>, ModelError> {
                let results = self.run_sequence(name, self.sequence_sizes[*name], diagnostics)?;
                diagnostics.sequence_finished(name);
                Ok(results)
            })
            .collect::<Result<_, ModelError>>()?;

        Ok(per_sequence.into_iter().flatten().collect())
    }

    fn run_sequence(
        &self,
        sequence_id: &str,
        sequence_length: i64,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Vec<WindowResult>, ModelError> {
        let windows = sequence_slice(&self.windows, sequence_id);
        let refs = sequence_slice(&self.refs, sequence_id);
        let queries = sequence_slice(&self.queries, sequence_id);

        if windows.is_empty() {
            return Ok(Vec::new());
        }

        if queries.is_empty() {
            diagnostics.warn(&format!(
                "No query intervals on {}: the null model is undefined, reporting 0 hits for its {} windows",
                sequence_id,
                windows.len()
            ));
            return Ok(windows.iter().map(degenerate_result).collect());
        }

        check_non_overlapping(refs)?;
        check_non_overlapping(queries)?;

        let chain = MarkovChain::new(sequence_length, queries)?;
        let arena = Arena { refs, queries };

        diagnostics.debug(&format!(
            "{}: {} windows, {} reference and {} query intervals",
            sequence_id,
            windows.len(),
            refs.len(),
            queries.len()
        ));

        match self.algorithm {
            Algorithm::Naive => run_naive(windows, &arena, &chain),
            Algorithm::Fast => run_fast(windows, &arena, &chain, diagnostics),
        }
    }
}

///
/// Clip the intervals to every window and evaluate each window from scratch.
///
fn run_naive(
    windows: &[GenomicInterval],
    arena: &Arena,
    chain: &MarkovChain,
) -> Result<Vec<WindowResult>, ModelError> {
    let clipped_refs = intervals_by_window(windows, arena.refs);
    let clipped_queries = intervals_by_window(windows, arena.queries);

    windows
        .iter()
        .zip(clipped_refs)
        .zip(clipped_queries)
        .map(|((window, refs), queries)| {
            if window.is_empty() {
                return Ok(degenerate_result(window));
            }

            let overlap_count = count_overlapping_bounds(refs.iter().copied(), queries);
            let tensor = eval_tensor(refs, window.begin, window.end, chain)?;

            Ok(WindowResult {
                window: window.clone(),
                overlap_count,
                probs: merge_multi_probs(&tensor, chain),
            })
        })
        .collect()
}

///
/// Evaluate every section once, then assemble each window from its span of sections.
///
fn run_fast(
    windows: &[GenomicInterval],
    arena: &Arena,
    chain: &MarkovChain,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<WindowResult>, ModelError> {
    let mut split = split_windows_into_sections(windows, arena.refs, arena.queries)?;
    for section in split.sections.iter_mut() {
        prepare_section(section, arena, chain)?;
    }

    diagnostics.debug(&format!(
        "{}: {} windows split into {} sections",
        windows[0].sequence_id,
        windows.len(),
        split.sections.len()
    ));

    windows
        .iter()
        .zip(&split.spans)
        .map(|(window, &(start, end))| {
            let Some((first, rest)) = split.sections[start..end].split_first() else {
                return Ok(degenerate_result(window));
            };

            let mut joined = first.clone();
            for section in rest {
                joined = join_sections(&joined, section, arena, chain)?;
            }
            let tensor = correct_ends(&joined, arena, chain)?;

            Ok(WindowResult {
                window: window.clone(),
                overlap_count: joined.overlap_count,
                probs: merge_multi_probs(&tensor, chain),
            })
        })
        .collect()
}
