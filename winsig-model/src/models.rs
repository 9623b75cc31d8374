use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use winsig_core::models::GenomicInterval;

use crate::errors::ModelError;

///
/// Log-probabilities of hit counts, keyed by the chain state at the start and at the
/// end of a span: `cells[s][e][k] = log P(start in s, end in e, exactly k hits)`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTensor {
    pub cells: [[Vec<f64>; 2]; 2],
}

impl ProbabilityTensor {
    /// A tensor for `len - 1` intervals with every entry at probability zero.
    pub fn new(len: usize) -> Self {
        ProbabilityTensor {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| vec![f64::NEG_INFINITY; len])),
        }
    }

    ///
    /// The tensor of an empty span: no hits, and the chain stays where it started.
    /// It is the neutral element of [crate::logspace::join_tensors].
    ///
    pub fn identity() -> Self {
        let mut tensor = ProbabilityTensor::new(1);
        tensor.cells[0][0][0] = 0.0;
        tensor.cells[1][1][0] = 0.0;
        tensor
    }

    /// Length of every cell, i.e. the number of intervals in scope plus one.
    pub fn len(&self) -> usize {
        self.cells[0][0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, start_state: usize, end_state: usize) -> &[f64] {
        &self.cells[start_state][end_state]
    }
}

impl TryFrom<Vec<Vec<Vec<f64>>>> for ProbabilityTensor {
    type Error = ModelError;

    fn try_from(value: Vec<Vec<Vec<f64>>>) -> Result<Self, Self::Error> {
        if value.len() != 2 || value.iter().any(|row| row.len() != 2) {
            return Err(ModelError::TensorShape(format!(
                "got {} rows with lengths {:?}",
                value.len(),
                value.iter().map(|row| row.len()).collect::<Vec<_>>()
            )));
        }

        let len = value[0][0].len();
        if value.iter().flatten().any(|cell| cell.len() != len) {
            return Err(ModelError::TensorShape(
                "cells have different lengths".to_string(),
            ));
        }

        let mut rows = value.into_iter();
        let mut take_row = || -> [Vec<f64>; 2] {
            let mut cells = rows.next().unwrap_or_default().into_iter();
            [
                cells.next().unwrap_or_default(),
                cells.next().unwrap_or_default(),
            ]
        };
        let first = take_row();
        let second = take_row();

        Ok(ProbabilityTensor {
            cells: [first, second],
        })
    }
}

///
/// A half open range of indices into a sorted interval arena, plus whether the first
/// and last interval of the range continue past the owning section's boundaries.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalRange {
    pub start: usize,
    pub end: usize,
    pub first_intersected: bool,
    pub last_intersected: bool,
}

impl IntervalRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// A single interval crossing both ends of the section.
    pub fn is_spanning(&self) -> bool {
        self.len() == 1 && self.first_intersected && self.last_intersected
    }

    /// Indices of the intervals that lie wholly inside the section.
    pub fn own(&self) -> std::ops::Range<usize> {
        if self.is_spanning() {
            return self.start..self.start;
        }
        let start = self.start + usize::from(self.first_intersected);
        let end = self.end - usize::from(self.last_intersected);
        start..end.max(start)
    }
}

/// Sorted, non-overlapping intervals of one sequence that sections index into.
#[derive(Debug, Clone, Copy)]
pub struct Arena<'a> {
    pub refs: &'a [GenomicInterval],
    pub queries: &'a [GenomicInterval],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionProbs {
    /// Probabilities of the section with boundary crossing fragments detached.
    pub except_first_and_last: ProbabilityTensor,
}

impl Default for SectionProbs {
    fn default() -> Self {
        SectionProbs {
            except_first_and_last: ProbabilityTensor::identity(),
        }
    }
}

///
/// An elementary region between two consecutive window boundaries, or the result of
/// joining several adjacent ones.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub interval: GenomicInterval,
    pub refs: IntervalRange,
    pub queries: IntervalRange,
    pub probs: SectionProbs,
    pub overlap_count: i64,
    /// Whether the first reference fragment of the section is hit by a query.
    pub first_ref_hit: bool,
    /// Whether the last reference fragment of the section is hit by a query.
    pub last_ref_hit: bool,
}

impl Section {
    pub fn new(interval: GenomicInterval, refs: IntervalRange, queries: IntervalRange) -> Self {
        Section {
            interval,
            refs,
            queries,
            probs: SectionProbs::default(),
            overlap_count: 0,
            first_ref_hit: false,
            last_ref_hit: false,
        }
    }
}

///
/// Sections of one sequence and, per window in input order, the half open range of
/// section indices it covers.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionSplit {
    pub sections: Vec<Section>,
    pub spans: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowResult {
    pub window: GenomicInterval,
    pub overlap_count: i64,
    /// Log-probability of each hit count, marginalized over chain states.
    pub probs: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Recompute every window from scratch.
    Naive,
    /// Decompose windows into sections and join them.
    #[default]
    Fast,
}

impl FromStr for Algorithm {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" => Ok(Algorithm::Naive),
            "fast" => Ok(Algorithm::Fast),
            _ => Err(ModelError::UnknownVariant {
                kind: "algorithm",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Naive => write!(f, "naive"),
            Algorithm::Fast => write!(f, "fast"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    /// Probability of at least the observed count.
    Enrichment,
    /// Probability of at most the observed count.
    Depletion,
    /// Enrichment or depletion, whichever side of the mean the observation falls on.
    #[default]
    Combined,
}

impl FromStr for Significance {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enrichment" => Ok(Significance::Enrichment),
            "depletion" => Ok(Significance::Depletion),
            "combined" => Ok(Significance::Combined),
            _ => Err(ModelError::UnknownVariant {
                kind: "significance",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Significance::Enrichment => write!(f, "enrichment"),
            Significance::Depletion => write!(f, "depletion"),
            Significance::Combined => write!(f, "combined"),
        }
    }
}
