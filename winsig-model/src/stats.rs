//! Summary statistics of a window's hit count distribution.

use serde::Serialize;

use winsig_core::models::GenomicInterval;

use crate::errors::ModelError;
use crate::logspace::{calculate_joint_pvalue, joint_logprobs};
use crate::models::{Significance, WindowResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub window: GenomicInterval,
    pub overlap_count: i64,
    /// The direction the p-value was computed for; never `Combined`.
    pub significance: Significance,
    pub pvalue: f64,
    pub mean: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    /// `None` when the distribution has no spread.
    pub zscore: Option<f64>,
}

/// Mean and variance of a hit count distribution given in log space.
pub fn moments(probs: &[f64]) -> (f64, f64) {
    let mean: f64 = probs
        .iter()
        .enumerate()
        .map(|(k, p)| k as f64 * p.exp())
        .sum();
    let variance: f64 = probs
        .iter()
        .enumerate()
        .map(|(k, p)| (k as f64 - mean).powi(2) * p.exp())
        .sum();
    (mean, variance)
}

///
/// `Combined` becomes enrichment when the observation is above the mean, depletion
/// otherwise.
///
pub fn resolve_significance(significance: Significance, mean: f64, overlap_count: i64) -> Significance {
    match significance {
        Significance::Combined if mean < overlap_count as f64 => Significance::Enrichment,
        Significance::Combined => Significance::Depletion,
        other => other,
    }
}

impl WindowStats {
    pub fn new(result: &WindowResult, significance: Significance) -> Result<Self, ModelError> {
        let (mean, variance) = moments(&result.probs);
        let significance = resolve_significance(significance, mean, result.overlap_count);
        let pvalue = calculate_joint_pvalue(
            std::slice::from_ref(&result.probs),
            result.overlap_count,
            significance,
        )?;
        let standard_deviation = variance.sqrt();
        let zscore = (standard_deviation > 0.0)
            .then(|| (result.overlap_count as f64 - mean) / standard_deviation);

        Ok(WindowStats {
            window: result.window.clone(),
            overlap_count: result.overlap_count,
            significance,
            pvalue,
            mean,
            variance,
            standard_deviation,
            zscore,
        })
    }
}

pub fn window_stats(
    results: &[WindowResult],
    significance: Significance,
) -> Result<Vec<WindowStats>, ModelError> {
    results
        .iter()
        .map(|result| WindowStats::new(result, significance))
        .collect()
}

///
/// Genome-wide significance from independent per-sequence results.
///
/// Each result should cover a whole sequence; their distributions are joined and the
/// counts summed.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenomeStats {
    pub overlap_count: i64,
    pub significance: Significance,
    pub pvalue: f64,
    pub mean: f64,
    pub variance: f64,
}

impl GenomeStats {
    pub fn new(results: &[WindowResult], significance: Significance) -> Result<Self, ModelError> {
        let layers: Vec<Vec<f64>> = results.iter().map(|result| result.probs.clone()).collect();
        let overlap_count = results.iter().map(|result| result.overlap_count).sum();

        let (mean, variance) = moments(&joint_logprobs(&layers));
        let significance = resolve_significance(significance, mean, overlap_count);
        let pvalue = calculate_joint_pvalue(&layers, overlap_count, significance)?;

        Ok(GenomeStats {
            overlap_count,
            significance,
            pvalue,
            mean,
            variance,
        })
    }
}
