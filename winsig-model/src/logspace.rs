//! Numerically stable algebra over log-probabilities.

use crate::errors::ModelError;
use crate::markov_chain::MarkovChain;
use crate::models::{ProbabilityTensor, Significance};

///
/// `log(sum(exp(values)))` without overflow.
///
/// Returns `-inf` for an empty input or when every entry is `-inf`.
///
pub fn logsumexp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }

    let sum: f64 = values.iter().map(|value| (value - max).exp()).sum();
    max + sum.ln()
}

/// `log(exp(a) + exp(b))`
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if hi == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    hi + (lo - hi).exp().ln_1p()
}

///
/// Distribution of the sum of two independent hit counts: polynomial multiplication
/// in the log domain.
///
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut result = vec![f64::NEG_INFINITY; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == f64::NEG_INFINITY {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            result[i + j] = log_add_exp(result[i + j], x + y);
        }
    }
    result
}

///
/// Join independent hit count distributions (one per sequence, say) into the
/// distribution of their total.
///
/// An empty input yields `[0.0]`: zero hits with certainty.
///
pub fn joint_logprobs(layers: &[Vec<f64>]) -> Vec<f64> {
    layers
        .iter()
        .fold(vec![0.0], |joint, layer| convolve(&joint, layer))
}

///
/// Chain two consecutive spans: the end state of `a` is the start state of `b`, and
/// their hit counts add up.
///
/// `result[s][e] = logsumexp over m of convolve(a[s][m], b[m][e])`
///
pub fn join_tensors(a: &ProbabilityTensor, b: &ProbabilityTensor) -> ProbabilityTensor {
    let len = (a.len() + b.len()).saturating_sub(1);
    let mut result = ProbabilityTensor::new(len);

    for s in 0..2 {
        for e in 0..2 {
            let cell = &mut result.cells[s][e];
            for m in 0..2 {
                for (k, value) in convolve(a.get(s, m), b.get(m, e)).into_iter().enumerate() {
                    cell[k] = log_add_exp(cell[k], value);
                }
            }
        }
    }

    result
}

///
/// Collapse a tensor into one hit count distribution: the start state is drawn from
/// the stationary distribution and the end state is summed out.
///
pub fn merge_multi_probs(tensor: &ProbabilityTensor, chain: &MarkovChain) -> Vec<f64> {
    let pi = chain.stationary_distribution();
    let log_pi = [pi[0].ln(), pi[1].ln()];

    (0..tensor.len())
        .map(|k| {
            logsumexp(&[
                log_pi[0] + tensor.cells[0][0][k],
                log_pi[0] + tensor.cells[0][1][k],
                log_pi[1] + tensor.cells[1][0][k],
                log_pi[1] + tensor.cells[1][1][k],
            ])
        })
        .collect()
}

///
/// p-value of `overlap_count` under the joint distribution of `probs_by_sequence`.
///
/// Enrichment is the right tail `P(X >= overlap_count)`, depletion the left tail
/// `P(X <= overlap_count)`. `Combined` has to be resolved by the caller.
///
pub fn calculate_joint_pvalue(
    probs_by_sequence: &[Vec<f64>],
    overlap_count: i64,
    significance: Significance,
) -> Result<f64, ModelError> {
    if significance == Significance::Combined {
        return Err(ModelError::UnresolvedSignificance);
    }

    let probs = joint_logprobs(probs_by_sequence);
    if overlap_count < 0 || probs.is_empty() {
        return Ok(1.0);
    }

    let count = (overlap_count as usize).min(probs.len());
    let tail = match significance {
        Significance::Enrichment => &probs[count..],
        _ => &probs[..(count + 1).min(probs.len())],
    };

    Ok(logsumexp(tail).exp().clamp(0.0, 1.0))
}
