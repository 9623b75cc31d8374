//! Two-state Markov chain null model of base-pair occupancy.
//!
//! State 0 is "outside a query interval", state 1 is "inside a query interval".
//! Advancing one base pair is one step of the chain.

use ndarray::ArrayView2;

use winsig_core::models::GenomicInterval;

use crate::errors::ModelError;
use crate::matrix::{Matrix2, matrix_power, to_matrix2};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkovChain {
    t: Matrix2,
    t_mod: Matrix2,
    stationary_distribution: [f64; 2],
}

impl MarkovChain {
    ///
    /// Derive the chain from the query interval density of one sequence.
    ///
    /// # Arguments
    /// - sequence_length: length of the sequence in base pairs
    /// - query_intervals: the normalized query intervals of that sequence
    pub fn new(sequence_length: i64, query_intervals: &[GenomicInterval]) -> Result<Self, ModelError> {
        if query_intervals.is_empty() {
            return Err(ModelError::EmptyQueryIntervals);
        }

        let length = sequence_length as f64;
        let count = query_intervals.len() as f64;
        let weight: f64 = query_intervals
            .iter()
            .map(|interval| interval.width() as f64)
            .sum();

        let leave_outside = count / (length - weight - 1.0);
        let leave_inside = count / weight;

        let t = [
            [1.0 - leave_outside, leave_outside],
            [leave_inside, 1.0 - leave_inside],
        ];

        MarkovChain::from_matrix(t)
    }

    ///
    /// Build the chain from an explicit 2x2 transition matrix.
    ///
    pub fn from_transition_matrix(matrix: ArrayView2<f64>) -> Result<Self, ModelError> {
        MarkovChain::from_matrix(to_matrix2(matrix)?)
    }

    fn from_matrix(t: Matrix2) -> Result<Self, ModelError> {
        for (row, values) in t.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(ModelError::InvalidTransitionProbability { row, col, value });
                }
            }
        }

        let t_mod = [[t[0][0], 0.0], [t[1][0], 0.0]];
        let stationary_distribution = stationary_from_matrix(&t)?;

        Ok(MarkovChain {
            t,
            t_mod,
            stationary_distribution,
        })
    }

    /// One-step transition matrix.
    pub fn t(&self) -> &Matrix2 {
        &self.t
    }

    /// `T` with column 1 zeroed: a step that may not enter state 1.
    pub fn t_mod(&self) -> &Matrix2 {
        &self.t_mod
    }

    pub fn stationary_distribution(&self) -> [f64; 2] {
        self.stationary_distribution
    }

    /// `T^n`
    pub fn advance(&self, n: u64) -> Matrix2 {
        matrix_power(&self.t, n)
    }

    /// `T_MOD^n`
    pub fn advance_avoiding_query(&self, n: u64) -> Matrix2 {
        matrix_power(&self.t_mod, n)
    }
}

fn stationary_from_matrix(t: &Matrix2) -> Result<[f64; 2], ModelError> {
    // solving πT = π with π0 + π1 = 1 gives π0 = c/(b+c), π1 = b/(b+c)
    let (b, c) = (t[0][1], t[1][0]);
    let denom = b + c;

    if denom.abs() < 1e-9 {
        return Err(ModelError::NotIrreducible(denom));
    }

    Ok([c / denom, b / denom])
}

///
/// Stationary distribution of a 2x2 transition matrix.
///
pub fn stationary_distribution(matrix: ArrayView2<f64>) -> Result<[f64; 2], ModelError> {
    stationary_from_matrix(&to_matrix2(matrix)?)
}
