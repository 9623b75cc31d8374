//! Hit count distribution of a run of reference intervals under the null model.
//!
//! Row `j` of the table holds the (unnormalized) chain state vector after the
//! first `j` intervals of the span have been walked through, restricted to paths
//! with exactly `k` hits, where `k` is the current layer.

use ndarray::Array2;

use crate::errors::ModelError;
use crate::markov_chain::MarkovChain;
use crate::matrix::{Matrix2, matrix_multiply, matrix_subtract, row_multiply};
use crate::models::ProbabilityTensor;

/// Transition matrices for one interval, including the gap in front of it.
struct Step {
    /// Walk the gap then the interval without ever entering a query.
    miss: Matrix2,
    /// Walk the gap then the interval entering a query at least once inside it.
    hit: Matrix2,
}

fn prepare_steps<I>(
    bounds: I,
    window_start: i64,
    window_end: i64,
    chain: &MarkovChain,
) -> Result<(Vec<Step>, Matrix2), ModelError>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut steps = Vec::new();
    let mut cursor = window_start;

    for (begin, end) in bounds {
        if begin < cursor {
            return Err(ModelError::NegativeGap {
                from: cursor,
                to: begin,
            });
        }
        if end < begin {
            return Err(ModelError::NegativeLength { begin, end });
        }

        let gap = chain.advance((begin - cursor) as u64);
        let inside = chain.advance((end - begin) as u64);
        let inside_avoiding = chain.advance_avoiding_query((end - begin) as u64);

        steps.push(Step {
            miss: matrix_multiply(&gap, &inside_avoiding),
            hit: matrix_multiply(&gap, &matrix_subtract(&inside, &inside_avoiding)),
        });
        cursor = end;
    }

    if window_end < cursor {
        return Err(ModelError::NegativeGap {
            from: cursor,
            to: window_end,
        });
    }

    Ok((steps, chain.advance((window_end - cursor) as u64)))
}

fn table_row(table: &Array2<f64>, j: usize) -> [f64; 2] {
    [table[[j, 0]], table[[j, 1]]]
}

fn set_table_row(table: &mut Array2<f64>, j: usize, row: [f64; 2]) {
    table[[j, 0]] = row[0];
    table[[j, 1]] = row[1];
}

///
/// Probability tensor of the reference intervals given by `bounds` within
/// `[window_start, window_end]`.
///
/// `bounds` must be sorted, non-overlapping and confined to the window. The result has
/// one entry per hit count `0..=m` in every `(start_state, end_state)` cell.
///
pub fn eval_tensor<I>(
    bounds: I,
    window_start: i64,
    window_end: i64,
    chain: &MarkovChain,
) -> Result<ProbabilityTensor, ModelError>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let (steps, tail) = prepare_steps(bounds, window_start, window_end, chain)?;
    let m = steps.len();
    let mut tensor = ProbabilityTensor::new(m + 1);

    for start_state in 0..2 {
        let mut unit = [0.0; 2];
        unit[start_state] = 1.0;

        // layer 0: nothing hit so far
        let mut prev = Array2::<f64>::zeros((m + 1, 2));
        set_table_row(&mut prev, 0, unit);
        for (j, step) in steps.iter().enumerate() {
            let row = row_multiply(&table_row(&prev, j), &step.miss);
            set_table_row(&mut prev, j + 1, row);
        }

        let mut last_rows = Vec::with_capacity(m + 1);
        last_rows.push(table_row(&prev, m));

        for k in 1..=m {
            let mut next = Array2::<f64>::zeros((m + 1, 2));
            for j in k..=m {
                let step = &steps[j - 1];
                let via_hit = row_multiply(&table_row(&prev, j - 1), &step.hit);
                let via_miss = row_multiply(&table_row(&next, j - 1), &step.miss);
                set_table_row(
                    &mut next,
                    j,
                    [via_hit[0] + via_miss[0], via_hit[1] + via_miss[1]],
                );
            }
            last_rows.push(table_row(&next, m));
            prev = next;
        }

        for (k, row) in last_rows.iter().enumerate() {
            let end = row_multiply(row, &tail);
            for end_state in 0..2 {
                // rounding in T^n - T_MOD^n can leave tiny negatives
                tensor.cells[start_state][end_state][k] = end[end_state].max(0.0).ln();
            }
        }
    }

    Ok(tensor)
}
