//! Belief normalization, expected payoffs and tie-breaking

use serde::{Deserialize, Serialize};

use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;

/// Turn raw counts into a probability distribution.
/// All zeros when nothing has been counted yet.
pub fn normalize(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// `E[i] = sum_j matrix[i][j] * sigma[j]` for every row `i`
pub fn expected_payoffs(matrix: &PayoffMatrix, sigma: &[f64]) -> Vec<f64> {
    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(sigma)
                .map(|(&u, &p)| u as f64 * p)
                .sum()
        })
        .collect()
}

/// How an argmax picks among equally good actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Draw a random seed action, then scan in index order and replace it
    /// only on strict improvement over a running max starting at -inf.
    /// The first scanned row always beats -inf, so ties resolve to the
    /// lowest index; the seed survives only if every value is NaN.
    SeededScan,
    /// Uniform draw among every action whose value equals the maximum.
    UniformAmongMax,
}

impl TieBreak {
    /// Index of the best value. `values` must be non-empty.
    pub fn pick(self, values: &[f64], rng: &mut SeededRng) -> usize {
        match self {
            TieBreak::SeededScan => {
                let mut best = rng.next_range(values.len());
                let mut max = f64::NEG_INFINITY;
                for (i, &v) in values.iter().enumerate() {
                    if v > max {
                        max = v;
                        best = i;
                    }
                }
                best
            }
            TieBreak::UniformAmongMax => {
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let best: Vec<usize> = values
                    .iter()
                    .enumerate()
                    .filter(|(_, &v)| v == max)
                    .map(|(i, _)| i)
                    .collect();
                if best.is_empty() {
                    return rng.next_range(values.len());
                }
                best[rng.next_range(best.len())]
            }
        }
    }
}
