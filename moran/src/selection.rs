//! Fitness-proportionate (roulette wheel) selection.
//!
//! Each index is chosen with probability equal to its share of the total
//! weight. Reproduction draws over the fitness vector directly; removal draws
//! over [`removal_weights`], which puts the most weight on the weakest members.

use crate::error::{MoranError, Result};
use rand::Rng;

/// Draws an index with probability `weights[i] / sum(weights)`.
///
/// All-zero weights fall back to a uniform draw. Exactly one `f64` is taken
/// from `rng` per call, whether or not the fallback is used.
pub fn fitness_proportionate_selection<R: Rng + ?Sized>(
    weights: &[f64],
    rng: &mut R,
) -> Result<usize> {
    if weights.is_empty() {
        return Err(MoranError::EmptyWeights);
    }
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(MoranError::InvalidWeight { index, value });
    }

    let total: f64 = weights.iter().sum();
    let uniform = total <= 0.0;
    let weight_at = |i: usize| if uniform { 1.0 } else { weights[i] };
    let total = if uniform { weights.len() as f64 } else { total };

    let spin = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for i in 0..weights.len() {
        let weight = weight_at(i);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = i;
        if spin < cumulative {
            return Ok(i);
        }
    }

    // Rounding can leave `spin` a hair above the accumulated sum.
    Ok(last_positive)
}

/// Reproduction weights: the fitness vector, shifted up if any score is negative.
pub fn reproduction_weights(fitness: &[f64]) -> Vec<f64> {
    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { -min } else { 0.0 };
    fitness.iter().map(|f| f + shift).collect()
}

/// Removal weights: `max(fitness) - fitness[i]`.
///
/// The best performer gets zero weight and the worst the most. When every
/// score is equal all weights are zero and selection is uniform.
pub fn removal_weights(fitness: &[f64]) -> Vec<f64> {
    let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    fitness.iter().map(|f| max - f).collect()
}
