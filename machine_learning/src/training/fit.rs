use log::debug;
use rayon::prelude::*;

use super::{FitConfig, PartialAggregate};
use crate::{
    error::{MlErr, Result},
    model::RegressionModel,
};

/// Fits a least squares line with the default `FitConfig`.
///
/// See `fit_with`.
pub fn fit(features: &[f64], targets: &[f64]) -> Result<RegressionModel> {
    fit_with(&FitConfig::default(), features, targets)
}

/// Fits a least squares line over `(features[i], targets[i])` in parallel.
///
/// The samples are split in chunks, each chunk is reduced to a `PartialAggregate`
/// by its own rayon task and the partials are summed once every task finished.
/// The caller blocks until the whole reduction is done.
///
/// # Arguments
/// * `cfg` - How to split the work across the thread pool.
/// * `features` - The `x` value of each sample.
/// * `targets` - The `y` value of each sample.
///
/// # Returns
/// The fitted model or an error if the inputs differ in length, are empty, have
/// no feature variance or the coefficients overflow.
pub fn fit_with(cfg: &FitConfig, features: &[f64], targets: &[f64]) -> Result<RegressionModel> {
    if features.len() != targets.len() {
        return Err(MlErr::LengthMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }

    if features.is_empty() {
        return Err(MlErr::EmptySampleSet);
    }

    let chunk_size = cfg.resolve(features.len());

    let total = features
        .par_chunks(chunk_size)
        .zip(targets.par_chunks(chunk_size))
        .map(|(xs, ys)| PartialAggregate::from_samples(xs, ys))
        .reduce(PartialAggregate::default, PartialAggregate::combine);

    debug!(
        samples = total.count,
        chunk_size = chunk_size,
        chunks = features.len().div_ceil(chunk_size);
        "reduced partial aggregates"
    );

    solve(&total)
}

/// Applies the ordinary least squares closed form to a fully reduced aggregate.
fn solve(total: &PartialAggregate) -> Result<RegressionModel> {
    let &PartialAggregate {
        count,
        sum_x,
        sum_y,
        sum_xy,
        sum_xx,
    } = total;

    let n = count as f64;
    let scale = n * sum_xx;
    let denominator = scale - sum_x * sum_x;

    // Identical features cancel out up to rounding, which grows with n.
    let tolerance = 4.0 * f64::EPSILON * n * scale;
    if denominator <= tolerance {
        return Err(MlErr::DegenerateFeatures { samples: count });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(MlErr::NonFiniteFit { slope, intercept });
    }

    Ok(RegressionModel::new(slope, intercept))
}
