use crate::{
    error::{MlErr, Result},
    model::RegressionModel,
    training::{self, FitConfig},
};

/// An immutable set of `(feature, target)` training pairs.
///
/// Both sequences always have the same, non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    features: Vec<f64>,
    targets: Vec<f64>,
}

impl SampleSet {
    /// Creates a new sample set from owned buffers.
    ///
    /// # Arguments
    /// * `features` - The `x` value of each sample.
    /// * `targets` - The `y` value of each sample, paired by index with `features`.
    ///
    /// # Returns
    /// A `LengthMismatch` error if the buffers differ in length or an
    /// `EmptySampleSet` error if both are empty.
    pub fn new(features: Vec<f64>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(MlErr::LengthMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }

        if features.is_empty() {
            return Err(MlErr::EmptySampleSet);
        }

        Ok(Self { features, targets })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Always `false`, a `SampleSet` can't be built empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    #[inline]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Returns the sample at `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<(f64, f64)> {
        Some((*self.features.get(idx)?, self.targets[idx]))
    }

    /// Fits a regression model over every sample of this set.
    ///
    /// # Arguments
    /// * `cfg` - How to split the work across the thread pool.
    pub fn fit(&self, cfg: &FitConfig) -> Result<RegressionModel> {
        training::fit_with(cfg, &self.features, &self.targets)
    }
}
