use std::fmt;

/// A fitted single variable linear model, `y = slope * x + intercept`.
///
/// Immutable once built, so it can be shared between any number of readers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionModel {
    slope: f64,
    intercept: f64,
}

impl RegressionModel {
    /// Creates a new `RegressionModel` from known coefficients.
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[inline]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predicts the target for a single feature value.
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predicts the target of every value in `xs`, preserving their order.
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}

impl fmt::Display for RegressionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.4} * x + {:.4}", self.slope, self.intercept)
    }
}
