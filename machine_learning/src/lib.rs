pub mod data;
pub mod error;
pub mod model;
pub mod training;

pub use data::SampleSet;
pub use error::{MlErr, Result};
pub use model::RegressionModel;
pub use training::{FitConfig, fit, fit_with};
