mod aggregate;
mod config;
mod fit;

pub use aggregate::PartialAggregate;
pub use config::FitConfig;
pub use fit::{fit, fit_with};
