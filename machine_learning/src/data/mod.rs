mod dataset;
mod loader;

pub use dataset::SampleSet;
pub use loader::parse_csv;
