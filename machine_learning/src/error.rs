use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    LengthMismatch {
        features: usize,
        targets: usize,
    },
    EmptySampleSet,
    DegenerateFeatures {
        samples: usize,
    },
    NonFiniteFit {
        slope: f64,
        intercept: f64,
    },
    MalformedRow {
        line: usize,
        fields: usize,
    },
    InvalidField {
        line: usize,
        column: usize,
        value: String,
    },
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::LengthMismatch { features, targets } => format!(
                "There's a size mismatch between features and targets, got {features} and {targets}"
            ),
            MlErr::EmptySampleSet => "Can't fit a model without samples".to_string(),
            MlErr::DegenerateFeatures { samples } => format!(
                "The feature variance over {samples} samples is zero or lost to rounding, the slope is undefined"
            ),
            MlErr::NonFiniteFit { slope, intercept } => format!(
                "The fit overflowed, got slope {slope} and intercept {intercept}"
            ),
            MlErr::MalformedRow { line, fields } => {
                format!("Row at line {line} has {fields} field(s), expected at least 2")
            }
            MlErr::InvalidField {
                line,
                column,
                value,
            } => format!("Field {column} at line {line} isn't a number, got {value:?}"),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {}
