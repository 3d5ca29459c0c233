use super::SampleSet;
use crate::error::{MlErr, Result};

const DELIMITER: char = ',';

/// Parses a comma delimited body into a `SampleSet`.
///
/// The first row is a header and is skipped, blank rows are ignored. Every other
/// row must hold at least two fields, the feature and the target, any extra
/// columns are ignored. Quoted fields are not supported.
///
/// # Arguments
/// * `body` - The whole text of the dataset.
///
/// # Returns
/// The parsed samples or the first error found. A single bad row aborts the
/// whole load, no partial set is ever returned.
pub fn parse_csv(body: &str) -> Result<SampleSet> {
    let mut features = Vec::new();
    let mut targets = Vec::new();

    for (idx, row) in body.lines().enumerate().skip(1) {
        let line = idx + 1;
        let row = row.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split(DELIMITER).map(str::trim).collect();
        if fields.len() < 2 {
            return Err(MlErr::MalformedRow {
                line,
                fields: fields.len(),
            });
        }

        features.push(parse_field(line, 1, fields[0])?);
        targets.push(parse_field(line, 2, fields[1])?);
    }

    SampleSet::new(features, targets)
}

fn parse_field(line: usize, column: usize, value: &str) -> Result<f64> {
    value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| MlErr::InvalidField {
            line,
            column,
            value: value.to_string(),
        })
}
