use std::{path::Path, sync::Arc};

use log::info;
use machine_learning::{FitConfig, RegressionModel, SampleSet, data};
use tokio::{fs, task};

use crate::{
    error::{Result, ServerErr},
    gate::ReadinessGate,
};

/// Reads and parses the training set at `path`.
///
/// # Returns
/// The samples, or the first io or parse error. A single malformed row aborts
/// the whole load.
pub async fn load_dataset(path: &Path) -> Result<SampleSet> {
    let body = fs::read_to_string(path).await?;
    let samples = data::parse_csv(&body)?;
    info!(samples = samples.len(); "loaded dataset from {}", path.display());
    Ok(samples)
}

/// Fits a model over `samples` and publishes it into `gate`.
///
/// The fit is CPU-bound so it runs on the blocking pool, the rayon reduction
/// happens there while the runtime keeps serving.
///
/// # Arguments
/// * `samples` - The training set, consumed by this single run.
/// * `cfg` - How to split the fit across the thread pool.
/// * `gate` - Where the model is published on success.
///
/// # Returns
/// The published model. On error the gate is left untouched.
pub async fn train(
    samples: SampleSet,
    cfg: FitConfig,
    gate: ReadinessGate,
) -> Result<Arc<RegressionModel>> {
    info!(samples = samples.len(); "training started");

    let model = task::spawn_blocking(move || samples.fit(&cfg))
        .await
        .map_err(|e| ServerErr::TrainingAborted(e.to_string()))??;

    let model = gate.publish(model)?;
    info!("training finished, published {model}");
    Ok(model)
}
