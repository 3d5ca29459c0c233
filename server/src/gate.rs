use std::sync::Arc;

use machine_learning::RegressionModel;
use parking_lot::RwLock;

use crate::error::{Result, ServerErr};

/// The one-shot hand-off of a trained model to every serving session.
///
/// The model and its readiness live in a single slot behind one lock, readers
/// either see no model at all or the complete one. The slot is filled at most
/// once and never cleared. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    slot: Arc<RwLock<Option<Arc<RegressionModel>>>>,
}

impl ReadinessGate {
    /// Creates a new, untrained, `ReadinessGate`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `model` visible to every reader.
    ///
    /// # Arguments
    /// * `model` - The freshly trained model.
    ///
    /// # Returns
    /// The shared handle to the published model, or `AlreadyPublished` if a model
    /// was published before. The first model is kept in that case.
    pub fn publish(&self, model: RegressionModel) -> Result<Arc<RegressionModel>> {
        let mut slot = self.slot.write();
        if slot.is_some() {
            return Err(ServerErr::AlreadyPublished);
        }

        let model = Arc::new(model);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Returns the published model, if any. Never waits for training.
    pub fn try_get(&self) -> Option<Arc<RegressionModel>> {
        self.slot.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use super::*;

    #[test]
    fn untrained_until_published() {
        let gate = ReadinessGate::new();
        assert!(!gate.is_ready());
        assert!(gate.try_get().is_none());

        let model = RegressionModel::new(1.8, 32.0);
        gate.publish(model).unwrap();

        assert!(gate.is_ready());
        assert_eq!(*gate.try_get().unwrap(), model);
    }

    #[test]
    fn second_publish_is_rejected() {
        let gate = ReadinessGate::new();
        let first = gate.publish(RegressionModel::new(1.0, 0.0)).unwrap();

        let res = gate.publish(RegressionModel::new(2.0, 5.0));
        assert!(matches!(res, Err(ServerErr::AlreadyPublished)));

        let current = gate.try_get().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(*current, RegressionModel::new(1.0, 0.0));
    }

    #[test]
    fn clones_share_the_slot() {
        let gate = ReadinessGate::new();
        let reader = gate.clone();

        gate.publish(RegressionModel::new(3.0, -1.0)).unwrap();
        assert_eq!(*reader.try_get().unwrap(), RegressionModel::new(3.0, -1.0));
    }

    #[test]
    fn concurrent_readers_never_see_a_different_model() {
        const READERS: usize = 8;

        let gate = ReadinessGate::new();
        let model = RegressionModel::new(1.8, 32.0);
        let start = Barrier::new(READERS + 1);

        thread::scope(|s| {
            for _ in 0..READERS {
                s.spawn(|| {
                    start.wait();

                    let mut seen_ready = false;
                    for _ in 0..100_000 {
                        match gate.try_get() {
                            Some(got) => {
                                assert_eq!(*got, model);
                                seen_ready = true;
                            }
                            None => assert!(!seen_ready, "gate went back to untrained"),
                        }
                    }
                });
            }

            start.wait();
            gate.publish(model).unwrap();
        });

        assert_eq!(*gate.try_get().unwrap(), model);
    }
}
