use std::num::NonZeroUsize;

/// Smallest chunk handed to a single task when the size is picked automatically.
const MIN_AUTO_CHUNK: usize = 256;

/// Tuning knobs for a parallel fit.
///
/// The chunk size only changes how the samples are split across the thread
/// pool, never the result beyond floating point rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitConfig {
    chunk_size: Option<NonZeroUsize>,
}

impl FitConfig {
    /// Creates a configuration that sizes chunks from the thread pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the amount of samples per work unit.
    ///
    /// # Arguments
    /// * `chunk_size` - The maximum amount of samples reduced by a single task.
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Returns the fixed chunk size, if one was set.
    pub fn chunk_size(&self) -> Option<NonZeroUsize> {
        self.chunk_size
    }

    /// Resolves the chunk size for a fit over `samples` items.
    ///
    /// Without a fixed size the samples are split evenly between the threads of
    /// the current rayon pool, but never into chunks smaller than `MIN_AUTO_CHUNK`.
    ///
    /// # Returns
    /// A chunk size, always at least `1`.
    pub(crate) fn resolve(&self, samples: usize) -> usize {
        match self.chunk_size {
            Some(size) => size.get(),
            None => samples
                .div_ceil(rayon::current_num_threads())
                .max(MIN_AUTO_CHUNK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_chunk_size_wins() {
        let cfg = FitConfig::new().with_chunk_size(NonZeroUsize::new(7).unwrap());
        assert_eq!(cfg.chunk_size().map(NonZeroUsize::get), Some(7));
        assert_eq!(cfg.resolve(1_000_000), 7);
        assert_eq!(cfg.resolve(1), 7);
    }

    #[test]
    fn auto_chunk_size_is_bounded() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();

        pool.install(|| {
            let cfg = FitConfig::new();
            assert_eq!(cfg.resolve(2), MIN_AUTO_CHUNK);
            assert_eq!(cfg.resolve(100_000), 25_000);
            assert_eq!(cfg.resolve(100_001), 25_001);
        });
    }
}
