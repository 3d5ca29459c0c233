/// The sufficient statistics of a least squares line over some samples.
///
/// Partials computed over disjoint chunks are merged with `combine`, which is
/// associative and commutative, with `Default` as its identity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialAggregate {
    pub count: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xy: f64,
    pub sum_xx: f64,
}

impl PartialAggregate {
    /// Folds a chunk of samples into a new partial.
    ///
    /// # Arguments
    /// * `xs` - The features of the chunk.
    /// * `ys` - The targets of the chunk, must be as long as `xs`.
    pub fn from_samples(xs: &[f64], ys: &[f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());

        xs.iter()
            .zip(ys)
            .fold(Self::default(), |acc, (&x, &y)| acc.push(x, y))
    }

    /// Adds a single sample to this partial.
    #[inline]
    pub fn push(mut self, x: f64, y: f64) -> Self {
        self.count += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_xx += x * x;
        self
    }

    /// Merges two partials into one covering the samples of both.
    #[inline]
    pub fn combine(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            sum_x: self.sum_x + other.sum_x,
            sum_y: self.sum_y + other.sum_y,
            sum_xy: self.sum_xy + other.sum_xy,
            sum_xx: self.sum_xx + other.sum_xx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_samples_sums_every_moment() {
        let agg = PartialAggregate::from_samples(&[1.0, 2.0, 3.0], &[2.0, 4.0, 5.0]);
        assert_eq!(
            agg,
            PartialAggregate {
                count: 3,
                sum_x: 6.0,
                sum_y: 11.0,
                sum_xy: 2.0 + 8.0 + 15.0,
                sum_xx: 14.0,
            }
        );
    }

    #[test]
    fn combine_is_order_independent() {
        let a = PartialAggregate::from_samples(&[1.0, 2.0], &[1.0, 0.5]);
        let b = PartialAggregate::from_samples(&[4.0], &[8.0]);
        let c = PartialAggregate::from_samples(&[-3.0, 0.0], &[2.0, 2.0]);

        assert_eq!(a.combine(b), b.combine(a));
        assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
        assert_eq!(a.combine(PartialAggregate::default()), a);
    }

    #[test]
    fn chunked_matches_whole() {
        let xs = [0.5, 1.5, 2.5, 3.5, 4.5];
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0];

        let whole = PartialAggregate::from_samples(&xs, &ys);
        let chunked = PartialAggregate::from_samples(&xs[..2], &ys[..2])
            .combine(PartialAggregate::from_samples(&xs[2..], &ys[2..]));

        assert_eq!(whole, chunked);
    }
}
