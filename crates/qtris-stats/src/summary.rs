use serde::{Deserialize, Serialize};

/// Running summary of a stream of `f32` values.
///
/// Values are folded in one at a time (Welford's algorithm), so the summary never stores the
/// values themselves. Variance is the population variance.
///
/// All statistics are `None` until at least one value has been pushed.
///
/// # Examples
///
/// ```
/// # use qtris_stats::summary::Summary;
/// let mut summary = Summary::new();
/// assert_eq!(summary.mean(), None);
///
/// summary.push(1.0);
/// summary.push(3.0);
/// assert_eq!(summary.count(), 2);
/// assert_eq!(summary.min(), Some(1.0));
/// assert_eq!(summary.max(), Some(3.0));
/// assert_eq!(summary.mean(), Some(2.0));
/// assert_eq!(summary.variance(), Some(1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    count: usize,
    min: f32,
    max: f32,
    mean: f64,
    m2: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Adds a value to the summary.
    #[expect(clippy::cast_precision_loss)]
    pub fn push(&mut self, value: f32) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let value = f64::from(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn min(&self) -> Option<f32> {
        (self.count > 0).then_some(self.min)
    }

    #[must_use]
    pub fn max(&self) -> Option<f32> {
        (self.count > 0).then_some(self.max)
    }

    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn mean(&self) -> Option<f32> {
        (self.count > 0).then_some(self.mean as f32)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    #[must_use]
    pub fn variance(&self) -> Option<f32> {
        (self.count > 0).then(|| (self.m2 / self.count as f64) as f32)
    }

    #[must_use]
    pub fn std_dev(&self) -> Option<f32> {
        self.variance().map(f32::sqrt)
    }
}

impl Extend<f32> for Summary {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f32> for Summary {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        let mut summary = Self::new();
        summary.extend(iter);
        summary
    }
}
