use std::collections::BTreeMap;

/// Named feature values for one (state, action) pair.
///
/// Produced fresh for every query and never persisted. Names are ordered so that iteration,
/// and therefore the order of floating-point accumulation, is deterministic.
///
/// ```
/// use qtris_learning::FeatureVector;
///
/// let mut features = FeatureVector::new();
/// features.insert("bias", 1.0);
/// features.insert("position", 4.0);
/// features.divide_by(100.0);
///
/// assert_eq!(features.get("position"), Some(0.04));
/// assert_eq!(features.get("unknown"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, f32>,
}

impl FeatureVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature, replacing any previous value of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f32) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    /// Divides every feature value by `divisor`.
    pub fn divide_by(&mut self, divisor: f32) {
        for value in self.values.values_mut() {
            *value /= divisor;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N> FromIterator<(N, f32)> for FeatureVector
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, f32)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_value() {
        let mut features = FeatureVector::new();
        features.insert("bias", 1.0);
        features.insert("bias", 2.0);
        assert_eq!(features.len(), 1);
        assert_eq!(features.get("bias"), Some(2.0));
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let features: FeatureVector = [("z", 1.0), ("a", 2.0), ("m", 3.0)].into_iter().collect();
        let names: Vec<&str> = features.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "m", "z"]);
    }
}
