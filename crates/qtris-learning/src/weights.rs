use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::FeatureVector;

/// Learned weight per feature name.
///
/// Unseen features weigh 0.0. Serialized as a flat JSON object mapping feature names to
/// numbers.
///
/// ```
/// use qtris_learning::{FeatureVector, Weights};
///
/// let weights: Weights = serde_json::from_str(r#"{"bias": 2.0}"#).unwrap();
/// assert_eq!(weights.get("bias"), 2.0);
/// assert_eq!(weights.get("position"), 0.0);
///
/// let features: FeatureVector = [("bias", 0.5), ("position", 3.0)].into_iter().collect();
/// assert_eq!(weights.dot(&features), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(BTreeMap<String, f32>);

impl Weights {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the weight of a feature, 0.0 if it has never been learned.
    #[must_use]
    pub fn get(&self, name: &str) -> f32 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    /// Adds `step` to the weight of a feature.
    pub fn adjust(&mut self, name: &str, step: f32) {
        if step == 0.0 {
            return;
        }
        *self.0.entry(name.to_owned()).or_insert(0.0) += step;
    }

    /// Linear combination of the features with these weights.
    ///
    /// Features with NaN values are ignored.
    #[must_use]
    pub fn dot(&self, features: &FeatureVector) -> f32 {
        features
            .iter()
            .filter(|(_, value)| !value.is_nan())
            .map(|(name, value)| value * self.get(name))
            .sum()
    }

    /// Clamps every weight to `[-limit, limit]`.
    pub fn clip(&mut self, limit: f32) {
        if limit.is_nan() || limit < 0.0 {
            return;
        }
        for weight in self.0.values_mut() {
            *weight = weight.clamp(-limit, limit);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N> FromIterator<(N, f32)> for Weights
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, f32)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weights_are_zero() {
        let weights = Weights::new();
        let features: FeatureVector = [("bias", 1.0), ("T", 1.0)].into_iter().collect();
        assert_eq!(weights.dot(&features), 0.0);
        assert!(weights.is_empty());
    }

    #[test]
    fn test_dot_skips_nan_features() {
        let weights: Weights = [("a", 2.0), ("b", 3.0)].into_iter().collect();
        let features: FeatureVector = [("a", 1.0), ("b", f32::NAN)].into_iter().collect();
        assert_eq!(weights.dot(&features), 2.0);
    }

    #[test]
    fn test_adjust_and_clip() {
        let mut weights = Weights::new();
        weights.adjust("a", 0.0);
        assert!(weights.is_empty());

        weights.adjust("a", 15.0);
        weights.adjust("b", -20.0);
        weights.adjust("c", 3.0);
        weights.clip(10.0);
        assert_eq!(weights.get("a"), 10.0);
        assert_eq!(weights.get("b"), -10.0);
        assert_eq!(weights.get("c"), 3.0);
    }

    #[test]
    fn test_json_is_flat_object() {
        let weights: Weights = [("bias", 0.5), ("position", -1.25)].into_iter().collect();
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"bias":0.5,"position":-1.25}"#);
    }
}
