use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::features::FEATURE_COUNT;

/// Errors that can occur when loading or evaluating the price model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artifact is malformed: {0}")]
    Malformed(String),

    #[error("model expects {expected} features, got {actual}")]
    FeatureShape { expected: usize, actual: usize },
}

/// One regression tree in flat-array layout.
///
/// Arrays are index-aligned per node: leaves carry `children_left == -1`,
/// internal nodes route `x[feature] <= threshold` left, otherwise right.
/// This matches the layout the training pipeline exports.
#[derive(Debug, Clone, Deserialize)]
struct RegressionTree {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    children_left: Vec<i32>,
    children_right: Vec<i32>,
    value: Vec<f64>,
}

impl RegressionTree {
    fn node_count(&self) -> usize {
        self.feature.len()
    }

    fn validate(&self, index: usize, n_features: usize) -> Result<(), ModelError> {
        let n = self.node_count();
        if n == 0 {
            return Err(ModelError::Malformed(format!("tree {} has no nodes", index)));
        }
        if self.threshold.len() != n
            || self.children_left.len() != n
            || self.children_right.len() != n
            || self.value.len() != n
        {
            return Err(ModelError::Malformed(format!(
                "tree {} has inconsistent node arrays",
                index
            )));
        }
        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left >= 0 {
                if left as usize >= n || right < 0 || right as usize >= n {
                    return Err(ModelError::Malformed(format!(
                        "tree {} node {} has out-of-range children",
                        index, node
                    )));
                }
                let feature = self.feature[node];
                if feature < 0 || feature as usize >= n_features {
                    return Err(ModelError::Malformed(format!(
                        "tree {} node {} splits on unknown feature {}",
                        index, node, feature
                    )));
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf for one sample.
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut node = 0usize;
        // Each step descends one level; more steps than nodes means a cycle.
        for _ in 0..self.node_count() {
            let left = self.children_left[node];
            if left < 0 {
                return Ok(self.value[node]);
            }
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(ModelError::Malformed("tree traversal did not reach a leaf".to_string()))
    }
}

/// Pre-trained random-forest price regressor.
///
/// Loaded once from a JSON artifact at startup and never mutated; the
/// service consumes it through `predict` and `feature_importances` only.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceModel {
    n_features: usize,
    feature_importances: Vec<f64>,
    trees: Vec<RegressionTree>,
}

impl PriceModel {
    /// Load and validate the artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let model: PriceModel = serde_json::from_str(&raw)?;
        model.validate()?;

        tracing::info!(
            "Loaded price model from {} ({} trees, {} features)",
            path.display(),
            model.trees.len(),
            model.n_features
        );

        Ok(model)
    }

    /// Parse an artifact from an in-memory JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ModelError> {
        let model: PriceModel = serde_json::from_value(value)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features != FEATURE_COUNT {
            return Err(ModelError::Malformed(format!(
                "artifact trained on {} features, service expects {}",
                self.n_features, FEATURE_COUNT
            )));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(ModelError::Malformed(format!(
                "artifact has {} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("artifact contains no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.n_features)?;
        }
        Ok(())
    }

    /// Predict a price for one ordered feature vector.
    ///
    /// The forest prediction is the mean of the per-tree leaf values.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureShape {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Static per-feature importance weights from the trained state.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Two tiny stump trees: the first splits on Year (index 1), the second
    /// is a constant leaf.
    fn test_artifact() -> serde_json::Value {
        json!({
            "n_features": 10,
            "feature_importances": [0.1, 0.3, 0.2, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.1],
            "trees": [
                {
                    "feature": [1, -2, -2],
                    "threshold": [2015.5, 0.0, 0.0],
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "value": [0.0, 30000.0, 60000.0]
                },
                {
                    "feature": [-2],
                    "threshold": [0.0],
                    "children_left": [-1],
                    "children_right": [-1],
                    "value": [40000.0]
                }
            ]
        })
    }

    fn features(year: f64) -> [f64; 10] {
        [12.0, year, 43000.0, 4.0, 3.0, 1.0, 2.0, 5.0, 0.0, 340.0]
    }

    #[test]
    fn test_forest_averages_tree_predictions() {
        let model = PriceModel::from_json(test_artifact()).unwrap();

        // Old car: (30000 + 40000) / 2
        let old = model.predict(&features(2012.0)).unwrap();
        assert_eq!(old, 35000.0);

        // Newer car: (60000 + 40000) / 2
        let newer = model.predict(&features(2019.0)).unwrap();
        assert_eq!(newer, 50000.0);
    }

    #[test]
    fn test_feature_shape_checked() {
        let model = PriceModel::from_json(test_artifact()).unwrap();
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::FeatureShape { expected: 10, actual: 2 }));
    }

    #[test]
    fn test_malformed_artifact_rejected() {
        let mut artifact = test_artifact();
        artifact["feature_importances"] = json!([0.5, 0.5]);
        assert!(matches!(
            PriceModel::from_json(artifact),
            Err(ModelError::Malformed(_))
        ));

        let mut artifact = test_artifact();
        artifact["trees"] = json!([]);
        assert!(matches!(
            PriceModel::from_json(artifact),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_importances_exposed() {
        let model = PriceModel::from_json(test_artifact()).unwrap();
        assert_eq!(model.feature_importances().len(), 10);
        assert_eq!(model.feature_importances()[1], 0.3);
    }
}
