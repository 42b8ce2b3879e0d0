// src/model/estimator.rs
use log::warn;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// One-vs-rest estimator for a single cuisine label.
pub trait BinaryEstimator {
    /// Probability that the label applies to the given feature row.
    fn positive_probability(&self, features: &[f64]) -> f64;
}

/// Logistic regression exported as coefficients plus intercept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogisticEstimator {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticEstimator {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.coefficients.len() != feature_count {
            return Err(format!(
                "logistic estimator has {} coefficients, expected {}",
                self.coefficients.len(),
                feature_count
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("logistic estimator has non-finite parameters".to_string());
        }
        Ok(())
    }
}

impl BinaryEstimator for LogisticEstimator {
    fn positive_probability(&self, features: &[f64]) -> f64 {
        if features.len() != self.coefficients.len() {
            warn!(
                "Expected {} features, but got {}. Scoring label as 0.",
                self.coefficients.len(),
                features.len()
            );
            return 0.0;
        }
        let logit = ArrayView1::from(&self.coefficients[..]).dot(&ArrayView1::from(features))
            + self.intercept;

        1.0 / (1.0 + (-logit).exp())
    }
}

/// A fitted decision tree in flat node-array form.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise the walk goes
/// left when `x[feature[i]] <= threshold[i]` and right otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Share of positive training samples that reached each node.
    pub positive_fraction: Vec<f64>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, feature_count: usize) -> Result<(), String> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err("decision tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.positive_fraction.len() != nodes
        {
            return Err("decision tree node arrays have different lengths".to_string());
        }

        for node in 0..nodes {
            let fraction = self.positive_fraction[node];
            if !(0.0..=1.0).contains(&fraction) {
                return Err(format!(
                    "node {} has positive fraction {} outside [0, 1]",
                    node, fraction
                ));
            }
            if self.children_left[node] == -1 {
                continue;
            }
            // Children always come after their parent, which also rules out cycles.
            for child in [self.children_left[node], self.children_right[node]] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {} has out-of-range child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= feature_count as i64 {
                return Err(format!(
                    "node {} splits on feature {}, expected 0..{}",
                    node, feature, feature_count
                ));
            }
        }
        Ok(())
    }

    /// Walks the tree to a leaf. Returns `None` on a malformed tree.
    fn leaf_fraction(&self, features: &[f64]) -> Option<f64> {
        let mut node = 0usize;
        loop {
            let left = *self.children_left.get(node)?;
            if left == -1 {
                return self.positive_fraction.get(node).copied();
            }
            let split_on = usize::try_from(*self.feature.get(node)?).ok()?;
            let next = if *features.get(split_on)? <= *self.threshold.get(node)? {
                left
            } else {
                *self.children_right.get(node)?
            };
            node = usize::try_from(next).ok()?;
        }
    }
}

/// Bagged trees whose probability is the mean leaf fraction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForestEstimator {
    pub trees: Vec<DecisionTree>,
}

impl ForestEstimator {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest estimator has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|e| format!("tree {}: {}", index, e))?;
        }
        Ok(())
    }
}

impl BinaryEstimator for ForestEstimator {
    fn positive_probability(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        for tree in &self.trees {
            match tree.leaf_fraction(features) {
                Some(fraction) => total += fraction,
                None => {
                    warn!("Malformed decision tree encountered during scoring. Scoring label as 0.");
                    return 0.0;
                }
            }
        }
        total / self.trees.len() as f64
    }
}

/// Any estimator the model artifact can carry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Logistic(LogisticEstimator),
    Forest(ForestEstimator),
    /// Label that had a single class in training.
    Constant { probability: f64 },
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Logistic(_) => "logistic",
            Estimator::Forest(_) => "forest",
            Estimator::Constant { .. } => "constant",
        }
    }

    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            Estimator::Logistic(model) => model.validate(feature_count),
            Estimator::Forest(model) => model.validate(feature_count),
            Estimator::Constant { probability } => {
                if (0.0..=1.0).contains(probability) {
                    Ok(())
                } else {
                    Err(format!(
                        "constant estimator probability {} outside [0, 1]",
                        probability
                    ))
                }
            }
        }
    }
}

impl BinaryEstimator for Estimator {
    fn positive_probability(&self, features: &[f64]) -> f64 {
        let probability = match self {
            Estimator::Logistic(model) => model.positive_probability(features),
            Estimator::Forest(model) => model.positive_probability(features),
            Estimator::Constant { probability } => *probability,
        };
        if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        }
    }
}
