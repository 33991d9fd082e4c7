//! Estimators - Evaluation of persisted classifiers
//!
//! Two estimator families can be serialized in a model artifact:
//! - `logistic`: intercept + one coefficient per trained column
//! - `tree_ensemble`: boosted trees in LightGBM `dump_model()` node format
//!
//! Both yield a raw margin; the positive-class probability is its sigmoid.

use serde::{Deserialize, Serialize};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over a model-aligned numeric row
pub trait Classifier {
    /// Raw (log-odds) score for one row
    fn raw_margin(&self, row: &[f64]) -> f64;

    /// Check the estimator against the number of trained columns
    fn check_shape(&self, n_features: usize) -> Result<(), String>;

    /// Probability of the positive class
    fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.raw_margin(row))
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// LOGISTIC
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Classifier for LogisticModel {
    fn raw_margin(&self, row: &[f64]) -> f64 {
        self.intercept
            + self.coefficients.iter().zip(row).map(|(w, x)| w * x).sum::<f64>()
    }

    fn check_shape(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "logistic model has {} coefficients for {} columns",
                self.coefficients.len(),
                n_features
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("logistic model contains non-finite weights".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TREE ENSEMBLE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionType {
    #[default]
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "<")]
    Less,
}

fn default_true() -> bool {
    true
}

/// One node of a dumped tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        split_feature: usize,
        threshold: f64,
        #[serde(default)]
        decision_type: DecisionType,
        /// Branch taken for a missing (NaN) value
        #[serde(default = "default_true")]
        default_left: bool,
        left_child: Box<TreeNode>,
        right_child: Box<TreeNode>,
    },
    Leaf {
        leaf_value: f64,
    },
}

impl TreeNode {
    /// Walk to a leaf for the given row
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { leaf_value } => return *leaf_value,
                TreeNode::Split {
                    split_feature,
                    threshold,
                    decision_type,
                    default_left,
                    left_child,
                    right_child,
                } => {
                    let value = row.get(*split_feature).copied().unwrap_or(f64::NAN);
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        match decision_type {
                            DecisionType::LessOrEqual => value <= *threshold,
                            DecisionType::Less => value < *threshold,
                        }
                    };
                    node = if go_left { &**left_child } else { &**right_child };
                }
            }
        }
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Leaf { leaf_value } => {
                    if !leaf_value.is_finite() {
                        return Err("tree contains a non-finite leaf value".to_string());
                    }
                }
                TreeNode::Split {
                    split_feature,
                    threshold,
                    left_child,
                    right_child,
                    ..
                } => {
                    if *split_feature >= n_features {
                        return Err(format!(
                            "tree splits on feature {} but the model has {} columns",
                            split_feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err("tree contains a NaN threshold".to_string());
                    }
                    stack.push(&**left_child);
                    stack.push(&**right_child);
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub tree_index: usize,
    pub tree_structure: TreeNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub init_score: f64,
    pub trees: Vec<Tree>,
}

impl Classifier for TreeEnsemble {
    fn raw_margin(&self, row: &[f64]) -> f64 {
        self.init_score
            + self
                .trees
                .iter()
                .map(|t| t.tree_structure.evaluate(row))
                .sum::<f64>()
    }

    fn check_shape(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        if !self.init_score.is_finite() {
            return Err("tree ensemble has a non-finite init score".to_string());
        }
        for tree in &self.trees {
            tree.tree_structure
                .check(n_features)
                .map_err(|e| format!("tree {}: {}", tree.tree_index, e))?;
        }
        Ok(())
    }
}

// ============================================================================
// ESTIMATOR (serialized form)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
}

impl Estimator {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Estimator::Logistic(m) => m,
            Estimator::TreeEnsemble(m) => m,
        }
    }
}

impl Classifier for Estimator {
    fn raw_margin(&self, row: &[f64]) -> f64 {
        self.inner().raw_margin(row)
    }

    fn check_shape(&self, n_features: usize) -> Result<(), String> {
        self.inner().check_shape(n_features)
    }
}
