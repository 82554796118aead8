//! Random-forest classifier over the pension feature vector
//!
//! Trees are stored in pre-order as flat node arrays, the layout tree learners
//! export. A sample goes left when `x[feature] <= threshold`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelUnavailableError;

/// Inference seam for the pension-tier model
pub trait TierModel: Send + Sync + std::fmt::Debug {
    /// Expected length of the input vector
    fn n_features(&self) -> usize;

    /// Raw class id for one sample
    fn predict(&self, features: &[f64]) -> i64;
}

/// A single node of a decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf
    pub fn predict(&self, features: &[f64]) -> i64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if features[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Children must point forward so every walk terminates
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, threshold, left, right } = node {
                if *feature >= n_features {
                    return Err(format!("node {} splits on feature {} of {}", i, feature, n_features));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has non-finite threshold", i));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", i, child));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Majority-vote ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Structural checks run once at load time so inference cannot panic
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    /// Load and validate a forest from JSON
    pub fn load(path: &Path) -> Result<Self, ModelUnavailableError> {
        let file = File::open(path).map_err(|e| ModelUnavailableError::new(path, e))?;
        let forest: RandomForest = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ModelUnavailableError::new(path, e))?;
        forest.validate().map_err(|e| ModelUnavailableError::new(path, e))?;

        log::info!(
            "Loaded tier model with {} trees over {} features from {}",
            forest.trees.len(),
            forest.n_features,
            path.display()
        );
        Ok(forest)
    }
}

impl TierModel for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> i64 {
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(features)).or_insert(0) += 1;
        }

        // Ties go to the lowest class id
        let mut best = (i64::MIN, 0);
        for (class, count) in votes {
            if count > best.1 {
                best = (class, count);
            }
        }
        best.0
    }
}
