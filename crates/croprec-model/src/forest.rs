//! Random forest: soft voting over decision trees

use crate::tree::DecisionTree;
use croprec_core::{Error, Result};

/// Ensemble that averages the class probabilities of its trees
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Create a forest. All trees must score the same classes.
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self> {
        let n_classes = trees
            .first()
            .map(DecisionTree::n_classes)
            .ok_or_else(|| Error::artifact("random forest has no trees"))?;

        if let Some(index) = trees.iter().position(|t| t.n_classes() != n_classes) {
            return Err(Error::artifact(format!(
                "tree {} scores {} classes, expected {}",
                index,
                trees[index].n_classes(),
                n_classes
            )));
        }

        Ok(Self { trees, n_classes })
    }

    /// Number of trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Always false for a constructed forest
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Mean of the per-tree class probabilities
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        let mut sums = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.predict_proba(row)?) {
                *sum += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(sums.into_iter().map(|s| s / n_trees).collect())
    }
}
