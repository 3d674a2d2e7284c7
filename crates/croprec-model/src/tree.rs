//! Decision tree evaluation over flat node arrays

use croprec_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sentinel child index marking a leaf
pub const TREE_LEAF: i64 = -1;

/// Serialized tree: parallel arrays indexed by node id, root at 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probabilities: Vec<f64>,
    },
}

/// A validated decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
}

impl DecisionTree {
    /// Validate a serialized tree against the model's feature and class counts
    pub fn from_spec(spec: TreeSpec, n_features: usize, n_classes: usize) -> Result<Self> {
        let n_nodes = spec.children_left.len();
        if n_nodes == 0 {
            return Err(Error::artifact("tree has no nodes"));
        }

        let lengths = [
            ("children_right", spec.children_right.len()),
            ("feature", spec.feature.len()),
            ("threshold", spec.threshold.len()),
            ("value", spec.value.len()),
        ];
        for (field, len) in lengths {
            if len != n_nodes {
                return Err(Error::artifact(format!(
                    "tree field '{}' has {} entries, expected {}",
                    field, len, n_nodes
                )));
            }
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for id in 0..n_nodes {
            let left = spec.children_left[id];
            let right = spec.children_right[id];

            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(Error::artifact(format!(
                        "node {} has exactly one child",
                        id
                    )));
                }
                nodes.push(Node::Leaf {
                    probabilities: normalize(id, &spec.value[id], n_classes)?,
                });
                continue;
            }

            let left = child_index(id, left, n_nodes)?;
            let right = child_index(id, right, n_nodes)?;

            let feature = usize::try_from(spec.feature[id])
                .ok()
                .filter(|f| *f < n_features)
                .ok_or_else(|| {
                    Error::artifact(format!(
                        "node {} splits on feature {}, model has {}",
                        id, spec.feature[id], n_features
                    ))
                })?;

            let threshold = spec.threshold[id];
            if !threshold.is_finite() {
                return Err(Error::artifact(format!(
                    "node {} has a non-finite threshold",
                    id
                )));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
        }

        Ok(Self {
            nodes,
            n_features,
            n_classes,
        })
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Number of classes the leaves score
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Class probabilities of the leaf the row lands in
    pub fn predict_proba(&self, row: &[f64]) -> Result<&[f64]> {
        if row.len() != self.n_features {
            return Err(Error::prediction(format!(
                "row has {} values, tree expects {}",
                row.len(),
                self.n_features
            )));
        }

        // Children always sit after their parent, so this walk terminates
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { probabilities } => return Ok(probabilities),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn child_index(parent: usize, child: i64, n_nodes: usize) -> Result<usize> {
    usize::try_from(child)
        .ok()
        .filter(|c| *c > parent && *c < n_nodes)
        .ok_or_else(|| {
            Error::artifact(format!(
                "node {} points to invalid child {}",
                parent, child
            ))
        })
}

fn normalize(id: usize, weights: &[f64], n_classes: usize) -> Result<Vec<f64>> {
    if weights.len() != n_classes {
        return Err(Error::artifact(format!(
            "leaf {} has {} class weights, model has {} classes",
            id,
            weights.len(),
            n_classes
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(Error::artifact(format!(
            "leaf {} has a negative or non-finite weight",
            id
        )));
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(Error::artifact(format!("leaf {} has no weight", id)));
    }

    Ok(weights.iter().map(|w| w / total).collect())
}
