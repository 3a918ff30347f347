//! The grown tree and its prediction surface.

use serde::{Deserialize, Serialize};

use std::fmt;

use super::criterion::Criterion;
use super::node::{LeafValue, Node};
use super::split_rule::UnseenPolicy;
use crate::{Sample, TreeError};

/// A grown decision tree.
/// Constructed by [`TreeBuilder`](super::TreeBuilder) and refined by
/// the pruning methods in [`PruningStep`](super::PruningStep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub(super) root: Node,
    pub(super) n_sample: usize,
    pub(super) criterion: Criterion,
    pub(super) unseen_policy: UnseenPolicy,
}

impl Tree {
    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The criterion this tree was grown with.
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// What prediction does with categorical codes
    /// never seen during training.
    pub fn unseen_policy(&self) -> UnseenPolicy {
        self.unseen_policy
    }

    /// Number of training observations the tree was grown over.
    pub fn n_sample(&self) -> usize {
        self.n_sample
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.leaves()
    }

    /// Depth of the tree. A single leaf has depth zero.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Training cost of the tree:
    /// summed squared error for regression,
    /// misclassified count for classification.
    pub fn train_cost(&self) -> f64 {
        self.root.subtree_cost()
    }

    /// Predict the response of the `row`-th observation of `sample`.
    ///
    /// # Errors
    /// Fails on a NaN in a feature the descent tests,
    /// or on an unseen categorical code under
    /// [`UnseenPolicy::Error`].
    pub fn predict(&self, sample: &Sample, row: usize)
        -> Result<f64, TreeError>
    {
        let leaf = self.root.leaf_at(sample, row, self.unseen_policy)?;
        Ok(leaf.value.prediction())
    }

    /// Predict the response of every observation of `sample`.
    pub fn predict_all(&self, sample: &Sample)
        -> Result<Vec<f64>, TreeError>
    {
        let (n_sample, _) = sample.shape();
        (0..n_sample)
            .map(|row| self.predict(sample, row))
            .collect()
    }

    /// Per-class training proportions of the leaf that owns the
    /// `row`-th observation, sorted by label.
    ///
    /// # Errors
    /// Fails on regression trees,
    /// and for the same reasons as [`Tree::predict`].
    pub fn predict_proba(&self, sample: &Sample, row: usize)
        -> Result<Vec<(i64, f64)>, TreeError>
    {
        if self.criterion.is_regression() {
            let msg = "a regression tree has no class proportions"
                .to_string();
            return Err(TreeError::InvalidParameter(msg));
        }

        let leaf = self.root.leaf_at(sample, row, self.unseen_policy)?;
        match &leaf.value {
            LeafValue::Class { proportions, .. } => Ok(proportions.clone()),
            LeafValue::Mean(_) => {
                unreachable!(
                    "a classification tree holds class-distribution leaves"
                )
            },
        }
    }

    /// Serialize the tree as JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        serde_json::to_string(self)
            .map_err(|e| TreeError::InvalidParameter(e.to_string()))
    }

    /// Deserialize a tree from the JSON written by [`Tree::to_json`].
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        serde_json::from_str(json)
            .map_err(|e| TreeError::InvalidParameter(e.to_string()))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------")?;
        writeln!(f, "# Decision Tree")?;
        writeln!(f, "    - Criterion: {}", self.criterion)?;
        writeln!(f, "    - Leaves:    {}", self.n_leaves())?;
        writeln!(f, "    - Depth:     {}", self.depth())?;
        writeln!(f, "    - Samples:   {}", self.n_sample)?;
        write!(f, "----------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Feature, TreeBuilder};

    fn stump_tree() -> (Sample, Tree) {
        let sample = Sample::from_raw(
            vec![Feature::with_values("x", vec![1.0, 2.0, 3.0, 4.0])],
            vec![0.0, 0.0, 10.0, 10.0],
        ).unwrap();
        let tree = TreeBuilder::new()
            .min_samples_leaf(1)
            .fit(&sample)
            .unwrap();
        (sample, tree)
    }

    #[test]
    fn predict_recovers_the_training_regions() {
        let (sample, tree) = stump_tree();
        let preds = tree.predict_all(&sample).unwrap();
        assert_eq!(preds, vec![0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn predict_proba_rejects_regression_trees() {
        let (sample, tree) = stump_tree();
        let res = tree.predict_proba(&sample, 0);
        assert!(matches!(res, Err(TreeError::InvalidParameter(_))));
    }

    #[test]
    fn json_round_trip_preserves_the_tree() {
        let (_, tree) = stump_tree();
        let json = tree.to_json().unwrap();
        let back = Tree::from_json(&json).unwrap();
        assert_eq!(tree, back);
    }
}
