//! Cost-complexity (weakest-link) pruning.
//!
//! An internal node `t` with subtree `T_t` is scored by its link
//! strength `g(t) = (R(t) - R(T_t)) / (|T_t| - 1)`,
//! where `R` is the training cost and `|T_t|` the leaf count.
//! Repeatedly collapsing every node of minimal `g` yields a nested
//! sequence of subtrees, one optimal subtree per penalty range.

use super::node::{BranchNode, LeafNode, Node};
use super::tree_struct::Tree;
use crate::TreeError;

/// Links whose strengths differ by at most this much are collapsed
/// in the same step.
const TIE_TOLERANCE: f64 = 1e-12;

/// One subtree of the pruning sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PruningStep {
    /// The pruned tree.
    pub tree: Tree,
    /// Number of leaves of [`PruningStep::tree`].
    pub n_leaves: usize,
    /// The smallest complexity penalty at which this subtree
    /// becomes optimal. The first step carries `0.0`.
    pub alpha: f64,
    /// Training cost of [`PruningStep::tree`].
    pub train_cost: f64,
}

impl Tree {
    /// Compute the full weakest-link pruning sequence,
    /// from this tree down to its root collapsed into a single leaf.
    ///
    /// The steps are nested, strictly shrinking in leaf count,
    /// and their `alpha` values are non-decreasing.
    pub fn prune_sequence(&self) -> Vec<PruningStep> {
        let mut tree = self.clone();
        let mut alpha = 0f64;

        let mut steps = vec![PruningStep {
            n_leaves: tree.n_leaves(),
            alpha,
            train_cost: tree.train_cost(),
            tree: tree.clone(),
        }];

        while let Some(g) = weakest_link(&tree.root) {
            // Floating error must never make the sequence regress.
            alpha = alpha.max(g);
            collapse_links(&mut tree.root, g);

            steps.push(PruningStep {
                n_leaves: tree.n_leaves(),
                alpha,
                train_cost: tree.train_cost(),
                tree: tree.clone(),
            });
        }

        steps
    }

    /// The subtree of the pruning sequence closest to `n_leaves`
    /// from above: the smallest member with at least that many leaves.
    ///
    /// # Errors
    /// Fails when `n_leaves` is zero or exceeds the leaf count
    /// of this tree.
    pub fn prune_to_size(&self, n_leaves: usize)
        -> Result<Self, TreeError>
    {
        let available = self.n_leaves();
        if n_leaves == 0 || n_leaves > available {
            return Err(TreeError::InvalidPruneSize {
                requested: n_leaves,
                available,
            });
        }

        let step = self.prune_sequence()
            .into_iter()
            .rev()
            .find(|step| step.n_leaves >= n_leaves)
            .expect("the first step of the sequence is the full tree");

        Ok(step.tree)
    }

    /// The subtree of the pruning sequence that is optimal under the
    /// complexity penalty `alpha`. Negative penalties are treated
    /// as zero.
    pub fn prune_with_alpha(&self, alpha: f64) -> Self {
        let alpha = alpha.max(0f64);

        let step = self.prune_sequence()
            .into_iter()
            .rev()
            .find(|step| step.alpha <= alpha)
            .expect("the first step of the sequence carries alpha zero");

        step.tree
    }
}

/// Link strength of one internal node.
fn link_strength(branch: &BranchNode) -> f64 {
    let subtree_cost =
        branch.left.subtree_cost() + branch.right.subtree_cost();
    let leaves = branch.left.leaves() + branch.right.leaves();

    let g = (branch.cost_as_leaf - subtree_cost) / (leaves - 1) as f64;
    g.max(0f64)
}

/// The minimal link strength over the internal nodes,
/// `None` when the tree is a single leaf.
fn weakest_link(node: &Node) -> Option<f64> {
    match node {
        Node::Branch(branch) => {
            let mut g = link_strength(branch);
            if let Some(l) = weakest_link(&branch.left) {
                g = g.min(l);
            }
            if let Some(r) = weakest_link(&branch.right) {
                g = g.min(r);
            }
            Some(g)
        },
        Node::Leaf(_) => None,
    }
}

/// Collapse every node whose link strength ties the minimum.
/// A collapsed node absorbs its whole subtree,
/// so the check runs top-down over pre-collapse statistics.
fn collapse_links(node: &mut Node, g_min: f64) {
    if let Node::Branch(branch) = node {
        if link_strength(branch) <= g_min + TIE_TOLERANCE {
            let leaf = LeafNode {
                value: branch.value.clone(),
                n_sample: branch.n_sample,
                impurity: branch.impurity,
                cost_as_leaf: branch.cost_as_leaf,
            };
            *node = Node::Leaf(leaf);
        } else {
            collapse_links(&mut branch.left, g_min);
            collapse_links(&mut branch.right, g_min);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Feature, Sample, TreeBuilder};

    /// Four observations that grow a depth-2 tree with four leaves
    /// and two tied weakest links.
    fn four_leaf_tree() -> Tree {
        let sample = Sample::from_raw(
            vec![Feature::with_values("x", vec![0.0, 1.0, 2.0, 3.0])],
            vec![0.0, 1.0, 10.0, 11.0],
        ).unwrap();

        TreeBuilder::new()
            .min_samples_leaf(1)
            .fit(&sample)
            .unwrap()
    }

    #[test]
    fn sequence_is_nested_and_monotone() {
        let tree = four_leaf_tree();
        let seq = tree.prune_sequence();

        let sizes = seq.iter().map(|s| s.n_leaves).collect::<Vec<_>>();
        // Both depth-1 links tie at g = 0.5,
        // so one step collapses them together.
        assert_eq!(sizes, vec![4, 2, 1]);

        for pair in seq.windows(2) {
            assert!(pair[0].alpha <= pair[1].alpha);
            assert!(pair[0].train_cost <= pair[1].train_cost);
        }
        assert_eq!(seq[0].alpha, 0.0);
        assert_eq!(seq[0].tree, tree);
    }

    #[test]
    fn prune_to_size_rounds_up() {
        let tree = four_leaf_tree();
        // No member of the sequence has exactly 3 leaves;
        // the smallest one with at least 3 is the full tree.
        let pruned = tree.prune_to_size(3).unwrap();
        assert_eq!(pruned.n_leaves(), 4);

        let pruned = tree.prune_to_size(2).unwrap();
        assert_eq!(pruned.n_leaves(), 2);

        let pruned = tree.prune_to_size(1).unwrap();
        assert_eq!(pruned.n_leaves(), 1);
    }

    #[test]
    fn prune_to_size_validates_the_request() {
        let tree = four_leaf_tree();
        assert_eq!(
            tree.prune_to_size(0),
            Err(TreeError::InvalidPruneSize { requested: 0, available: 4 }),
        );
        assert_eq!(
            tree.prune_to_size(5),
            Err(TreeError::InvalidPruneSize { requested: 5, available: 4 }),
        );
    }

    #[test]
    fn prune_with_alpha_picks_by_penalty() {
        let tree = four_leaf_tree();
        assert_eq!(tree.prune_with_alpha(0.0).n_leaves(), 4);
        assert_eq!(tree.prune_with_alpha(0.5).n_leaves(), 2);
        assert_eq!(tree.prune_with_alpha(1e6).n_leaves(), 1);
        // Negative penalties clamp to zero.
        assert_eq!(tree.prune_with_alpha(-1.0).n_leaves(), 4);
    }

    #[test]
    fn pruned_trees_still_predict() {
        let sample = Sample::from_raw(
            vec![Feature::with_values("x", vec![0.0, 1.0, 2.0, 3.0])],
            vec![0.0, 1.0, 10.0, 11.0],
        ).unwrap();
        let tree = four_leaf_tree();

        let stump = tree.prune_to_size(2).unwrap();
        let preds = stump.predict_all(&sample).unwrap();
        assert_eq!(preds, vec![0.5, 0.5, 10.5, 10.5]);

        let root = tree.prune_to_size(1).unwrap();
        assert_eq!(root.predict(&sample, 0).unwrap(), 5.5);
    }
}
