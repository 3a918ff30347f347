//! Nodes of a grown tree.

use serde::{Deserialize, Serialize};

use super::split_rule::{Direction, SplitRule, UnseenPolicy};
use crate::Sample;
use crate::TreeError;

/// The prediction stored at a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeafValue {
    /// Mean response of the training region (regression).
    Mean(f64),
    /// Majority class of the training region (classification).
    Class {
        /// The predicted label.
        label: i64,
        /// Per-class training proportions, sorted by label.
        proportions: Vec<(i64, f64)>,
    },
}

impl LeafValue {
    /// The scalar prediction:
    /// the mean for regression, the majority label for classification.
    pub fn prediction(&self) -> f64 {
        match self {
            Self::Mean(mean) => *mean,
            Self::Class { label, .. } => *label as f64,
        }
    }

    /// The class proportions, empty for regression leaves.
    pub fn proportions(&self) -> &[(i64, f64)] {
        match self {
            Self::Mean(_) => &[],
            Self::Class { proportions, .. } => proportions,
        }
    }
}

/// An internal node. Routes observations by `rule` and keeps the
/// region statistics needed to collapse itself into a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    /// The decision rule at this node.
    pub(super) rule: SplitRule,
    /// The left child (`rule` sends an observation left).
    pub(super) left: Box<Node>,
    /// The right child.
    pub(super) right: Box<Node>,
    /// The prediction this region would make as a leaf.
    pub(super) value: LeafValue,
    /// Number of training observations reaching this node.
    pub(super) n_sample: usize,
    /// Impurity of the training region (a per-observation rate).
    pub(super) impurity: f64,
    /// Training cost of this region collapsed to a single leaf
    /// (summed squared error or misclassified count).
    pub(super) cost_as_leaf: f64,
}

/// A terminal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    /// The prediction of this region.
    pub(super) value: LeafValue,
    /// Number of training observations reaching this node.
    pub(super) n_sample: usize,
    /// Impurity of the training region.
    pub(super) impurity: f64,
    /// Training cost of this leaf.
    pub(super) cost_as_leaf: f64,
}

impl From<BranchNode> for LeafNode {
    #[inline]
    fn from(branch: BranchNode) -> Self {
        Self {
            value: branch.value,
            n_sample: branch.n_sample,
            impurity: branch.impurity,
            cost_as_leaf: branch.cost_as_leaf,
        }
    }
}

/// A node of a grown tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// An internal node.
    Branch(BranchNode),
    /// A terminal node.
    Leaf(LeafNode),
}

impl Node {
    /// Construct an internal node.
    pub(super) fn branch(
        rule: SplitRule,
        left: Node,
        right: Node,
        value: LeafValue,
        n_sample: usize,
        impurity: f64,
        cost_as_leaf: f64,
    ) -> Self
    {
        Self::Branch(BranchNode {
            rule,
            left: Box::new(left),
            right: Box::new(right),
            value,
            n_sample,
            impurity,
            cost_as_leaf,
        })
    }

    /// Construct a terminal node.
    pub(super) fn leaf(
        value: LeafValue,
        n_sample: usize,
        impurity: f64,
        cost_as_leaf: f64,
    ) -> Self
    {
        Self::Leaf(LeafNode { value, n_sample, impurity, cost_as_leaf, })
    }

    /// Returns `true` if this node is terminal.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The prediction of this node's training region.
    pub fn value(&self) -> &LeafValue {
        match self {
            Self::Branch(branch) => &branch.value,
            Self::Leaf(leaf) => &leaf.value,
        }
    }

    /// The decision rule at this node, `None` at a leaf.
    pub fn rule(&self) -> Option<&SplitRule> {
        match self {
            Self::Branch(branch) => Some(&branch.rule),
            Self::Leaf(_) => None,
        }
    }

    /// The left and right children, `None` at a leaf.
    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Self::Branch(branch) => Some((&branch.left, &branch.right)),
            Self::Leaf(_) => None,
        }
    }

    /// Number of training observations that reached this node.
    pub fn n_sample(&self) -> usize {
        match self {
            Self::Branch(branch) => branch.n_sample,
            Self::Leaf(leaf) => leaf.n_sample,
        }
    }

    /// Number of leaves in the subtree rooted here.
    pub fn leaves(&self) -> usize {
        match self {
            Self::Branch(branch) => {
                branch.left.leaves() + branch.right.leaves()
            },
            Self::Leaf(_) => 1,
        }
    }

    /// Depth of the subtree rooted here.
    /// A leaf has depth zero.
    pub fn depth(&self) -> usize {
        match self {
            Self::Branch(branch) => {
                let l = branch.left.depth();
                let r = branch.right.depth();
                1 + l.max(r)
            },
            Self::Leaf(_) => 0,
        }
    }

    /// Training cost of this region collapsed to a single leaf.
    pub(super) fn cost_as_leaf(&self) -> f64 {
        match self {
            Self::Branch(branch) => branch.cost_as_leaf,
            Self::Leaf(leaf) => leaf.cost_as_leaf,
        }
    }

    /// Total training cost over the leaves of the subtree rooted here.
    pub(super) fn subtree_cost(&self) -> f64 {
        match self {
            Self::Branch(branch) => {
                branch.left.subtree_cost() + branch.right.subtree_cost()
            },
            Self::Leaf(leaf) => leaf.cost_as_leaf,
        }
    }

    /// Descend from this node to the leaf that owns the given row.
    pub(super) fn leaf_at(
        &self,
        sample: &Sample,
        row: usize,
        policy: UnseenPolicy,
    ) -> Result<&LeafNode, TreeError>
    {
        let mut node = self;
        loop {
            match node {
                Self::Branch(branch) => {
                    let lr = branch.rule.try_split(sample, row, policy)?;
                    node = match lr {
                        Direction::Left => &branch.left,
                        Direction::Right => &branch.right,
                    };
                },
                Self::Leaf(leaf) => { return Ok(leaf); },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(mean: f64, n: usize, cost: f64) -> Node {
        Node::leaf(LeafValue::Mean(mean), n, cost / n as f64, cost)
    }

    fn stump() -> Node {
        let rule = SplitRule::Threshold {
            feature: 0,
            name: "x".to_string(),
            threshold: 0.5,
        };
        Node::branch(
            rule,
            leaf(0.0, 2, 0.0),
            leaf(1.0, 2, 0.0),
            LeafValue::Mean(0.5),
            4,
            0.25,
            1.0,
        )
    }

    #[test]
    fn stump_counts() {
        let root = stump();
        assert_eq!(root.leaves(), 2);
        assert_eq!(root.depth(), 1);
        assert_eq!(root.subtree_cost(), 0.0);
        assert_eq!(root.cost_as_leaf(), 1.0);
    }

    #[test]
    fn collapsing_a_branch_keeps_its_statistics() {
        let root = stump();
        let branch = match root {
            Node::Branch(branch) => branch,
            Node::Leaf(_) => unreachable!(),
        };
        let leaf = LeafNode::from(branch);
        assert_eq!(leaf.value, LeafValue::Mean(0.5));
        assert_eq!(leaf.n_sample, 4);
        assert_eq!(leaf.cost_as_leaf, 1.0);
    }
}
