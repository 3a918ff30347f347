//! A builder that grows [`Tree`](super::Tree) by
//! recursive binary splitting.

use super::criterion::Criterion;
use super::node::Node;
use super::split_rule::{Direction, UnseenPolicy};
use super::splitter::find_best_split;
use super::tree_struct::Tree;
use crate::common::checker;
use crate::{Sample, TreeError};

/// `TreeBuilder` grows a [`Tree`] over a training sample
/// by greedy top-down binary splitting.
///
/// # Example
/// ```no_run
/// use minicart::{Criterion, SampleReader, TreeBuilder};
///
/// let sample = SampleReader::new()
///     .file("/path/to/csv/file.csv")
///     .has_header(true)
///     .target_feature("salary")
///     .read()
///     .unwrap();
///
/// let tree = TreeBuilder::new()
///     .criterion(Criterion::Sse)
///     .min_samples_leaf(5)
///     .fit(&sample)
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBuilder {
    criterion: Criterion,
    min_samples_leaf: usize,
    min_impurity_decrease: f64,
    max_depth: Option<usize>,
    unseen_policy: UnseenPolicy,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Construct a builder with the default settings:
    /// [`Criterion::Sse`], `min_samples_leaf = 5`,
    /// `min_impurity_decrease = 0.0`, no depth cap,
    /// and [`UnseenPolicy::Error`].
    pub fn new() -> Self {
        Self {
            criterion: Criterion::Sse,
            min_samples_leaf: 5,
            min_impurity_decrease: 0.0,
            max_depth: None,
            unseen_policy: UnseenPolicy::Error,
        }
    }

    /// Set the splitting criterion.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the minimal number of training observations
    /// each leaf must hold.
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the smallest impurity decrease a split must achieve.
    pub fn min_impurity_decrease(mut self, decrease: f64) -> Self {
        self.min_impurity_decrease = decrease;
        self
    }

    /// Cap the tree depth. A cap of `0` grows a single leaf.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set what prediction does with
    /// categorical codes never seen during training.
    pub fn unseen_policy(mut self, policy: UnseenPolicy) -> Self {
        self.unseen_policy = policy;
        self
    }

    /// Grow a tree over the given sample.
    ///
    /// # Errors
    /// Rejects empty or ragged samples, samples holding NaN,
    /// and invalid builder settings.
    pub fn fit(&self, sample: &Sample) -> Result<Tree, TreeError> {
        checker::check_sample(sample)?;
        checker::check_no_missing(sample)?;

        let (n_sample, n_feature) = sample.shape();
        if self.min_samples_leaf == 0 {
            let msg = "min_samples_leaf must be at least 1".to_string();
            return Err(TreeError::InvalidParameter(msg));
        }
        if self.min_samples_leaf >= n_sample {
            let msg = format!(
                "min_samples_leaf ({}) must be smaller than the \
                 number of observations ({n_sample})",
                self.min_samples_leaf,
            );
            return Err(TreeError::InvalidParameter(msg));
        }
        if !self.min_impurity_decrease.is_finite()
            || self.min_impurity_decrease < 0.0
        {
            let msg = format!(
                "min_impurity_decrease must be finite and non-negative, \
                 got {}",
                self.min_impurity_decrease,
            );
            return Err(TreeError::InvalidParameter(msg));
        }
        if !self.criterion.is_regression() {
            if let Some(&y) = sample.target()
                .iter()
                .find(|y| y.fract() != 0.0)
            {
                let msg = format!(
                    "the criterion `{}` classifies, but the target \
                     holds the non-integral label {y}",
                    self.criterion,
                );
                return Err(TreeError::InvalidParameter(msg));
            }
        }

        let indices = (0..n_sample).collect::<Vec<usize>>();
        let candidates = (0..n_feature).collect::<Vec<usize>>();
        let root = self.grow(sample, &indices, &candidates, 0)?;

        Ok(Tree {
            root,
            n_sample,
            criterion: self.criterion,
            unseen_policy: self.unseen_policy,
        })
    }

    /// Grow the subtree of one region.
    fn grow(
        &self,
        sample: &Sample,
        indices: &[usize],
        candidates: &[usize],
        depth: usize,
    ) -> Result<Node, TreeError>
    {
        let (value, impurity, cost_as_leaf) =
            self.criterion.region_stats(sample, indices);
        let n_sample = indices.len();

        if self.max_depth.is_some_and(|cap| depth >= cap) {
            return Ok(Node::leaf(value, n_sample, impurity, cost_as_leaf));
        }

        let best = find_best_split(
            sample, indices, candidates,
            self.criterion, self.min_samples_leaf,
        )?;
        let best = match best {
            Some(best) if best.gain >= self.min_impurity_decrease => best,
            _ => {
                return Ok(
                    Node::leaf(value, n_sample, impurity, cost_as_leaf)
                );
            },
        };

        let mut left_ix = Vec::new();
        let mut right_ix = Vec::new();
        for &i in indices {
            match best.rule.split(sample, i) {
                Direction::Left => left_ix.push(i),
                Direction::Right => right_ix.push(i),
            }
        }

        let left = self.grow(sample, &left_ix, candidates, depth + 1)?;
        let right = self.grow(sample, &right_ix, candidates, depth + 1)?;

        Ok(Node::branch(
            best.rule, left, right,
            value, n_sample, impurity, cost_as_leaf,
        ))
    }
}
