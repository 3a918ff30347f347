//! Impurity criteria for node splitting.

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

use super::node::LeafValue;
use crate::Sample;

/// Splitting criteria for growing a tree.
/// [`Criterion::Sse`] grows a regression tree with mean-value leaves;
/// the remaining criteria grow classification trees with
/// class-distribution leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    /// Within-region sum of squared errors (regression).
    Sse,
    /// Gini index.
    Gini,
    /// Entropy.
    Entropy,
    /// Misclassification rate.
    Misclassification,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sse => "Sum of squared errors",
            Self::Gini => "Gini index",
            Self::Entropy => "Entropy",
            Self::Misclassification => "Misclassification rate",
        };

        write!(f, "{name}")
    }
}

impl Criterion {
    /// Returns `true` if this criterion grows a regression tree.
    pub fn is_regression(&self) -> bool {
        matches!(self, Self::Sse)
    }

    /// Impurity of a class-weight map under this criterion.
    /// Panics on [`Criterion::Sse`]; regression regions are measured
    /// by their variance instead.
    pub(crate) fn class_impurity(&self, map: &HashMap<i64, f64>) -> f64 {
        match self {
            Self::Sse => {
                unreachable!("Sse has no class-distribution impurity")
            },
            Self::Gini => gini_impurity(map),
            Self::Entropy => entropic_impurity(map),
            Self::Misclassification => misclassification_impurity(map),
        }
    }

    /// Prediction, impurity, and as-leaf training cost of a region.
    /// Impurity is a per-observation rate
    /// (variance / Gini / entropy / misclassification rate);
    /// the cost is absolute
    /// (summed squared error / misclassified count).
    pub(crate) fn region_stats(
        &self,
        sample: &Sample,
        indices: &[usize],
    ) -> (LeafValue, f64, f64)
    {
        let target = sample.target();
        let n = indices.len() as f64;

        if self.is_regression() {
            let sum = indices.iter()
                .map(|&i| target[i])
                .sum::<f64>();
            let mean = sum / n;
            let sse = indices.iter()
                .map(|&i| (target[i] - mean).powi(2))
                .sum::<f64>()
                .max(0.0);

            return (LeafValue::Mean(mean), sse / n, sse);
        }

        let counts = label_counts(target, indices);
        let (label, top) = counts.iter()
            .map(|(&l, &w)| (l, w))
            .max_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .expect("class weights are finite")
                    // Ties go to the smaller label.
                    .then_with(|| b.0.cmp(&a.0))
            })
            .expect("a region holds at least one observation");

        let mut proportions = counts.iter()
            .map(|(&l, &w)| (l, w / n))
            .collect::<Vec<_>>();
        proportions.sort_by_key(|&(l, _)| l);

        let impurity = self.class_impurity(&counts);
        let cost_as_leaf = (n - top).max(0.0);

        (LeafValue::Class { label, proportions }, impurity, cost_as_leaf)
    }
}

/// Count the region's observations per class label.
pub(crate) fn label_counts(target: &[f64], indices: &[usize])
    -> HashMap<i64, f64>
{
    let mut counts = HashMap::new();
    for &i in indices {
        let y = target[i] as i64;
        let cnt = counts.entry(y).or_insert(0f64);
        *cnt += 1f64;
    }
    counts
}

/// Returns the gini-impurity of the given map.
#[inline]
pub(crate) fn gini_impurity(map: &HashMap<i64, f64>) -> f64 {
    let total = map.values().sum::<f64>();
    if total <= 0f64 || map.is_empty() { return 0f64; }

    let correct = map.values()
        .map(|&w| (w / total).powi(2))
        .sum::<f64>();

    (1f64 - correct).max(0f64)
}

/// Returns the entropic-impurity of the given map.
#[inline]
pub(crate) fn entropic_impurity(map: &HashMap<i64, f64>) -> f64 {
    let total = map.values().sum::<f64>();
    if total <= 0f64 || map.is_empty() { return 0f64; }

    map.values()
        .map(|&w| {
            let r = w / total;
            if r <= 0f64 { 0f64 } else { -r * r.ln() }
        })
        .sum::<f64>()
}

/// Returns the misclassification rate of the given map.
#[inline]
pub(crate) fn misclassification_impurity(map: &HashMap<i64, f64>) -> f64 {
    let total = map.values().sum::<f64>();
    if total <= 0f64 || map.is_empty() { return 0f64; }

    let top = map.values()
        .fold(0f64, |acc, &w| acc.max(w));

    (1f64 - top / total).max(0f64)
}
