//! Exhaustive search for the best single-feature binary split.

use fixedbitset::FixedBitSet;
use rayon::prelude::*;

use std::collections::{BTreeMap, HashMap};

use super::criterion::Criterion;
use super::split_rule::SplitRule;
use crate::sample::{Feature, FeatureKind};
use crate::{Sample, TreeError};

/// Categorical features with at most this many observed codes are
/// split by exhaustive subset enumeration.
/// Above it, candidates are restricted to prefixes of the codes
/// ordered by mean response.
const MAX_EXHAUSTIVE_CATEGORIES: usize = 8;

/// The winning split of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCandidate {
    /// The decision rule realizing the split.
    pub rule: SplitRule,
    /// Impurity decrease of the split,
    /// `impurity(region) - weighted_impurity`.
    pub gain: f64,
    /// Sample-weighted mean impurity of the two child regions.
    pub weighted_impurity: f64,
}

/// Search the candidate features for the best binary split of the
/// region given by `indices`.
///
/// Returns `Ok(None)` when no split is admissible:
/// the region is too small for `min_samples_leaf`,
/// every candidate feature is constant on it,
/// or no split decreases impurity.
/// Ties are broken deterministically towards the lower feature index
/// and then the lower threshold (or smallest left-routed code).
pub fn find_best_split(
    sample: &Sample,
    indices: &[usize],
    candidates: &[usize],
    criterion: Criterion,
    min_samples_leaf: usize,
) -> Result<Option<SplitCandidate>, TreeError>
{
    if indices.is_empty() {
        return Err(TreeError::EmptyRegion);
    }

    let (_, n_feature) = sample.shape();
    if let Some(&j) = candidates.iter().find(|&&j| j >= n_feature) {
        let msg = format!(
            "candidate feature index {j} is out of range \
             for a sample with {n_feature} feature(s)"
        );
        return Err(TreeError::InvalidParameter(msg));
    }

    let n = indices.len();
    let min_leaf = min_samples_leaf.max(1);
    if n < 2 * min_leaf {
        return Ok(None);
    }

    let (_, parent_impurity, _) = criterion.region_stats(sample, indices);
    let target = sample.target();

    let best = candidates
        .par_iter()
        .filter_map(|&j| {
            let feature = sample.feature(j);
            let hit = match feature.kind() {
                FeatureKind::Numeric => {
                    best_threshold(feature, indices, target, criterion, min_leaf)
                        .map(|(w, threshold)| {
                            let rule = SplitRule::Threshold {
                                feature: j,
                                name: feature.name().to_string(),
                                threshold,
                            };
                            (w, rule)
                        })
                },
                FeatureKind::Categorical { n_categories } => {
                    best_subset(
                        feature, indices, target, criterion,
                        min_leaf, n_categories,
                    )
                        .map(|(w, categories)| {
                            let rule = SplitRule::Subset {
                                feature: j,
                                name: feature.name().to_string(),
                                categories,
                            };
                            (w, rule)
                        })
                },
            };
            hit
        })
        .min_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .expect("weighted impurities are finite")
                .then_with(|| a.1.feature().cmp(&b.1.feature()))
                .then_with(|| {
                    a.1.order_key().partial_cmp(&b.1.order_key())
                        .expect("order keys are finite")
                })
        });

    let (weighted_impurity, rule) = match best {
        Some(best) => best,
        None => { return Ok(None); },
    };

    let gain = parent_impurity - weighted_impurity;
    if gain <= 0.0 {
        return Ok(None);
    }

    Ok(Some(SplitCandidate { rule, gain, weighted_impurity, }))
}

/// Best threshold on one numeric feature.
/// Returns the weighted child impurity and the cut point,
/// a midpoint between two adjacent distinct values.
fn best_threshold(
    feature: &Feature,
    indices: &[usize],
    target: &[f64],
    criterion: Criterion,
    min_leaf: usize,
) -> Option<(f64, f64)>
{
    let n = indices.len();
    let mut pairs = indices.iter()
        .map(|&i| (feature[i], target[i]))
        .collect::<Vec<(f64, f64)>>();
    pairs.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .expect("training features hold no NaN")
    });

    if criterion.is_regression() {
        best_threshold_by_variance(&pairs, min_leaf)
    } else {
        best_threshold_by_class(&pairs, criterion, min_leaf, n)
    }
}

fn best_threshold_by_variance(pairs: &[(f64, f64)], min_leaf: usize)
    -> Option<(f64, f64)>
{
    let n = pairs.len();
    let total = pairs.iter().map(|&(_, y)| y).sum::<f64>();
    let total2 = pairs.iter().map(|&(_, y)| y * y).sum::<f64>();

    let mut lsum = 0f64;
    let mut lsum2 = 0f64;
    let mut best: Option<(f64, f64)> = None;

    for i in 1..n {
        let (x_prev, y_prev) = pairs[i - 1];
        lsum += y_prev;
        lsum2 += y_prev * y_prev;

        // Only a boundary between distinct values is a valid cut.
        if pairs[i].0 <= x_prev { continue; }
        if i < min_leaf || n - i < min_leaf { continue; }

        let nl = i as f64;
        let nr = (n - i) as f64;
        let sse_l = (lsum2 - lsum * lsum / nl).max(0.0);
        let rsum = total - lsum;
        let rsum2 = total2 - lsum2;
        let sse_r = (rsum2 - rsum * rsum / nr).max(0.0);

        let weighted = (sse_l + sse_r) / n as f64;
        // Strict comparison keeps the lowest threshold among ties.
        if best.map_or(true, |(w, _)| weighted < w) {
            let threshold = 0.5 * (x_prev + pairs[i].0);
            best = Some((weighted, threshold));
        }
    }

    best
}

fn best_threshold_by_class(
    pairs: &[(f64, f64)],
    criterion: Criterion,
    min_leaf: usize,
    n: usize,
) -> Option<(f64, f64)>
{
    let mut left = HashMap::<i64, f64>::new();
    let mut right = HashMap::<i64, f64>::new();
    for &(_, y) in pairs {
        *right.entry(y as i64).or_insert(0f64) += 1f64;
    }

    let mut best: Option<(f64, f64)> = None;

    for i in 1..n {
        let (x_prev, y_prev) = pairs[i - 1];
        let label = y_prev as i64;
        *left.entry(label).or_insert(0f64) += 1f64;
        let cnt = right.get_mut(&label)
            .expect("every moved label was counted on the right");
        *cnt -= 1f64;
        if *cnt <= 0f64 {
            right.remove(&label);
        }

        if pairs[i].0 <= x_prev { continue; }
        if i < min_leaf || n - i < min_leaf { continue; }

        let nl = i as f64;
        let nr = (n - i) as f64;
        let weighted = (
            nl * criterion.class_impurity(&left)
            + nr * criterion.class_impurity(&right)
        ) / n as f64;

        if best.map_or(true, |(w, _)| weighted < w) {
            let threshold = 0.5 * (x_prev + pairs[i].0);
            best = Some((weighted, threshold));
        }
    }

    best
}

/// Per-category aggregates of the region.
#[derive(Clone, Default)]
struct CategoryStats {
    count: f64,
    sum: f64,
    sum2: f64,
    labels: HashMap<i64, f64>,
}

impl CategoryStats {
    fn push(&mut self, y: f64) {
        self.count += 1f64;
        self.sum += y;
        self.sum2 += y * y;
        *self.labels.entry(y as i64).or_insert(0f64) += 1f64;
    }

    fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum2 += other.sum2;
        for (&label, &w) in &other.labels {
            *self.labels.entry(label).or_insert(0f64) += w;
        }
    }

    fn sse(&self) -> f64 {
        if self.count <= 0f64 { return 0f64; }
        (self.sum2 - self.sum * self.sum / self.count).max(0f64)
    }
}

/// Best category subset on one categorical feature.
/// Returns the weighted child impurity and the left-routed codes.
fn best_subset(
    feature: &Feature,
    indices: &[usize],
    target: &[f64],
    criterion: Criterion,
    min_leaf: usize,
    n_categories: usize,
) -> Option<(f64, FixedBitSet)>
{
    let mut per_code = BTreeMap::<usize, CategoryStats>::new();
    for &i in indices {
        let code = feature[i] as usize;
        per_code.entry(code).or_default().push(target[i]);
    }

    let k = per_code.len();
    if k < 2 { return None; }

    let codes = per_code.keys().copied().collect::<Vec<usize>>();
    let n = indices.len() as f64;

    let evaluate = |left_codes: &[usize]| -> Option<(f64, FixedBitSet)> {
        let mut left = CategoryStats::default();
        let mut right = CategoryStats::default();
        for &code in &codes {
            let stats = &per_code[&code];
            if left_codes.contains(&code) {
                left.merge(stats);
            } else {
                right.merge(stats);
            }
        }

        if (left.count as usize) < min_leaf
            || (right.count as usize) < min_leaf
        {
            return None;
        }

        let weighted = if criterion.is_regression() {
            (left.sse() + right.sse()) / n
        } else {
            (
                left.count * criterion.class_impurity(&left.labels)
                + right.count * criterion.class_impurity(&right.labels)
            ) / n
        };

        let mut categories = FixedBitSet::with_capacity(n_categories);
        for &code in left_codes {
            categories.insert(code);
        }

        Some((weighted, categories))
    };

    let mut best: Option<(f64, FixedBitSet)> = None;
    let mut consider = |hit: Option<(f64, FixedBitSet)>| {
        let (weighted, categories) = match hit {
            Some(hit) => hit,
            None => { return; },
        };
        let replace = match &best {
            None => true,
            Some((w, set)) => {
                weighted < *w || (
                    weighted == *w
                    && categories.ones().next() < set.ones().next()
                )
            },
        };
        if replace {
            best = Some((weighted, categories));
        }
    };

    if k <= MAX_EXHAUSTIVE_CATEGORIES {
        // Enumerate subsets over the first `k - 1` codes;
        // the last code stays on the right,
        // which skips every complement duplicate.
        for mask in 1usize..(1 << (k - 1)) {
            let left_codes = codes.iter()
                .enumerate()
                .filter(|&(j, _)| mask >> j & 1 == 1)
                .map(|(_, &code)| code)
                .collect::<Vec<usize>>();
            consider(evaluate(&left_codes));
        }
    } else {
        // Order the codes by mean response and
        // cut the ordering at each prefix.
        let mut ordered = codes.clone();
        ordered.sort_by(|a, b| {
            let ma = per_code[a].sum / per_code[a].count;
            let mb = per_code[b].sum / per_code[b].count;
            ma.partial_cmp(&mb)
                .expect("category means are finite")
                .then_with(|| a.cmp(b))
        });

        for j in 1..k {
            consider(evaluate(&ordered[..j]));
        }
    }

    best
}
