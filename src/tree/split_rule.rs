//! Decision rules stored at the branch nodes.

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::Sample;
use crate::TreeError;

/// The output of the `split` methods of [`SplitRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Descend to the left child.
    Left,
    /// Descend to the right child.
    Right,
}

/// What a decision node does with a categorical code it never saw
/// during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnseenPolicy {
    /// Reject the observation with
    /// [`TreeError::UnseenCategory`](crate::TreeError::UnseenCategory).
    Error,
    /// Route the observation to the left child.
    Left,
    /// Route the observation to the right child.
    Right,
}

/// A binary decision over one feature.
/// Numeric features are cut by a threshold (`value < threshold` goes
/// left); categorical features by a subset membership test
/// (codes in the subset go left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitRule {
    /// `observation[feature] < threshold` goes left.
    Threshold {
        /// Column index of the tested feature.
        feature: usize,
        /// Name of the tested feature.
        name: String,
        /// The cut point, a midpoint between two observed values.
        threshold: f64,
    },
    /// `observation[feature] ∈ categories` goes left.
    Subset {
        /// Column index of the tested feature.
        feature: usize,
        /// Name of the tested feature.
        name: String,
        /// The codes routed left.
        /// The bitset length is the feature's code universe size.
        #[serde(with = "bitset_serde")]
        categories: FixedBitSet,
    },
}

impl SplitRule {
    /// Column index of the feature this rule tests.
    pub fn feature(&self) -> usize {
        match self {
            Self::Threshold { feature, .. } => *feature,
            Self::Subset { feature, .. } => *feature,
        }
    }

    /// Name of the feature this rule tests.
    pub fn feature_name(&self) -> &str {
        match self {
            Self::Threshold { name, .. } => name,
            Self::Subset { name, .. } => name,
        }
    }

    /// Route a training row.
    /// Training data is validated before growth
    /// (no NaN, categorical codes inside the universe),
    /// so this never fails.
    #[inline]
    pub(crate) fn split(&self, sample: &Sample, row: usize) -> Direction {
        let value = sample.feature(self.feature())[row];
        match self {
            Self::Threshold { threshold, .. } => {
                if value < *threshold {
                    Direction::Left
                } else {
                    Direction::Right
                }
            },
            Self::Subset { categories, .. } => {
                let code = value as usize;
                if code < categories.len() && categories.contains(code) {
                    Direction::Left
                } else {
                    Direction::Right
                }
            },
        }
    }

    /// Route an arbitrary observation,
    /// surfacing missing values and unseen categorical codes.
    #[inline]
    pub fn try_split(
        &self,
        sample: &Sample,
        row: usize,
        policy: UnseenPolicy,
    ) -> Result<Direction, TreeError>
    {
        let value = sample.feature(self.feature())[row];
        if value.is_nan() {
            return Err(TreeError::MissingFeature {
                feature: self.feature_name().to_string(),
                row,
            });
        }

        match self {
            Self::Threshold { threshold, .. } => {
                let lr = if value < *threshold {
                    Direction::Left
                } else {
                    Direction::Right
                };
                Ok(lr)
            },
            Self::Subset { categories, .. } => {
                let in_universe = value >= 0.0
                    && value.fract() == 0.0
                    && (value as usize) < categories.len();

                if !in_universe {
                    return match policy {
                        UnseenPolicy::Error => {
                            Err(TreeError::UnseenCategory {
                                feature: self.feature_name().to_string(),
                                code: value,
                            })
                        },
                        UnseenPolicy::Left => Ok(Direction::Left),
                        UnseenPolicy::Right => Ok(Direction::Right),
                    };
                }

                let lr = if categories.contains(value as usize) {
                    Direction::Left
                } else {
                    Direction::Right
                };
                Ok(lr)
            },
        }
    }

    /// A scalar used for deterministic tie-breaking between rules
    /// of the same quality on the same feature:
    /// the threshold for numeric rules,
    /// the smallest member code for subset rules.
    pub(crate) fn order_key(&self) -> f64 {
        match self {
            Self::Threshold { threshold, .. } => *threshold,
            Self::Subset { categories, .. } => {
                categories.ones().next().map(|c| c as f64).unwrap_or(0.0)
            },
        }
    }
}

mod bitset_serde {
    use fixedbitset::FixedBitSet;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(set: &FixedBitSet, ser: S) -> Result<S::Ok, S::Error>
        where S: Serializer,
    {
        let ones = set.ones().collect::<Vec<usize>>();
        (set.len(), ones).serialize(ser)
    }

    pub fn deserialize<'de, D>(de: D) -> Result<FixedBitSet, D::Error>
        where D: Deserializer<'de>,
    {
        let (len, ones): (usize, Vec<usize>) =
            Deserialize::deserialize(de)?;
        let mut set = FixedBitSet::with_capacity(len);
        for i in ones {
            set.insert(i);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Feature, Sample};

    fn numeric_rule() -> SplitRule {
        SplitRule::Threshold {
            feature: 0,
            name: "x".to_string(),
            threshold: 1.5,
        }
    }

    fn subset_rule() -> SplitRule {
        let mut categories = FixedBitSet::with_capacity(3);
        categories.insert(0);
        categories.insert(2);
        SplitRule::Subset {
            feature: 0,
            name: "c".to_string(),
            categories,
        }
    }

    #[test]
    fn threshold_routes_left_on_strictly_smaller() {
        let sample = Sample::from_raw(
            vec![Feature::with_values("x", vec![1.0, 1.5, 2.0])],
            vec![0.0; 3],
        ).unwrap();

        let rule = numeric_rule();
        assert_eq!(rule.split(&sample, 0), Direction::Left);
        assert_eq!(rule.split(&sample, 1), Direction::Right);
        assert_eq!(rule.split(&sample, 2), Direction::Right);
    }

    #[test]
    fn subset_membership_routes_left() {
        let sample = Sample::from_raw(
            vec![Feature::with_values("c", vec![0.0, 1.0, 2.0])],
            vec![0.0; 3],
        ).unwrap();

        let rule = subset_rule();
        assert_eq!(rule.split(&sample, 0), Direction::Left);
        assert_eq!(rule.split(&sample, 1), Direction::Right);
        assert_eq!(rule.split(&sample, 2), Direction::Left);
    }

    #[test]
    fn try_split_reports_missing_value() {
        let sample = Sample::from_raw(
            vec![Feature::with_values("x", vec![f64::NAN])],
            vec![0.0],
        ).unwrap();

        let rule = numeric_rule();
        let res = rule.try_split(&sample, 0, UnseenPolicy::Error);
        assert_eq!(
            res,
            Err(TreeError::MissingFeature {
                feature: "x".to_string(),
                row: 0,
            }),
        );
    }

    #[test]
    fn try_split_unseen_code_follows_policy() {
        let sample = Sample::from_raw(
            vec![Feature::with_values("c", vec![7.0])],
            vec![0.0],
        ).unwrap();

        let rule = subset_rule();
        let res = rule.try_split(&sample, 0, UnseenPolicy::Error);
        assert_eq!(
            res,
            Err(TreeError::UnseenCategory {
                feature: "c".to_string(),
                code: 7.0,
            }),
        );

        let res = rule.try_split(&sample, 0, UnseenPolicy::Right);
        assert_eq!(res, Ok(Direction::Right));
    }
}
