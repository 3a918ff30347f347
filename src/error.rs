//! Error kinds for tree construction, pruning, and prediction.
use std::error::Error;
use std::fmt;

/// Every failure the crate reports.
/// Note that "no valid split exists" is **not** an error;
/// [`find_best_split`](crate::find_best_split) returns `Ok(None)`
/// in that case since it is a stopping condition of tree growth.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The splitter was invoked on a region with zero observations.
    /// This indicates a bug in the caller, not bad data.
    EmptyRegion,

    /// A queried observation has no value (NaN) for a feature
    /// some decision node tests.
    MissingFeature {
        /// Name of the feature the decision node tests.
        feature: String,
        /// Row index of the offending observation.
        row: usize,
    },

    /// A queried observation carries a categorical code that was not
    /// part of the feature's universe during training.
    UnseenCategory {
        /// Name of the categorical feature.
        feature: String,
        /// The offending code, as found in the observation.
        code: f64,
    },

    /// The requested subtree size is below `1` or exceeds the number
    /// of terminal nodes of the full tree.
    InvalidPruneSize {
        /// The requested number of terminal nodes.
        requested: usize,
        /// The number of terminal nodes of the full tree.
        available: usize,
    },

    /// A configuration or input value was rejected before any
    /// splitting work began.
    InvalidParameter(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegion => {
                write!(f, "the splitter was invoked on an empty region")
            },
            Self::MissingFeature { feature, row } => {
                write!(
                    f,
                    "observation {row} has no value \
                     for feature `{feature}`"
                )
            },
            Self::UnseenCategory { feature, code } => {
                write!(
                    f,
                    "feature `{feature}` got the category code {code}, \
                     which was not observed during training"
                )
            },
            Self::InvalidPruneSize { requested, available } => {
                write!(
                    f,
                    "requested a subtree with {requested} terminal \
                     node(s), but valid sizes are 1..={available}"
                )
            },
            Self::InvalidParameter(msg) => {
                write!(f, "invalid parameter: {msg}")
            },
        }
    }
}

impl Error for TreeError {}
