//! Exports the standard members of this crate.
//!
//! ```
//! use minicart::prelude::*;
//! ```

pub use crate::TreeError;

pub use crate::sample::{
    Feature,
    FeatureKind,
    Sample,
    SampleReader,
};

pub use crate::tree::{
    find_best_split,
    Criterion,
    Direction,
    LeafValue,
    Node,
    PruningStep,
    SplitCandidate,
    SplitRule,
    Tree,
    TreeBuilder,
    UnseenPolicy,
};

pub use crate::research::{
    metrics,
    CrossValidation,
};
