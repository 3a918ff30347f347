#![warn(missing_docs)]

//!
//! A crate that provides classification and regression trees (CART):
//! recursive binary splitting, cost-complexity (weakest-link) pruning,
//! and region-based prediction.
//!
//! A tree is grown top-down by [`TreeBuilder`]:
//! at every node the best splitting rule is chosen greedily by
//! [`find_best_split`] under the configured [`Criterion`],
//! and the recursion stops at the configured leaf-size,
//! impurity-decrease, and depth floors.
//! The grown [`Tree`] can be pruned back along the nested
//! cost-complexity sequence via [`Tree::prune_sequence`],
//! [`Tree::prune_to_size`], and [`Tree::prune_with_alpha`].
//!
//! ```no_run
//! use minicart::prelude::*;
//!
//! let sample = SampleReader::new()
//!     .file("/path/to/data/file.csv")
//!     .has_header(true)
//!     .target_feature("log_salary")
//!     .read()
//!     .unwrap();
//!
//! let tree = TreeBuilder::new()
//!     .criterion(Criterion::Sse)
//!     .min_samples_leaf(5)
//!     .fit(&sample)
//!     .unwrap();
//!
//! let pruned = tree.prune_to_size(3).unwrap();
//! let yhat = pruned.predict(&sample, 0).unwrap();
//! println!("predicted {yhat}, tree has {} leaves", pruned.n_leaves());
//! ```

mod common;
mod error;

pub mod sample;
pub mod tree;
pub mod research;

pub mod prelude;

pub use error::TreeError;

pub use sample::{
    Feature,
    FeatureKind,
    Sample,
    SampleReader,
};

pub use tree::{
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

pub use research::metrics;
pub use research::CrossValidation;
