//! Recursive binary-split trees:
//! growth, cost-complexity pruning, and prediction.

mod builder;
mod criterion;
mod node;
mod pruning;
mod split_rule;
mod splitter;
mod tree_struct;

pub use builder::TreeBuilder;
pub use criterion::Criterion;
pub use node::{LeafValue, Node};
pub use pruning::PruningStep;
pub use split_rule::{Direction, SplitRule, UnseenPolicy};
pub use splitter::{find_best_split, SplitCandidate};
pub use tree_struct::Tree;
