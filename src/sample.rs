//! The in-memory dataset the trees are grown on.

mod feature_struct;
mod sample_reader;
mod sample_struct;

pub use feature_struct::{Feature, FeatureKind};
pub use sample_reader::SampleReader;
pub use sample_struct::Sample;
