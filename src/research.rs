//! Model-assessment tooling:
//! cross-validation and the loss functions it reports.

mod cross_validation;
pub mod metrics;

pub use cross_validation::CrossValidation;
