//! Loss functions and whole-sample evaluation metrics.

use crate::{Sample, Tree, TreeError};

/// Zero-one loss of a single prediction.
pub fn zero_one_loss(true_label: f64, prediction: f64) -> f64 {
    if true_label == prediction { 0.0 } else { 1.0 }
}

/// Squared loss
pub fn squared_loss(true_label: f64, prediction: f64) -> f64 {
    (true_label - prediction).powi(2)
}

/// Absolute loss
pub fn absolute_loss(true_label: f64, prediction: f64) -> f64 {
    (true_label - prediction).abs()
}

/// Mean squared error of the tree over the given sample.
pub fn mean_squared_error(sample: &Sample, tree: &Tree)
    -> Result<f64, TreeError>
{
    let n_sample = sample.shape().0 as f64;
    let target = sample.target();

    let total = tree.predict_all(sample)?
        .into_iter()
        .zip(target)
        .map(|(hx, &y)| squared_loss(y, hx))
        .sum::<f64>();

    Ok(total / n_sample)
}

/// Misclassification rate of the tree over the given sample.
pub fn misclassification_rate(sample: &Sample, tree: &Tree)
    -> Result<f64, TreeError>
{
    let n_sample = sample.shape().0 as f64;
    let target = sample.target();

    let total = tree.predict_all(sample)?
        .into_iter()
        .zip(target)
        .map(|(hx, &y)| zero_one_loss(y, hx))
        .sum::<f64>();

    Ok(total / n_sample)
}
