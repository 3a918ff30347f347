//! This file defines some functions that check pre-conditions
//! E.g., shape of data, absence of missing values.

use crate::Sample;
use crate::TreeError;

/// Check whether the training sample is valid or not.
#[inline]
pub(crate) fn check_sample(sample: &Sample) -> Result<(), TreeError> {
    let (n_sample, n_feature) = sample.shape();

    if n_sample == 0 {
        let msg = "the sample has no observations".to_string();
        return Err(TreeError::InvalidParameter(msg));
    }

    if n_feature == 0 {
        let msg = "the sample has no features".to_string();
        return Err(TreeError::InvalidParameter(msg));
    }

    if sample.target().len() != n_sample {
        let msg = format!(
            "the target column is not set, or its length differs \
             from the number of observations ({n_sample}). \
             Use `Sample::set_target(\"column name\")`."
        );
        return Err(TreeError::InvalidParameter(msg));
    }

    Ok(())
}

/// Check that the training data carries no missing (NaN) values.
/// Missing-value handling belongs to the data-loading side;
/// the tree builder rejects such input eagerly.
#[inline]
pub(crate) fn check_no_missing(sample: &Sample) -> Result<(), TreeError> {
    for feature in sample.features() {
        if feature.values().iter().any(|v| v.is_nan()) {
            let name = feature.name();
            let msg = format!(
                "feature `{name}` contains missing (NaN) values; \
                 impute or drop them before fitting"
            );
            return Err(TreeError::InvalidParameter(msg));
        }
    }

    if sample.target().iter().any(|y| y.is_nan()) {
        let msg = "the target contains missing (NaN) values".to_string();
        return Err(TreeError::InvalidParameter(msg));
    }

    Ok(())
}
