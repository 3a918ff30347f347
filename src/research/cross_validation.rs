use colored::Colorize;
use rand::prelude::*;

use std::iter::Iterator;

use crate::Sample;

const WIDTH: usize = 9;

/// A struct that generates
/// pairs of training/test sample for cross validation.
/// The rows are dealt into `n_folds` contiguous folds;
/// when the sample size is not divisible,
/// the first `n % n_folds` folds receive one extra row.
/// # Example
/// ```no_run
/// use minicart::prelude::*;
/// use minicart::{metrics, CrossValidation};
///
/// let sample = SampleReader::new()
///     .file("/path/to/csv/file.csv")
///     .has_header(true)
///     .target_feature("log_salary")
///     .read()
///     .unwrap();
///
/// let cv = CrossValidation::new(&sample)
///     .n_folds(5)
///     .verbose(true)
///     .seed(777)
///     .shuffle();
/// for (train, test) in cv {
///     let tree = TreeBuilder::new()
///         .criterion(Criterion::Sse)
///         .fit(&train)
///         .unwrap()
///         .prune_to_size(8)
///         .unwrap();
///
///     let train_loss = metrics::mean_squared_error(&train, &tree).unwrap();
///     let test_loss = metrics::mean_squared_error(&test, &tree).unwrap();
///     println!("[train: {train_loss}] [test: {test_loss}]");
/// }
/// ```
pub struct CrossValidation<'a> {
    current_fold: usize,
    n_folds: usize,
    seed: u64,
    sample: &'a Sample,
    ix: Vec<usize>,
    verbose: bool,
}

impl<'a> CrossValidation<'a> {
    /// Construct a new instance of `CrossValidation.`
    #[inline]
    pub fn new(sample: &'a Sample) -> Self {
        let n_sample = sample.shape().0;
        let ix = (0..n_sample).collect::<Vec<_>>();
        Self {
            current_fold: 0,
            n_folds: 5,
            seed: 1234,
            verbose: false,
            sample,
            ix,
        }
    }

    /// Set the number of folds.
    /// Default value is `5.`
    #[inline]
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        assert!(
            n_folds >= 2 && n_folds <= self.sample.shape().0,
            "The number of folds should be in `2..=n_sample`."
        );
        self.n_folds = n_folds;
        self
    }

    /// Set the seed of the randomness for shuffling.
    /// Default vaule is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the verbose parameter.
    /// If `true`, `CrossValidation` prints some information
    /// when generating a train/test pair.
    /// Default vaule is `false.`
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Shuffle the training sample.
    /// By default, `CrossValidation` does not shuffle the sample.
    #[inline]
    pub fn shuffle(mut self) -> Self {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.ix.shuffle(&mut rng);
        self
    }

    /// The half-open row range `ix[start..end]` of the `i`th fold.
    #[inline]
    fn fold_range(&self, i: usize) -> (usize, usize) {
        let n_sample = self.sample.shape().0;
        let base = n_sample / self.n_folds;
        let extra = n_sample % self.n_folds;

        let start = i * base + i.min(extra);
        let end = start + base + usize::from(i < extra);
        (start, end)
    }

    /// Returns the training/test sample for `i`th fold.
    #[inline]
    fn fold_at(&self, i: usize) -> (Sample, Sample) {
        let (start, end) = self.fold_range(i);
        self.sample.split(&self.ix, start, end)
    }
}

impl<'a> Iterator for CrossValidation<'a> {
    type Item = (Sample, Sample);
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_fold >= self.n_folds { return None; }

        let output = self.fold_at(self.current_fold);
        self.current_fold += 1;

        if self.verbose {
            let train_size = output.0.shape().0;
            let test_size = output.1.shape().0;
            println!(
                "{}    {}    {}",
                format!("  [{: >3}'th fold]", self.current_fold).bold().red(),
                format!("[TRAIN {:>WIDTH$}]", train_size).bold().green(),
                format!("[TEST {:>WIDTH$}]", test_size).bold().yellow(),
            );
        }

        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;

    fn sample_of(n: usize) -> Sample {
        let values = (0..n).map(|i| i as f64).collect::<Vec<_>>();
        Sample::from_raw(
            vec![Feature::with_values("x", values)],
            vec![0.0; n],
        ).unwrap()
    }

    #[test]
    fn folds_partition_the_rows() {
        let sample = sample_of(10);
        let cv = CrossValidation::new(&sample).n_folds(3);

        let mut test_rows = Vec::new();
        for (train, test) in cv {
            assert_eq!(train.shape().0 + test.shape().0, 10);
            test_rows.extend(
                test["x"].values().iter().map(|&v| v as usize)
            );
        }

        // Sizes 4, 3, 3 and every row appears exactly once.
        test_rows.sort_unstable();
        assert_eq!(test_rows, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn uneven_folds_spread_the_remainder() {
        let sample = sample_of(10);
        let sizes = CrossValidation::new(&sample)
            .n_folds(3)
            .map(|(_, test)| test.shape().0)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn shuffle_is_reproducible() {
        let sample = sample_of(20);
        let a = CrossValidation::new(&sample)
            .seed(42)
            .shuffle()
            .map(|(_, test)| test["x"].values().to_vec())
            .collect::<Vec<_>>();
        let b = CrossValidation::new(&sample)
            .seed(42)
            .shuffle()
            .map(|(_, test)| test["x"].values().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(a, b);
    }
}
