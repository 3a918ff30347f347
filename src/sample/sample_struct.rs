use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Index;
use std::path::Path;

use polars::prelude::*;
use rayon::prelude::*;

use super::feature_struct::*;
use crate::TreeError;

/// Struct `Sample` holds a rectangular batch sample:
/// an ordered sequence of observations over a fixed predictor schema
/// plus one response column.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}

impl Sample {
    /// Construct a `Sample` from raw columns.
    /// Every feature must have exactly `target.len()` values.
    pub fn from_raw(features: Vec<Feature>, target: Vec<f64>)
        -> Result<Self, TreeError>
    {
        let n_sample = target.len();
        for feature in &features {
            if feature.len() != n_sample {
                let name = feature.name();
                let msg = format!(
                    "feature `{name}` has {} value(s), \
                     but the target has {n_sample}",
                    feature.len(),
                );
                return Err(TreeError::InvalidParameter(msg));
            }
        }

        let n_feature = features.len();
        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        Ok(Self { name_to_index, features, target, n_sample, n_feature, })
    }

    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership for the given pair
    /// `data` and `target`.
    pub fn from_dataframe(data: DataFrame, target: Series)
        -> io::Result<Self>
    {
        let (n_sample, n_feature) = data.shape();
        let target = target.f64()
            .expect("The target is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .unwrap();

        let features = data.get_columns()
            .into_par_iter()
            .map(Feature::from_series)
            .collect::<Vec<_>>();

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };
        Ok(sample)
    }

    /// Read a CSV format file to `Sample` type.
    /// The target column is not set; call [`Sample::set_target`] next.
    pub fn from_csv<P>(file: P, mut has_header: bool) -> io::Result<Self>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        let mut lines = BufReader::new(file).lines();

        let mut features = Vec::new();
        if has_header {
            let line = lines.next().unwrap();
            features = line?.split(',')
                .map(|name| Feature::new(name.trim()))
                .collect::<Vec<_>>();
        }
        let mut n_sample = 0_usize;

        for line in lines {
            let line = line?;

            // If the header does not exist, construct a dummy header
            // from the first data row.
            if !has_header {
                let xs = line.split(',')
                    .map(|x| x.trim().parse::<f64>().unwrap())
                    .collect::<Vec<_>>();

                let n_feature = xs.len();
                features = (1..=n_feature).map(|i| {
                        let name = format!("Feat. [{i}]");
                        Feature::new(name)
                    })
                    .collect::<Vec<_>>();

                for (feat, x) in features.iter_mut().zip(xs) {
                    feat.append(x);
                }

                has_header = true;
                n_sample += 1;
                continue;
            }

            line.split(',')
                .map(|x| x.trim().parse::<f64>().unwrap())
                .enumerate()
                .for_each(|(i, x)| {
                    features[i].append(x);
                });

            n_sample += 1;
        }

        let n_feature = features.len();
        let target = Vec::with_capacity(0);

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };

        Ok(sample)
    }

    /// Returns the response column as a slice.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }

    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }

    /// Returns the feature at column `idx`.
    pub fn feature(&self, idx: usize) -> &Feature {
        &self.features[idx]
    }

    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Self {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|feat| feat.name() == target)
            .expect("The target column does not exist");

        let target = self.features.remove(pos).into_target();
        self.target = target;
        self.n_feature -= 1;

        self.name_to_index = self.features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        self
    }

    /// Mark the named columns as categorical.
    /// Each value of such a column must be a non-negative integral
    /// code; the code universe is `0..=max_code`.
    pub fn set_categorical<S>(mut self, names: &[S])
        -> Result<Self, TreeError>
        where S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let pos = match self.name_to_index.get(name) {
                Some(&pos) => pos,
                None => {
                    let msg = format!(
                        "cannot mark `{name}` as categorical: \
                         no such feature"
                    );
                    return Err(TreeError::InvalidParameter(msg));
                },
            };

            let feature = &mut self.features[pos];
            let mut max_code = 0_usize;
            for &v in feature.values() {
                if v < 0.0 || v.fract() != 0.0 || !v.is_finite() {
                    let msg = format!(
                        "categorical feature `{name}` contains the \
                         value {v}, which is not a non-negative \
                         integral code"
                    );
                    return Err(TreeError::InvalidParameter(msg));
                }
                max_code = max_code.max(v as usize);
            }

            let n_categories = max_code + 1;
            feature.set_kind(FeatureKind::Categorical { n_categories });
        }

        Ok(self)
    }

    /// Returns the pair of the number of observations and
    /// the number of features.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }

    /// Returns the `idx`-th observation `(x, y)`.
    pub fn at(&self, idx: usize) -> (Vec<f64>, f64) {
        let x = self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>();
        let y = self.target[idx];

        (x, y)
    }

    /// Clone the given rows into a new `Sample`
    /// with the same predictor schema.
    pub fn subset(&self, rows: &[usize]) -> Self {
        let features = self.features.iter()
            .map(|feat| feat.take_rows(rows))
            .collect::<Vec<_>>();
        let target = rows.iter()
            .map(|&i| self.target[i])
            .collect::<Vec<_>>();

        Self {
            name_to_index: self.name_to_index.clone(),
            features,
            target,
            n_sample: rows.len(),
            n_feature: self.n_feature,
        }
    }

    /// Split the rows listed in `ix` into a train/test pair,
    /// where `ix[start..end]` becomes the test set and the remaining
    /// rows the training set.
    /// Used by [`CrossValidation`](crate::CrossValidation).
    pub fn split(&self, ix: &[usize], start: usize, end: usize)
        -> (Self, Self)
    {
        let test_rows = &ix[start..end];
        let train_rows = ix[..start].iter()
            .chain(ix[end..].iter())
            .copied()
            .collect::<Vec<_>>();

        (self.subset(&train_rows), self.subset(test_rows))
    }
}

impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;

    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = *self.name_to_index.get(name).unwrap();
        &self.features[k]
    }
}
