use polars::prelude::*;
use std::ops::Index;
use std::slice::Iter;

const BUF_SIZE: usize = 256;

/// How the splitter interprets a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Ordinary numeric values, split by a threshold test.
    Numeric,
    /// Non-negative integral codes in `0..n_categories`,
    /// split by a category-subset membership test.
    Categorical {
        /// Size of the code universe observed during loading.
        n_categories: usize,
    },
}

/// A single named column of the dataset.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature name.
    name: String,
    /// Feature values, one per observation.
    values: Vec<f64>,
    /// Numeric or categorical interpretation.
    kind: FeatureKind,
}

impl Feature {
    /// Construct an empty numeric feature with `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::with_capacity(BUF_SIZE),
            kind: FeatureKind::Numeric,
        }
    }

    /// Construct a numeric feature from the given values.
    pub fn with_values<T: ToString>(name: T, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values,
            kind: FeatureKind::Numeric,
        }
    }

    /// Convert `polars::Series` into `Feature`.
    pub fn from_series(series: &Series) -> Self {
        let name = series.name().to_string();

        let values = series.f64()
            .expect("The series is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .unwrap();

        Self { name, values, kind: FeatureKind::Numeric, }
    }

    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The numeric/categorical interpretation of this feature.
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: FeatureKind) {
        self.kind = kind;
    }

    /// All values of this feature, one per observation.
    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }

    /// Returns an iterator over feature values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }

    /// Append an observation to this feature.
    pub fn append(&mut self, x: f64) {
        self.values.push(x);
    }

    /// Returns the number of observations in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if `self.len()` equals `0`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_target(self) -> Vec<f64> {
        self.values
    }

    /// Clone the given rows of this feature, keeping name and kind.
    pub(crate) fn take_rows(&self, rows: &[usize]) -> Self {
        let values = rows.iter()
            .map(|&i| self.values[i])
            .collect::<Vec<_>>();
        Self {
            name: self.name.clone(),
            values,
            kind: self.kind,
        }
    }
}

impl Index<usize> for Feature {
    type Output = f64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}
