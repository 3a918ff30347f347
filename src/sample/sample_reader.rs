use std::io;
use std::path::PathBuf;

use super::sample_struct::Sample;

/// A struct that returns [`Sample`].
/// Using this struct, one can read a CSV format file to [`Sample`].
/// Other formats are not supported yet.
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use minicart::SampleReader;
/// let filename = "/path/to/csv/file.csv";
/// let sample = SampleReader::new()
///     .file(filename)
///     .has_header(true)
///     .target_feature("class")
///     .categorical_features(&["league", "division"])
///     .read()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct SampleReader {
    file: Option<PathBuf>,
    has_header: bool,
    target: Option<String>,
    categorical: Vec<String>,
}

impl SampleReader {
    /// Construct a new instance of [`SampleReader`].
    pub fn new() -> Self {
        Self {
            file: None,
            has_header: false,
            target: None,
            categorical: Vec::new(),
        }
    }

    /// Set the file name.
    pub fn file<P: Into<PathBuf>>(mut self, file: P) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the flag whether the file has the header row or not.
    /// Default is `false.`
    pub fn has_header(mut self, flag: bool) -> Self {
        self.has_header = flag;
        self
    }

    /// Set the column name that is used for the response.
    pub fn target_feature<S: AsRef<str>>(mut self, column: S) -> Self {
        self.target = Some(column.as_ref().to_string());
        self
    }

    /// Mark the named columns as categorical
    /// (non-negative integral codes).
    pub fn categorical_features<S: AsRef<str>>(mut self, columns: &[S])
        -> Self
    {
        self.categorical = columns.iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        self
    }

    /// Reads the file based on the arguments,
    /// and returns `std::io::Result<Sample>`.
    /// This method consumes `self.`
    pub fn read(self) -> io::Result<Sample> {
        if self.file.is_none() {
            panic!("The file name for the csv file is not set");
        }
        let file = self.file.unwrap();

        if self.target.is_none() {
            panic!(
                "Target (response) column is not specified. \
                 Use `SampleReader::target_feature`."
            );
        }
        let target = self.target.unwrap();

        let sample = Sample::from_csv(file, self.has_header)?
            .set_target(target);

        if self.categorical.is_empty() {
            return Ok(sample);
        }

        sample.set_categorical(&self.categorical)
            .map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            })
    }
}
