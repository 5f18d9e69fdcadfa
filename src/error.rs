use thiserror::Error;

/// Load-time failures. Every variant is fatal: the dataset either loads in
/// full or the session cannot proceed. Rows with unparseable dates are not
/// errors; they are dropped and counted by the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data file is missing or unreadable.
    #[error("failed to read data file `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV, or a row holds a non-numeric close price.
    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),

    /// The header row lacks one of the required columns.
    #[error("required column `{0}` is missing from the header")]
    MissingColumn(&'static str),
}
