use thiserror::Error;

/// Validation failures of the table transforms.
///
/// None of these are transient: the transform is aborted and the error is
/// handed back to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectrumError {
    #[error("sample collection is empty")]
    EmptyCollection,

    #[error("sample '{key}' has {columns} column(s), expected at least 2 (wavelength, reflectance)")]
    MalformedSample { key: String, columns: usize },

    #[error("shape mismatch for '{key}': {detail}")]
    ShapeMismatch { key: String, detail: String },

    #[error("window size must be a positive integer, got {0}")]
    InvalidWindowSize(usize),

    #[error("table has no data columns")]
    EmptyTable,

    #[error("duplicate sample key '{0}'")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
