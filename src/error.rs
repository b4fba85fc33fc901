use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// A point, mask or bound did not match the dimensionality of the tree, or the tree itself
    /// was declared with too few dimensions.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl KdTreeError {
    pub(crate) fn dimension_mismatch(what: &str, actual: usize, expected: usize) -> Self {
        Self::InvalidArgument(format!(
            "{} has {} entries when expected {}.",
            what, actual, expected
        ))
    }
}

pub type Result<T> = std::result::Result<T, KdTreeError>;
