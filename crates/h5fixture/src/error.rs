//! Error type for fixture writing.

use h5fixture_format::FormatError;

/// Errors raised while building or writing a fixture container.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The output file could not be created, written, or synced.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container tree could not be encoded.
    #[error("HDF5 format error: {0}")]
    Format(#[from] FormatError),

    /// A dataset or group with this path already exists.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// A dataset path names a group that has not been created yet.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// An attribute targets a dataset that has not been created yet.
    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    /// Empty path components, `.`, or nesting deeper than one group.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// A profile name that matches none of `FixtureProfile::ALL`.
    #[error("unknown fixture profile: {0}")]
    UnknownProfile(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_convert() {
        let err: Error = FormatError::DuplicateName("x".into()).into();
        assert_eq!(err.to_string(), "HDF5 format error: duplicate link name: x");
    }

    #[test]
    fn invalid_path_is_quoted() {
        assert_eq!(Error::InvalidPath("a//b".into()).to_string(), r#"invalid path: "a//b""#);
    }
}
