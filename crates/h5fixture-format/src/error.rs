//! Error types for HDF5 encoding and read-back.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

/// Errors produced while encoding a file, or while decoding one with the
/// `readback` feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The HDF5 magic signature was not found at any valid offset.
    SignatureNotFound,
    /// The superblock version is not supported.
    UnsupportedVersion(u8),
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// Invalid offset size (must be 2, 4, or 8).
    InvalidOffsetSize(u8),
    /// Invalid length size (must be 2, 4, or 8).
    InvalidLengthSize(u8),
    /// Invalid object header signature.
    InvalidObjectHeaderSignature,
    /// Invalid object header version.
    InvalidObjectHeaderVersion(u8),
    /// Jenkins lookup3 checksum mismatch.
    ChecksumMismatch {
        /// The checksum stored in the file.
        expected: u32,
        /// The checksum we computed.
        computed: u32,
    },
    /// Datatype class this crate does not handle.
    InvalidDatatypeClass(u8),
    /// Unknown string padding code.
    InvalidStringPadding(u8),
    /// Unknown character set code.
    InvalidCharacterSet(u8),
    /// Unknown dataspace message version.
    InvalidDataspaceVersion(u8),
    /// Unknown dataspace type code.
    InvalidDataspaceType(u8),
    /// Unknown attribute message version.
    InvalidAttributeVersion(u8),
    /// Unknown link message version.
    InvalidLinkVersion(u8),
    /// Link type other than a hard link.
    InvalidLinkType(u8),
    /// Data layout other than version 3/4 contiguous.
    UnsupportedLayout(u8),
    /// An object header lacks a message the object kind requires.
    MissingMessage(&'static str),
    /// Stored element type differs from the requested one.
    TypeMismatch {
        /// The type that was requested.
        expected: &'static str,
    },
    /// No object at the given path.
    PathNotFound(String),
    /// A dataset was added without data.
    DatasetMissingData,
    /// Two links in the same group share a name.
    DuplicateName(String),
    /// A header message exceeds the 16-bit message size field.
    MessageTooLarge(usize),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::SignatureNotFound => {
                write!(f, "HDF5 signature not found at any valid offset")
            }
            FormatError::UnsupportedVersion(v) => {
                write!(f, "unsupported superblock version: {v}")
            }
            FormatError::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            FormatError::InvalidOffsetSize(s) => {
                write!(f, "invalid offset size: {s} (must be 2, 4, or 8)")
            }
            FormatError::InvalidLengthSize(s) => {
                write!(f, "invalid length size: {s} (must be 2, 4, or 8)")
            }
            FormatError::InvalidObjectHeaderSignature => {
                write!(f, "invalid object header signature")
            }
            FormatError::InvalidObjectHeaderVersion(v) => {
                write!(f, "invalid object header version: {v}")
            }
            FormatError::ChecksumMismatch { expected, computed } => {
                write!(
                    f,
                    "checksum mismatch: expected {expected:#010x}, computed {computed:#010x}"
                )
            }
            FormatError::InvalidDatatypeClass(c) => write!(f, "unsupported datatype class: {c}"),
            FormatError::InvalidStringPadding(p) => write!(f, "invalid string padding: {p}"),
            FormatError::InvalidCharacterSet(c) => write!(f, "invalid character set: {c}"),
            FormatError::InvalidDataspaceVersion(v) => {
                write!(f, "invalid dataspace version: {v}")
            }
            FormatError::InvalidDataspaceType(t) => write!(f, "invalid dataspace type: {t}"),
            FormatError::InvalidAttributeVersion(v) => {
                write!(f, "invalid attribute message version: {v}")
            }
            FormatError::InvalidLinkVersion(v) => write!(f, "invalid link message version: {v}"),
            FormatError::InvalidLinkType(t) => write!(f, "unsupported link type: {t}"),
            FormatError::UnsupportedLayout(c) => {
                write!(f, "unsupported data layout (class/version {c})")
            }
            FormatError::MissingMessage(what) => write!(f, "missing required message: {what}"),
            FormatError::TypeMismatch { expected } => {
                write!(f, "type mismatch: dataset is not {expected}")
            }
            FormatError::PathNotFound(path) => write!(f, "path not found: {path}"),
            FormatError::DatasetMissingData => write!(f, "dataset has no data"),
            FormatError::DuplicateName(name) => write!(f, "duplicate link name: {name}"),
            FormatError::MessageTooLarge(n) => {
                write!(f, "header message of {n} bytes exceeds 65535")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_name() {
        let e = FormatError::DuplicateName("grp/data".into());
        assert_eq!(e.to_string(), "duplicate link name: grp/data");
    }

    #[test]
    fn display_checksum_is_hex() {
        let e = FormatError::ChecksumMismatch {
            expected: 0xdead_beef,
            computed: 1,
        };
        assert_eq!(
            e.to_string(),
            "checksum mismatch: expected 0xdeadbeef, computed 0x00000001"
        );
    }
}
