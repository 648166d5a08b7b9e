//! Pure-Rust HDF5 write pipeline.
//!
//! Encodes a small tree of groups, contiguous numeric datasets, and scalar
//! attributes into a complete HDF5 file image: v3 superblock, v2 object
//! headers, compact link storage, and compact attribute storage.
//! It supports `no_std` environments with the `alloc` crate.
//!
//! ```
//! use h5fixture_format::file_writer::{AttrValue, FileWriter};
//!
//! let mut fw = FileWriter::new();
//! fw.set_root_attr("title", AttrValue::String("example".into()));
//! fw.create_dataset("values").with_f64_data(&[1.0, 2.0, 3.0]);
//! let bytes = fw.finish().unwrap();
//! assert_eq!(&bytes[..8], &h5fixture_format::signature::HDF5_SIGNATURE);
//! ```
//!
//! With the `readback` feature, [`readback::FileView`] decodes the files this
//! crate produces so tests can assert on their structure.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod attribute;
pub mod checksum;
pub mod dataspace;
pub mod datatype;
pub mod error;
pub mod file_writer;
pub mod link_message;
pub mod message_type;
pub mod object_header_writer;
pub mod signature;
pub mod superblock;
pub mod type_builders;

#[cfg(any(test, feature = "readback"))]
pub mod object_header;
#[cfg(any(test, feature = "readback"))]
pub mod readback;

pub use error::FormatError;
pub use file_writer::FileWriter;
pub use type_builders::AttrValue;
