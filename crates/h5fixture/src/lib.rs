//! Fixture generator for HDF5 readers.
//!
//! Writes small, fully deterministic HDF5 containers: root attributes,
//! one-dimensional numeric datasets, an optional group holding its own
//! datasets, and attributes on datasets. Each hard-coded write sequence is a
//! [`FixtureProfile`].
//!
//! ```no_run
//! use h5fixture::FixtureProfile;
//!
//! let path = FixtureProfile::Nested.write_in(".")?;
//! assert!(path.ends_with("test.hdf5"));
//! # Ok::<(), h5fixture::Error>(())
//! ```

pub mod error;
pub mod fixture;
pub mod profile;

pub use error::{Error, Result};
pub use fixture::{DatasetData, FixtureWriter, DEFAULT_OUTPUT};
pub use h5fixture_format::AttrValue;
pub use profile::FixtureProfile;
