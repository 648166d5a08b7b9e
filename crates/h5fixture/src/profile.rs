//! Named fixture profiles: fixed write sequences with a default file name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use h5fixture_format::AttrValue;
use log::info;

use crate::error::{Error, Result};
use crate::fixture::{DatasetData, FixtureWriter};

/// One hard-coded fixture. Profiles are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FixtureProfile {
    /// `dataset`: f64 `0..100`.
    SingleDataset,
    /// Root attr `test_attr1` and i64 `test_dataset`.
    RootAttribute,
    /// [`FixtureProfile::RootAttribute`] plus `test_dataset2`.
    TwoDatasets,
    /// [`FixtureProfile::TwoDatasets`] plus `test_group/tg_dataset` and the
    /// `test` attribute on `test_dataset`.
    #[default]
    Nested,
    /// Numeric scalar root attributes of each width, in `attributes.hdf5`.
    ScalarAttributes,
}

impl FixtureProfile {
    pub const ALL: [FixtureProfile; 5] = [
        FixtureProfile::SingleDataset,
        FixtureProfile::RootAttribute,
        FixtureProfile::TwoDatasets,
        FixtureProfile::Nested,
        FixtureProfile::ScalarAttributes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FixtureProfile::SingleDataset => "single_dataset",
            FixtureProfile::RootAttribute => "root_attribute",
            FixtureProfile::TwoDatasets => "two_datasets",
            FixtureProfile::Nested => "nested",
            FixtureProfile::ScalarAttributes => "scalar_attributes",
        }
    }

    /// File name the profile is written to by default.
    pub fn file_name(self) -> &'static str {
        match self {
            FixtureProfile::ScalarAttributes => "attributes.hdf5",
            _ => "test.hdf5",
        }
    }

    /// Run this profile's write sequence against an open writer.
    pub fn populate(self, w: &mut FixtureWriter) -> Result<()> {
        match self {
            FixtureProfile::SingleDataset => {
                w.create_dataset("dataset", DatasetData::F64((0..100).map(f64::from).collect()))?;
            }
            FixtureProfile::RootAttribute => {
                w.set_root_attr("test_attr1", "this_is_a_test_attr")?;
                w.create_dataset("test_dataset", DatasetData::I64((0..100).collect()))?;
            }
            FixtureProfile::TwoDatasets => {
                FixtureProfile::RootAttribute.populate(w)?;
                w.create_dataset("test_dataset2", DatasetData::I64((2..100).collect()))?;
            }
            FixtureProfile::Nested => {
                FixtureProfile::TwoDatasets.populate(w)?;
                w.create_group("test_group")?;
                w.create_dataset("test_group/tg_dataset", DatasetData::I64((0..10).collect()))?;
                w.set_dataset_attr("test_dataset", "test", AttrValue::Bytes(b"dataset_attr".to_vec()))?;
            }
            FixtureProfile::ScalarAttributes => {
                w.set_root_attr("i32_attribute", 12345i32)?;
                w.set_root_attr("i64_attribute", 12345i64)?;
                w.set_root_attr("f32_attribute", 1.2345f32)?;
                w.set_root_attr("f64_attribute", 1.2345f64)?;
            }
        }
        Ok(())
    }

    /// Write the profile to `path`, replacing any existing file.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<()> {
        let mut w = FixtureWriter::create(path)?;
        info!("writing profile {self} to {}", w.path().display());
        self.populate(&mut w)?;
        w.close()
    }

    /// Write the profile into `dir` under its default file name.
    pub fn write_in(self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        self.write_to(&path)?;
        Ok(path)
    }
}

impl fmt::Display for FixtureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixtureProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FixtureProfile::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownProfile(s.to_string()))
    }
}
