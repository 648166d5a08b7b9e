//! The fixture writer: open a container, populate it, close it.
//!
//! The output file is created (and truncated) when the writer opens, the
//! tree is kept in memory, and the encoded image is written on
//! [`FixtureWriter::close`]. Dropping an unclosed writer closes it too.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use h5fixture_format::file_writer::FileWriter;
use h5fixture_format::AttrValue;
use log::{debug, error, info, warn};

use crate::error::{Error, Result};

/// Output file name used by the binary.
pub const DEFAULT_OUTPUT: &str = "test.hdf5";

/// Element data for a one-dimensional dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetData {
    /// 64-bit IEEE floats.
    F64(Vec<f64>),
    /// Signed 64-bit integers.
    I64(Vec<i64>),
}

impl DatasetData {
    pub fn len(&self) -> usize {
        match self {
            DatasetData::F64(v) => v.len(),
            DatasetData::I64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_name(&self) -> &'static str {
        match self {
            DatasetData::F64(_) => "f64",
            DatasetData::I64(_) => "i64",
        }
    }
}

impl From<Vec<f64>> for DatasetData {
    fn from(v: Vec<f64>) -> Self {
        DatasetData::F64(v)
    }
}

impl From<Vec<i64>> for DatasetData {
    fn from(v: Vec<i64>) -> Self {
        DatasetData::I64(v)
    }
}

/// Split `name` or `group/name` into its parts. A single leading `/` is
/// accepted and means the root.
fn split_path(path: &str) -> Result<(Option<&str>, &str)> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.iter().any(|p| p.is_empty() || *p == ".") {
        return Err(Error::InvalidPath(path.to_string()));
    }
    match parts.as_slice() {
        [name] => Ok((None, *name)),
        [group, name] => Ok((Some(*group), *name)),
        _ => Err(Error::InvalidPath(path.to_string())),
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name.contains('/') {
        return Err(Error::InvalidPath(name.to_string()));
    }
    Ok(())
}

/// Builds one HDF5 container and writes it to disk.
///
/// ```no_run
/// use h5fixture::{DatasetData, FixtureWriter};
///
/// let mut w = FixtureWriter::create("test.hdf5")?;
/// w.set_root_attr("test_attr1", "this_is_a_test_attr")?;
/// w.create_dataset("test_dataset", DatasetData::I64((0..100).collect()))?;
/// w.close()?;
/// # Ok::<(), h5fixture::Error>(())
/// ```
#[derive(Debug)]
pub struct FixtureWriter {
    path: PathBuf,
    file: Option<File>,
    tree: FileWriter,
}

impl FixtureWriter {
    /// Create or truncate the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!("opened {}", path.display());
        Ok(Self {
            path,
            file: Some(file),
            tree: FileWriter::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set an attribute on the root. The last value written for a name wins.
    pub fn set_root_attr(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        check_name(name)?;
        let value = value.into();
        debug!("root attr {name} = {value:?}");
        self.tree.set_root_attr(name, value);
        Ok(())
    }

    /// Create a dataset at `name` (root) or `group/name`.
    pub fn create_dataset(&mut self, path: &str, data: impl Into<DatasetData>) -> Result<()> {
        let data = data.into();
        let (group, name) = split_path(path)?;
        let builder = match group {
            None => {
                if self.tree.has_root_link(name) {
                    return Err(Error::DuplicateName(path.to_string()));
                }
                self.tree.create_dataset(name)
            }
            Some(group) => {
                let g = self
                    .tree
                    .group_mut(group)
                    .ok_or_else(|| Error::GroupNotFound(group.to_string()))?;
                if g.dataset_mut(name).is_some() {
                    return Err(Error::DuplicateName(path.to_string()));
                }
                g.create_dataset(name)
            }
        };
        debug!("dataset {path}: {} x {}", data.len(), data.type_name());
        match &data {
            DatasetData::F64(v) => builder.with_f64_data(v),
            DatasetData::I64(v) => builder.with_i64_data(v),
        };
        Ok(())
    }

    /// Attach an attribute to an existing dataset.
    pub fn set_dataset_attr(
        &mut self,
        path: &str,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        check_name(name)?;
        let (group, ds_name) = split_path(path)?;
        let dataset = match group {
            None => self.tree.dataset_mut(ds_name),
            Some(group) => self.tree.group_mut(group).and_then(|g| g.dataset_mut(ds_name)),
        }
        .ok_or_else(|| Error::DatasetNotFound(path.to_string()))?;
        let value = value.into();
        debug!("dataset attr {path}@{name} = {value:?}");
        dataset.set_attr(name, value);
        Ok(())
    }

    /// Create a group directly under the root.
    pub fn create_group(&mut self, name: &str) -> Result<()> {
        check_name(name)?;
        if self.tree.has_root_link(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        debug!("group {name}");
        self.tree.create_group(name);
        Ok(())
    }

    /// Attach an attribute to an existing group.
    pub fn set_group_attr(&mut self, group: &str, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        check_name(name)?;
        let g = self
            .tree
            .group_mut(group)
            .ok_or_else(|| Error::GroupNotFound(group.to_string()))?;
        let value = value.into();
        debug!("group attr {group}@{name} = {value:?}");
        g.set_attr(name, value);
        Ok(())
    }

    /// Encode the tree, write it, and sync the file.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        let bytes = std::mem::take(&mut self.tree).finish()?;
        file.write_all(&bytes)?;
        file.flush()?;
        file.sync_all()?;
        info!("wrote {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }
}

impl Drop for FixtureWriter {
    fn drop(&mut self) {
        if self.file.is_none() {
            return;
        }
        warn!("{} dropped without close; closing now", self.path.display());
        if let Err(e) = self.finish() {
            error!("failed to close {}: {e}", self.path.display());
        }
    }
}
