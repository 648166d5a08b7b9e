//! Decode files written by [`FileWriter`](crate::FileWriter) back into a
//! tree, so tests can assert on structure and values.
//!
//! Only what the writer emits is understood: v2/v3 superblocks, single-chunk
//! v2 object headers, compact links and attributes, contiguous layouts.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use crate::attribute::AttributeMessage;
use crate::dataspace::Dataspace;
use crate::datatype::Datatype;
use crate::error::FormatError;
use crate::link_message::LinkMessage;
use crate::message_type::MessageType;
use crate::object_header::ObjectHeader;
use crate::signature::find_signature;
use crate::superblock::Superblock;
use crate::type_builders::AttrValue;

/// A decoded dataset: type, shape, attributes, and its raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView {
    pub dtype: Datatype,
    pub shape: Vec<u64>,
    pub attrs: BTreeMap<String, AttrValue>,
    pub raw: Vec<u8>,
}

impl DatasetView {
    pub fn len(&self) -> usize {
        self.shape.iter().product::<u64>() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read_f64(&self) -> Result<Vec<f64>, FormatError> {
        match self.dtype {
            Datatype::FloatingPoint { size: 8, .. } => Ok(self
                .raw
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect()),
            _ => Err(FormatError::TypeMismatch { expected: "f64" }),
        }
    }

    pub fn read_i64(&self) -> Result<Vec<i64>, FormatError> {
        match self.dtype {
            Datatype::FixedPoint { size: 8, signed: true, .. } => Ok(self
                .raw
                .chunks_exact(8)
                .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect()),
            _ => Err(FormatError::TypeMismatch { expected: "i64" }),
        }
    }
}

/// A decoded group (or the root).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupView {
    pub attrs: BTreeMap<String, AttrValue>,
    pub datasets: BTreeMap<String, DatasetView>,
    pub groups: BTreeMap<String, GroupView>,
}

/// A decoded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileView {
    pub superblock: Superblock,
    pub root: GroupView,
}

impl FileView {
    /// Decode a complete file image.
    pub fn parse(data: &[u8]) -> Result<FileView, FormatError> {
        let sig = find_signature(data)?;
        let superblock = Superblock::parse(data, sig)?;
        let mut reader = Reader { data, superblock: &superblock, ancestors: Vec::new() };
        let root = reader.group_at(superblock.root_group_address)?;
        Ok(FileView { superblock, root })
    }

    /// Read and decode a file from disk.
    #[cfg(feature = "std")]
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<FileView> {
        let data = std::fs::read(path)?;
        FileView::parse(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Look up a group by `/`-separated path. An empty path is the root.
    pub fn group(&self, path: &str) -> Result<&GroupView, FormatError> {
        let mut g = &self.root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            g = g
                .groups
                .get(part)
                .ok_or_else(|| FormatError::PathNotFound(path.into()))?;
        }
        Ok(g)
    }

    /// Look up a dataset by `/`-separated path, e.g. `"test_group/tg_dataset"`.
    pub fn dataset(&self, path: &str) -> Result<&DatasetView, FormatError> {
        let trimmed = path.trim_matches('/');
        let (parent, name) = match trimmed.rsplit_once('/') {
            Some((p, n)) => (p, n),
            None => ("", trimmed),
        };
        self.group(parent)
            .ok()
            .and_then(|g| g.datasets.get(name))
            .ok_or_else(|| FormatError::PathNotFound(path.into()))
    }
}

struct Reader<'a> {
    data: &'a [u8],
    superblock: &'a Superblock,
    ancestors: Vec<u64>,
}

impl Reader<'_> {
    fn header(&self, addr: u64) -> Result<ObjectHeader, FormatError> {
        ObjectHeader::parse(self.data, addr as usize)
    }

    fn attrs(&self, hdr: &ObjectHeader) -> Result<BTreeMap<String, AttrValue>, FormatError> {
        let mut out = BTreeMap::new();
        for msg in hdr.messages_of(MessageType::Attribute) {
            let attr = AttributeMessage::parse(&msg.data, self.superblock.length_size)?;
            out.insert(attr.name.clone(), attr.value()?);
        }
        Ok(out)
    }

    fn group_at(&mut self, addr: u64) -> Result<GroupView, FormatError> {
        let hdr = self.header(addr)?;
        if hdr.find(MessageType::LinkInfo).is_none() {
            return Err(FormatError::MissingMessage("link info"));
        }
        self.ancestors.push(addr);
        let mut view = GroupView { attrs: self.attrs(&hdr)?, ..GroupView::default() };
        for msg in hdr.messages_of(MessageType::Link) {
            let link = LinkMessage::parse(&msg.data, self.superblock.offset_size)?;
            let target = link.object_header_address;
            if self.ancestors.contains(&target) {
                // hard link back up the tree
                continue;
            }
            let child = self.header(target)?;
            if child.find(MessageType::Datatype).is_some() {
                view.datasets.insert(link.name, self.dataset(&child)?);
            } else {
                view.groups.insert(link.name, self.group_at(target)?);
            }
        }
        self.ancestors.pop();
        Ok(view)
    }

    fn dataset(&self, hdr: &ObjectHeader) -> Result<DatasetView, FormatError> {
        let dt_msg = hdr.find(MessageType::Datatype).ok_or(FormatError::MissingMessage("datatype"))?;
        let ds_msg = hdr.find(MessageType::Dataspace).ok_or(FormatError::MissingMessage("dataspace"))?;
        let dl_msg = hdr.find(MessageType::DataLayout).ok_or(FormatError::MissingMessage("data layout"))?;

        let (dtype, _) = Datatype::parse(&dt_msg.data)?;
        let dspace = Dataspace::parse(&ds_msg.data, self.superblock.length_size)?;
        let (addr, size) = contiguous_layout(&dl_msg.data)?;

        let start = addr as usize;
        let end = start + size as usize;
        if size > 0 && end > self.data.len() {
            return Err(FormatError::UnexpectedEof { expected: end, available: self.data.len() });
        }
        let raw = if size == 0 { Vec::new() } else { self.data[start..end].to_vec() };

        Ok(DatasetView { dtype, shape: dspace.dimensions, attrs: self.attrs(hdr)?, raw })
    }
}

/// Decode a version 3/4 contiguous layout into `(address, size)`.
fn contiguous_layout(data: &[u8]) -> Result<(u64, u64), FormatError> {
    if data.len() < 2 {
        return Err(FormatError::UnexpectedEof { expected: 2, available: data.len() });
    }
    if !matches!(data[0], 3 | 4) {
        return Err(FormatError::UnsupportedLayout(data[0]));
    }
    if data[1] != 1 {
        return Err(FormatError::UnsupportedLayout(data[1]));
    }
    if data.len() < 18 {
        return Err(FormatError::UnexpectedEof { expected: 18, available: data.len() });
    }
    let mut addr = [0u8; 8];
    let mut size = [0u8; 8];
    addr.copy_from_slice(&data[2..10]);
    size.copy_from_slice(&data[10..18]);
    Ok((u64::from_le_bytes(addr), u64::from_le_bytes(size)))
}
