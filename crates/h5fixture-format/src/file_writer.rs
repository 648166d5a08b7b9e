//! HDF5 file creation.
//!
//! Produces complete files with a v3 superblock, v2 object headers, hard
//! link messages, contiguous datasets, and compact attributes.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeSet, format, string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use crate::attribute::AttributeMessage;
use crate::dataspace::Dataspace;
use crate::datatype::Datatype;
use crate::error::FormatError;
use crate::link_message::LinkMessage;
use crate::message_type::MessageType;
use crate::object_header_writer::{ObjectHeaderWriter, MSG_FLAG_CONSTANT};
use crate::superblock::{Superblock, UNDEFINED_ADDRESS};
use crate::type_builders::{build_attr_message, upsert_attr, DatasetBuilder, GroupBuilder};

pub use crate::type_builders::AttrValue;

pub(crate) const OFFSET_SIZE: u8 = 8;
pub(crate) const LENGTH_SIZE: u8 = 8;
const SUPERBLOCK_SIZE: usize = 48;

// ---- OH builders ----

fn build_dataset_oh(
    dt: &Datatype,
    ds: &Dataspace,
    data_addr: u64,
    data_size: u64,
    attrs: &[AttributeMessage],
) -> Result<Vec<u8>, FormatError> {
    let mut w = ObjectHeaderWriter::new();
    w.add_message_with_flags(MessageType::Datatype, dt.serialize(), MSG_FLAG_CONSTANT);
    w.add_message(MessageType::Dataspace, ds.serialize(LENGTH_SIZE));
    // version 3; late allocation, fill written only if set, no fill value
    w.add_message_with_flags(MessageType::FillValue, vec![3, 0x0a], MSG_FLAG_CONSTANT);
    let mut dl = Vec::with_capacity(18);
    dl.push(4); // version
    dl.push(1); // class = contiguous
    dl.extend_from_slice(&data_addr.to_le_bytes());
    dl.extend_from_slice(&data_size.to_le_bytes());
    w.add_message(MessageType::DataLayout, dl);
    for attr in attrs {
        w.add_message(MessageType::Attribute, attr.serialize(LENGTH_SIZE));
    }
    w.serialize()
}

fn build_group_oh(links: &[LinkMessage], attrs: &[AttributeMessage]) -> Result<Vec<u8>, FormatError> {
    let mut w = ObjectHeaderWriter::new();
    let mut li = Vec::with_capacity(18);
    li.push(0); // version
    li.push(0); // flags: no creation order
    li.extend_from_slice(&UNDEFINED_ADDRESS.to_le_bytes()); // fractal heap
    li.extend_from_slice(&UNDEFINED_ADDRESS.to_le_bytes()); // name index B-tree
    w.add_message(MessageType::LinkInfo, li);
    w.add_message(MessageType::GroupInfo, vec![0, 0]);
    for link in links {
        w.add_message(MessageType::Link, link.serialize(OFFSET_SIZE));
    }
    for attr in attrs {
        w.add_message(MessageType::Attribute, attr.serialize(LENGTH_SIZE));
    }
    w.serialize()
}

fn build_attrs(attrs: &[(String, AttrValue)]) -> Vec<AttributeMessage> {
    attrs.iter().map(|(n, v)| build_attr_message(n, v)).collect()
}

fn check_unique<'a>(scope: &str, names: impl Iterator<Item = &'a str>) -> Result<(), FormatError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            let path = if scope.is_empty() {
                String::from(name)
            } else {
                format!("{scope}/{name}")
            };
            return Err(FormatError::DuplicateName(path));
        }
    }
    Ok(())
}

struct DsFlat {
    name: String,
    dt: Datatype,
    ds: Dataspace,
    raw: Vec<u8>,
    attrs: Vec<AttributeMessage>,
}

impl DsFlat {
    fn from_builder(db: DatasetBuilder) -> Result<Self, FormatError> {
        let dt = db.datatype.ok_or(FormatError::DatasetMissingData)?;
        let raw = db.data.ok_or(FormatError::DatasetMissingData)?;
        // 1-D: one dimension holding the element count
        let ds = Dataspace::simple(&[(raw.len() / dt.type_size() as usize) as u64]);
        Ok(DsFlat {
            attrs: build_attrs(&db.attrs),
            name: db.name,
            dt,
            ds,
            raw,
        })
    }
}

// ---- FileWriter ----

/// Collects the tree of a file and encodes it with [`FileWriter::finish`].
#[derive(Debug, Default)]
pub struct FileWriter {
    root_datasets: Vec<DatasetBuilder>,
    root_attrs: Vec<(String, AttrValue)>,
    groups: Vec<GroupBuilder>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group directly under the root.
    pub fn create_group(&mut self, name: &str) -> &mut GroupBuilder {
        let idx = self.groups.len();
        self.groups.push(GroupBuilder::new(name));
        &mut self.groups[idx]
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut GroupBuilder> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Create a dataset directly under the root.
    pub fn create_dataset(&mut self, name: &str) -> &mut DatasetBuilder {
        let idx = self.root_datasets.len();
        self.root_datasets.push(DatasetBuilder::new(name));
        &mut self.root_datasets[idx]
    }

    pub fn dataset_mut(&mut self, name: &str) -> Option<&mut DatasetBuilder> {
        self.root_datasets.iter_mut().find(|d| d.name == name)
    }

    /// True if a dataset or group with this name exists under the root.
    pub fn has_root_link(&self, name: &str) -> bool {
        self.root_datasets.iter().any(|d| d.name == name) || self.groups.iter().any(|g| g.name == name)
    }

    /// Set a root attribute. Setting the same name again replaces the value.
    pub fn set_root_attr(&mut self, name: &str, value: AttrValue) {
        upsert_attr(&mut self.root_attrs, name, value);
    }

    /// Encode the file.
    ///
    /// Layout: superblock, root group header, group headers, dataset
    /// headers, then raw data in dataset order. Root links list datasets
    /// before groups, each in creation order.
    pub fn finish(self) -> Result<Vec<u8>, FormatError> {
        struct GrpFlat {
            name: String,
            attrs: Vec<AttributeMessage>,
            ds_indices: Vec<usize>,
        }

        check_unique(
            "",
            self.root_datasets
                .iter()
                .map(|d| d.name.as_str())
                .chain(self.groups.iter().map(|g| g.name.as_str())),
        )?;
        for g in &self.groups {
            check_unique(&g.name, g.datasets.iter().map(|d| d.name.as_str()))?;
        }

        let mut all_ds: Vec<DsFlat> = Vec::new();
        let mut root_ds_indices: Vec<usize> = Vec::new();
        for db in self.root_datasets {
            root_ds_indices.push(all_ds.len());
            all_ds.push(DsFlat::from_builder(db)?);
        }

        let mut groups: Vec<GrpFlat> = Vec::new();
        for g in self.groups {
            let attrs = build_attrs(&g.attrs);
            let mut ds_indices = Vec::new();
            for db in g.datasets {
                ds_indices.push(all_ds.len());
                all_ds.push(DsFlat::from_builder(db)?);
            }
            groups.push(GrpFlat { name: g.name, attrs, ds_indices });
        }

        let root_attrs = build_attrs(&self.root_attrs);

        let root_links = |ds_addrs: &[u64], group_addrs: &[u64]| -> Vec<LinkMessage> {
            let mut links = Vec::new();
            for &i in &root_ds_indices {
                links.push(LinkMessage::hard(&all_ds[i].name, ds_addrs[i]));
            }
            for (gi, g) in groups.iter().enumerate() {
                links.push(LinkMessage::hard(&g.name, group_addrs[gi]));
            }
            links
        };
        let group_links = |g: &GrpFlat, ds_addrs: &[u64]| -> Vec<LinkMessage> {
            g.ds_indices.iter().map(|&i| LinkMessage::hard(&all_ds[i].name, ds_addrs[i])).collect()
        };

        // Pass 1: header sizes with dummy addresses
        let dummy_ds = vec![0u64; all_ds.len()];
        let dummy_groups = vec![0u64; groups.len()];
        let root_oh_size = build_group_oh(&root_links(&dummy_ds, &dummy_groups), &root_attrs)?.len();
        let mut group_oh_sizes = Vec::with_capacity(groups.len());
        for g in &groups {
            group_oh_sizes.push(build_group_oh(&group_links(g, &dummy_ds), &g.attrs)?.len());
        }
        let mut ds_oh_sizes = Vec::with_capacity(all_ds.len());
        for d in &all_ds {
            ds_oh_sizes.push(build_dataset_oh(&d.dt, &d.ds, 0, d.raw.len() as u64, &d.attrs)?.len());
        }

        // Pass 2: real addresses
        let root_group_addr = SUPERBLOCK_SIZE as u64;
        let mut cursor = SUPERBLOCK_SIZE + root_oh_size;
        let group_addrs: Vec<u64> = group_oh_sizes
            .iter()
            .map(|&sz| {
                let addr = cursor as u64;
                cursor += sz;
                addr
            })
            .collect();
        let ds_oh_addrs: Vec<u64> = ds_oh_sizes
            .iter()
            .map(|&sz| {
                let addr = cursor as u64;
                cursor += sz;
                addr
            })
            .collect();
        let data_addrs: Vec<u64> = all_ds
            .iter()
            .map(|d| {
                let addr = cursor as u64;
                cursor += d.raw.len();
                addr
            })
            .collect();
        let eof = cursor;

        let mut buf = Vec::with_capacity(eof);
        buf.extend_from_slice(&Superblock::v3(eof as u64, root_group_addr).serialize());
        buf.extend_from_slice(&build_group_oh(&root_links(&ds_oh_addrs, &group_addrs), &root_attrs)?);
        for g in &groups {
            buf.extend_from_slice(&build_group_oh(&group_links(g, &ds_oh_addrs), &g.attrs)?);
        }
        for (i, d) in all_ds.iter().enumerate() {
            let oh = build_dataset_oh(&d.dt, &d.ds, data_addrs[i], d.raw.len() as u64, &d.attrs)?;
            debug_assert_eq!(oh.len(), ds_oh_sizes[i]);
            buf.extend_from_slice(&oh);
        }
        for d in &all_ds {
            buf.extend_from_slice(&d.raw);
        }

        debug_assert_eq!(buf.len(), eof);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_header::ObjectHeader;
    use crate::signature::{find_signature, HDF5_SIGNATURE};

    fn root_header(bytes: &[u8]) -> ObjectHeader {
        let sb = Superblock::parse(bytes, find_signature(bytes).unwrap()).unwrap();
        assert_eq!(sb.eof_address as usize, bytes.len());
        ObjectHeader::parse(bytes, sb.root_group_address as usize).unwrap()
    }

    #[test]
    fn empty_file() {
        let bytes = FileWriter::new().finish().unwrap();
        assert_eq!(&bytes[..8], &HDF5_SIGNATURE);
        let root = root_header(&bytes);
        assert!(root.find(MessageType::LinkInfo).is_some());
        assert_eq!(root.messages_of(MessageType::Link).count(), 0);
    }

    #[test]
    fn root_links_datasets_then_groups() {
        let mut fw = FileWriter::new();
        fw.create_group("g");
        fw.create_dataset("b").with_i64_data(&[1]);
        fw.create_dataset("a").with_i64_data(&[2]);
        let bytes = fw.finish().unwrap();
        let names: Vec<String> = root_header(&bytes)
            .messages_of(MessageType::Link)
            .map(|m| LinkMessage::parse(&m.data, OFFSET_SIZE).unwrap().name)
            .collect();
        assert_eq!(names, vec!["b", "a", "g"]);
    }

    #[test]
    fn raw_data_at_end_of_file() {
        let mut fw = FileWriter::new();
        fw.create_dataset("d").with_f64_data(&[1.5, 2.5]);
        let bytes = fw.finish().unwrap();
        let tail = &bytes[bytes.len() - 16..];
        assert_eq!(&tail[..8], &1.5f64.to_le_bytes());
        assert_eq!(&tail[8..], &2.5f64.to_le_bytes());
    }

    #[test]
    fn duplicate_root_name() {
        let mut fw = FileWriter::new();
        fw.create_dataset("x").with_i64_data(&[1]);
        fw.create_group("x");
        assert_eq!(fw.finish(), Err(FormatError::DuplicateName("x".into())));
    }

    #[test]
    fn duplicate_group_member() {
        let mut fw = FileWriter::new();
        let g = fw.create_group("grp");
        g.create_dataset("data").with_i64_data(&[1]);
        g.create_dataset("data").with_i64_data(&[2]);
        assert_eq!(fw.finish(), Err(FormatError::DuplicateName("grp/data".into())));
    }

    #[test]
    fn missing_data() {
        let mut fw = FileWriter::new();
        fw.create_dataset("empty");
        assert_eq!(fw.finish(), Err(FormatError::DatasetMissingData));
    }

    #[test]
    fn dataspace_is_element_count() {
        let mut fw = FileWriter::new();
        fw.create_dataset("three").with_i64_data(&[1, 2, 3]);
        fw.create_dataset("none").with_f64_data(&[]);
        let view = crate::readback::FileView::parse(&fw.finish().unwrap()).unwrap();
        assert_eq!(view.dataset("three").unwrap().shape, vec![3]);
        assert_eq!(view.dataset("none").unwrap().shape, vec![0]);
    }

    #[test]
    fn deterministic_output() {
        let build = || {
            let mut fw = FileWriter::new();
            fw.set_root_attr("title", AttrValue::String("t".into()));
            fw.create_group("g").create_dataset("d").with_i64_data(&[0, 1, 2]);
            fw.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn root_attr_last_write_wins() {
        let mut fw = FileWriter::new();
        fw.set_root_attr("a", AttrValue::I64(1));
        fw.set_root_attr("a", AttrValue::I64(2));
        let bytes = fw.finish().unwrap();
        let root = root_header(&bytes);
        let attrs: Vec<AttributeMessage> = root
            .messages_of(MessageType::Attribute)
            .map(|m| AttributeMessage::parse(&m.data, LENGTH_SIZE).unwrap())
            .collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value().unwrap(), AttrValue::I64(2));
    }

    #[test]
    fn has_root_link_sees_groups_and_datasets() {
        let mut fw = FileWriter::new();
        fw.create_group("g");
        fw.create_dataset("d").with_i64_data(&[]);
        assert!(fw.has_root_link("g"));
        assert!(fw.has_root_link("d"));
        assert!(!fw.has_root_link("other"));
        assert!(fw.group_mut("g").is_some());
        assert!(fw.dataset_mut("d").is_some());
    }
}
