//! Builder types for datatypes, attributes, datasets, and groups.

#[cfg(not(feature = "std"))]
use alloc::{string::String, string::ToString, vec::Vec};

use crate::attribute::AttributeMessage;
use crate::dataspace::Dataspace;
use crate::datatype::{CharacterSet, Datatype, DatatypeByteOrder, StringPadding};

// ---- Datatype constructors ----

pub fn make_f64_type() -> Datatype {
    Datatype::FloatingPoint {
        size: 8,
        byte_order: DatatypeByteOrder::LittleEndian,
        bit_offset: 0,
        bit_precision: 64,
        exponent_location: 52,
        exponent_size: 11,
        mantissa_location: 0,
        mantissa_size: 52,
        exponent_bias: 1023,
    }
}

pub fn make_f32_type() -> Datatype {
    Datatype::FloatingPoint {
        size: 4,
        byte_order: DatatypeByteOrder::LittleEndian,
        bit_offset: 0,
        bit_precision: 32,
        exponent_location: 23,
        exponent_size: 8,
        mantissa_location: 0,
        mantissa_size: 23,
        exponent_bias: 127,
    }
}

pub fn make_i32_type() -> Datatype {
    Datatype::FixedPoint {
        size: 4,
        byte_order: DatatypeByteOrder::LittleEndian,
        signed: true,
        bit_offset: 0,
        bit_precision: 32,
    }
}

pub fn make_i64_type() -> Datatype {
    Datatype::FixedPoint {
        size: 8,
        byte_order: DatatypeByteOrder::LittleEndian,
        signed: true,
        bit_offset: 0,
        bit_precision: 64,
    }
}

/// Fixed-length, null-padded string type. Zero-length strings are stored
/// with one padding byte since HDF5 rejects a zero-sized type.
fn make_fixed_string(bytes: &[u8], charset: CharacterSet) -> (Datatype, Vec<u8>) {
    let size = bytes.len().max(1);
    let mut raw = bytes.to_vec();
    raw.resize(size, 0);
    let dt = Datatype::String {
        size: size as u32,
        padding: StringPadding::NullPad,
        charset,
    };
    (dt, raw)
}

// ---- Attribute values ----

/// Scalar attribute values accepted by the write API.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Text, stored as a UTF-8 fixed-length string.
    String(String),
    /// Raw bytes, stored as an ASCII fixed-length string.
    Bytes(Vec<u8>),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::I32(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::I64(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::F32(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::F64(v)
    }
}

// ---- Attribute helpers ----

pub(crate) fn build_attr_message(name: &str, value: &AttrValue) -> AttributeMessage {
    let (datatype, raw_data) = match value {
        AttrValue::I32(v) => (make_i32_type(), v.to_le_bytes().to_vec()),
        AttrValue::I64(v) => (make_i64_type(), v.to_le_bytes().to_vec()),
        AttrValue::F32(v) => (make_f32_type(), v.to_le_bytes().to_vec()),
        AttrValue::F64(v) => (make_f64_type(), v.to_le_bytes().to_vec()),
        AttrValue::String(s) => make_fixed_string(s.as_bytes(), CharacterSet::Utf8),
        AttrValue::Bytes(b) => make_fixed_string(b, CharacterSet::Ascii),
    };
    AttributeMessage {
        name: name.to_string(),
        datatype,
        dataspace: Dataspace::scalar(),
        raw_data,
    }
}

/// Insert or replace an attribute. A replaced attribute keeps its position.
pub(crate) fn upsert_attr(attrs: &mut Vec<(String, AttrValue)>, name: &str, value: AttrValue) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attrs.push((name.to_string(), value)),
    }
}

// ---- Dataset builder ----

/// Builder for a contiguous one-dimensional dataset.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    pub(crate) name: String,
    pub(crate) datatype: Option<Datatype>,
    pub(crate) data: Option<Vec<u8>>,
    pub(crate) attrs: Vec<(String, AttrValue)>,
}

impl DatasetBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            datatype: None,
            data: None,
            attrs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_f64_data(&mut self, data: &[f64]) -> &mut Self {
        let mut b = Vec::with_capacity(data.len() * 8);
        for &v in data {
            b.extend_from_slice(&v.to_le_bytes());
        }
        self.set_raw(make_f64_type(), b)
    }

    pub fn with_i64_data(&mut self, data: &[i64]) -> &mut Self {
        let mut b = Vec::with_capacity(data.len() * 8);
        for &v in data {
            b.extend_from_slice(&v.to_le_bytes());
        }
        self.set_raw(make_i64_type(), b)
    }

    fn set_raw(&mut self, datatype: Datatype, raw: Vec<u8>) -> &mut Self {
        self.datatype = Some(datatype);
        self.data = Some(raw);
        self
    }

    /// Set an attribute; setting the same name again replaces the value.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> &mut Self {
        upsert_attr(&mut self.attrs, name, value);
        self
    }
}

// ---- Group builder ----

/// Builder for a group directly under the root.
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    pub(crate) name: String,
    pub(crate) datasets: Vec<DatasetBuilder>,
    pub(crate) attrs: Vec<(String, AttrValue)>,
}

impl GroupBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            datasets: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_dataset(&mut self, name: &str) -> &mut DatasetBuilder {
        let idx = self.datasets.len();
        self.datasets.push(DatasetBuilder::new(name));
        &mut self.datasets[idx]
    }

    pub fn dataset_mut(&mut self, name: &str) -> Option<&mut DatasetBuilder> {
        self.datasets.iter_mut().find(|d| d.name == name)
    }

    pub fn set_attr(&mut self, name: &str, value: AttrValue) {
        upsert_attr(&mut self.attrs, name, value);
    }
}
