//! HDF5 Attribute message (message type 0x000C).
//!
//! The writer always stores attributes compactly, one message per attribute
//! in the owning object header.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::dataspace::Dataspace;
use crate::datatype::{CharacterSet, Datatype};
#[cfg(any(test, feature = "readback"))]
use crate::error::FormatError;
#[cfg(any(test, feature = "readback"))]
use crate::type_builders::AttrValue;

/// An attribute message: name, type, shape, and raw value bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMessage {
    /// Attribute name.
    pub name: String,
    /// Attribute datatype.
    pub datatype: Datatype,
    /// Attribute dataspace.
    pub dataspace: Dataspace,
    /// Raw attribute value data, little endian.
    pub raw_data: Vec<u8>,
}

impl AttributeMessage {
    /// Serialize to HDF5 message bytes (attribute message version 3).
    ///
    /// Version 3 carries the name's character set, so UTF-8 names survive.
    pub fn serialize(&self, length_size: u8) -> Vec<u8> {
        let mut name_bytes = self.name.as_bytes().to_vec();
        name_bytes.push(0);
        let dt_bytes = self.datatype.serialize();
        let ds_bytes = self.dataspace.serialize(length_size);

        let mut buf = Vec::with_capacity(
            9 + name_bytes.len() + dt_bytes.len() + ds_bytes.len() + self.raw_data.len(),
        );
        buf.push(3);
        buf.push(0); // flags: datatype and dataspace not shared
        buf.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(dt_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(ds_bytes.len() as u16).to_le_bytes());
        buf.push(CharacterSet::for_name(&self.name).code());
        buf.extend_from_slice(&name_bytes);
        buf.extend_from_slice(&dt_bytes);
        buf.extend_from_slice(&ds_bytes);
        buf.extend_from_slice(&self.raw_data);
        buf
    }
}

#[cfg(any(test, feature = "readback"))]
fn ensure_len(data: &[u8], offset: usize, needed: usize) -> Result<(), FormatError> {
    if offset + needed > data.len() {
        Err(FormatError::UnexpectedEof {
            expected: offset + needed,
            available: data.len(),
        })
    } else {
        Ok(())
    }
}

#[cfg(any(test, feature = "readback"))]
fn extract_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(any(test, feature = "readback"))]
impl AttributeMessage {
    /// Parse a version 2 or 3 attribute message.
    pub fn parse(data: &[u8], length_size: u8) -> Result<AttributeMessage, FormatError> {
        ensure_len(data, 0, 8)?;
        let version = data[0];
        let header_len = match version {
            2 => 8,
            3 => 9,
            _ => return Err(FormatError::InvalidAttributeVersion(version)),
        };
        ensure_len(data, 0, header_len)?;
        let name_size = u16::from_le_bytes([data[2], data[3]]) as usize;
        let datatype_size = u16::from_le_bytes([data[4], data[5]]) as usize;
        let dataspace_size = u16::from_le_bytes([data[6], data[7]]) as usize;

        let mut pos = header_len;
        ensure_len(data, pos, name_size)?;
        let name = extract_name(&data[pos..pos + name_size]);
        pos += name_size;

        ensure_len(data, pos, datatype_size)?;
        let (datatype, _) = Datatype::parse(&data[pos..pos + datatype_size])?;
        pos += datatype_size;

        ensure_len(data, pos, dataspace_size)?;
        let dataspace = Dataspace::parse(&data[pos..pos + dataspace_size], length_size)?;
        pos += dataspace_size;

        let value_len = dataspace.num_elements() as usize * datatype.type_size() as usize;
        ensure_len(data, pos, value_len)?;
        let raw_data = data[pos..pos + value_len].to_vec();

        Ok(AttributeMessage {
            name,
            datatype,
            dataspace,
            raw_data,
        })
    }

    /// Decode the stored scalar back into an [`AttrValue`].
    pub fn value(&self) -> Result<AttrValue, FormatError> {
        let raw = self.raw_data.as_slice();
        match (&self.datatype, raw.len()) {
            (Datatype::FixedPoint { size: 4, signed: true, .. }, 4) => {
                Ok(AttrValue::I32(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])))
            }
            (Datatype::FixedPoint { size: 8, signed: true, .. }, 8) => {
                let mut b = [0u8; 8];
                b.copy_from_slice(raw);
                Ok(AttrValue::I64(i64::from_le_bytes(b)))
            }
            (Datatype::FloatingPoint { size: 4, .. }, 4) => {
                Ok(AttrValue::F32(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])))
            }
            (Datatype::FloatingPoint { size: 8, .. }, 8) => {
                let mut b = [0u8; 8];
                b.copy_from_slice(raw);
                Ok(AttrValue::F64(f64::from_le_bytes(b)))
            }
            (Datatype::String { charset, .. }, _) => {
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                let bytes = raw[..end].to_vec();
                match charset {
                    CharacterSet::Utf8 => Ok(AttrValue::String(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    )),
                    CharacterSet::Ascii => Ok(AttrValue::Bytes(bytes)),
                }
            }
            _ => Err(FormatError::TypeMismatch {
                expected: "scalar i32, i64, f32, f64 or string",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_builders::build_attr_message;

    #[test]
    fn v3_header_layout() {
        let msg = build_attr_message("test", &AttrValue::I64(7));
        let bytes = msg.serialize(8);
        assert_eq!(bytes[0], 3);
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), 5); // "test\0"
        assert_eq!(bytes[8], 0); // ASCII name
        assert_eq!(&bytes[9..14], b"test\0");
        assert_eq!(&bytes[bytes.len() - 8..], &7i64.to_le_bytes());
    }

    #[test]
    fn numeric_values_roundtrip() {
        for value in [
            AttrValue::I32(12345),
            AttrValue::I64(12345),
            AttrValue::F32(1.2345),
            AttrValue::F64(1.2345),
        ] {
            let bytes = build_attr_message("n", &value).serialize(8);
            let parsed = AttributeMessage::parse(&bytes, 8).unwrap();
            assert_eq!(parsed.value().unwrap(), value);
        }
    }

    #[test]
    fn text_and_bytes_keep_their_kind() {
        let text = AttrValue::String("this_is_a_test_attr".into());
        let parsed = AttributeMessage::parse(&build_attr_message("a", &text).serialize(8), 8).unwrap();
        assert_eq!(parsed.value().unwrap(), text);

        let raw = AttrValue::Bytes(b"dataset_attr".to_vec());
        let parsed = AttributeMessage::parse(&build_attr_message("b", &raw).serialize(8), 8).unwrap();
        assert_eq!(parsed.value().unwrap(), raw);
    }

    #[test]
    fn utf8_name_sets_encoding_byte() {
        let bytes = build_attr_message("température", &AttrValue::F64(21.5)).serialize(8);
        assert_eq!(bytes[8], 1);
        let parsed = AttributeMessage::parse(&bytes, 8).unwrap();
        assert_eq!(parsed.name, "température");
    }

    #[test]
    fn unknown_version_rejected() {
        let mut bytes = build_attr_message("x", &AttrValue::I32(1)).serialize(8);
        bytes[0] = 9;
        assert_eq!(
            AttributeMessage::parse(&bytes, 8),
            Err(FormatError::InvalidAttributeVersion(9))
        );
    }

    #[test]
    fn truncated_value() {
        let bytes = build_attr_message("x", &AttrValue::I64(1)).serialize(8);
        assert!(matches!(
            AttributeMessage::parse(&bytes[..bytes.len() - 3], 8),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }
}
