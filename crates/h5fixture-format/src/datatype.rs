//! HDF5 Datatype message (message type 0x0003).
//!
//! Covers the three classes fixture files use: fixed-point integers,
//! IEEE floating point, and fixed-length strings.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

#[cfg(any(test, feature = "readback"))]
use byteorder::{ByteOrder, LittleEndian};

#[cfg(any(test, feature = "readback"))]
use crate::error::FormatError;

/// Byte order of numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeByteOrder {
    LittleEndian,
    BigEndian,
}

/// String padding type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPadding {
    NullTerminate,
    NullPad,
    SpacePad,
}

/// Character set encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    Ascii,
    Utf8,
}

impl CharacterSet {
    pub(crate) fn code(self) -> u8 {
        match self {
            CharacterSet::Ascii => 0,
            CharacterSet::Utf8 => 1,
        }
    }

    /// ASCII when every byte is 7-bit, UTF-8 otherwise.
    pub fn for_name(name: &str) -> Self {
        if name.is_ascii() {
            CharacterSet::Ascii
        } else {
            CharacterSet::Utf8
        }
    }
}

#[cfg(any(test, feature = "readback"))]
pub(crate) fn parse_charset(val: u8) -> Result<CharacterSet, FormatError> {
    match val {
        0 => Ok(CharacterSet::Ascii),
        1 => Ok(CharacterSet::Utf8),
        _ => Err(FormatError::InvalidCharacterSet(val)),
    }
}

/// An HDF5 datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datatype {
    /// Class 0: Fixed-point (integer) types.
    FixedPoint {
        size: u32,
        byte_order: DatatypeByteOrder,
        signed: bool,
        bit_offset: u16,
        bit_precision: u16,
    },
    /// Class 1: Floating-point types.
    FloatingPoint {
        size: u32,
        byte_order: DatatypeByteOrder,
        bit_offset: u16,
        bit_precision: u16,
        exponent_location: u8,
        exponent_size: u8,
        mantissa_location: u8,
        mantissa_size: u8,
        exponent_bias: u32,
    },
    /// Class 3: Fixed-length string.
    String {
        size: u32,
        padding: StringPadding,
        charset: CharacterSet,
    },
}

impl Datatype {
    /// Serialize to HDF5 message bytes (datatype version 1).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Datatype::FixedPoint { size, byte_order, signed, bit_offset, bit_precision } => {
                let mut bf0 = 0u8;
                if *byte_order == DatatypeByteOrder::BigEndian { bf0 |= 0x01; }
                if *signed { bf0 |= 0x08; }
                let mut buf = Self::build_header(0, [bf0, 0, 0], *size);
                buf.extend_from_slice(&bit_offset.to_le_bytes());
                buf.extend_from_slice(&bit_precision.to_le_bytes());
                buf
            }
            Datatype::FloatingPoint { size, byte_order, bit_offset, bit_precision,
                exponent_location, exponent_size, mantissa_location, mantissa_size, exponent_bias } => {
                // bits 4-5: mantissa normalization 2 (implied MSB, IEEE 754)
                let mut bf0 = 0x20u8;
                if *byte_order == DatatypeByteOrder::BigEndian { bf0 |= 0x01; }
                // bits 8-15: sign bit position
                let sign_location = (*bit_precision).saturating_sub(1) as u8;
                let mut buf = Self::build_header(1, [bf0, sign_location, 0], *size);
                buf.extend_from_slice(&bit_offset.to_le_bytes());
                buf.extend_from_slice(&bit_precision.to_le_bytes());
                buf.push(*exponent_location);
                buf.push(*exponent_size);
                buf.push(*mantissa_location);
                buf.push(*mantissa_size);
                buf.extend_from_slice(&exponent_bias.to_le_bytes());
                buf
            }
            Datatype::String { size, padding, charset } => {
                let pad_val = match padding {
                    StringPadding::NullTerminate => 0,
                    StringPadding::NullPad => 1,
                    StringPadding::SpacePad => 2,
                };
                let bf0 = pad_val | (charset.code() << 4);
                Self::build_header(3, [bf0, 0, 0], *size)
            }
        }
    }

    fn build_header(class: u8, bf: [u8; 3], size: u32) -> Vec<u8> {
        let mut buf = vec![0u8; 8];
        buf[0] = (class & 0x0F) | (1 << 4);
        buf[1..4].copy_from_slice(&bf);
        buf[4..8].copy_from_slice(&size.to_le_bytes());
        buf
    }

    /// Size in bytes of one element of this type.
    pub fn type_size(&self) -> u32 {
        match self {
            Datatype::FixedPoint { size, .. } => *size,
            Datatype::FloatingPoint { size, .. } => *size,
            Datatype::String { size, .. } => *size,
        }
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
impl Datatype {
    /// Parse a datatype message. Returns `(Datatype, bytes_consumed)`.
    pub fn parse(data: &[u8]) -> Result<(Datatype, usize), FormatError> {
        ensure_len(data, 0, 8)?;

        let class_id = data[0] & 0x0F;
        let bf0 = data[1];
        let size = LittleEndian::read_u32(&data[4..8]);
        let pos = 8;
        let byte_order = if bf0 & 0x01 == 0 {
            DatatypeByteOrder::LittleEndian
        } else {
            DatatypeByteOrder::BigEndian
        };

        match class_id {
            0 => {
                ensure_len(data, pos, 4)?;
                let signed = (bf0 >> 3) & 0x01 == 1;
                let bit_offset = LittleEndian::read_u16(&data[pos..pos + 2]);
                let bit_precision = LittleEndian::read_u16(&data[pos + 2..pos + 4]);
                Ok((
                    Datatype::FixedPoint { size, byte_order, signed, bit_offset, bit_precision },
                    pos + 4,
                ))
            }
            1 => {
                ensure_len(data, pos, 12)?;
                Ok((
                    Datatype::FloatingPoint {
                        size,
                        byte_order,
                        bit_offset: LittleEndian::read_u16(&data[pos..pos + 2]),
                        bit_precision: LittleEndian::read_u16(&data[pos + 2..pos + 4]),
                        exponent_location: data[pos + 4],
                        exponent_size: data[pos + 5],
                        mantissa_location: data[pos + 6],
                        mantissa_size: data[pos + 7],
                        exponent_bias: LittleEndian::read_u32(&data[pos + 8..pos + 12]),
                    },
                    pos + 12,
                ))
            }
            3 => {
                let padding = match bf0 & 0x0F {
                    0 => StringPadding::NullTerminate,
                    1 => StringPadding::NullPad,
                    2 => StringPadding::SpacePad,
                    other => return Err(FormatError::InvalidStringPadding(other)),
                };
                let charset = parse_charset((bf0 >> 4) & 0x0F)?;
                Ok((Datatype::String { size, padding, charset }, pos))
            }
            other => Err(FormatError::InvalidDatatypeClass(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_builders::{make_f32_type, make_f64_type, make_i64_type};

    #[test]
    fn f64_matches_h5py_encoding() {
        let bytes = make_f64_type().serialize();
        assert_eq!(
            bytes,
            vec![
                0x11, 0x20, 0x3f, 0x00, 8, 0, 0, 0, // class 1 v1, bitfield, size
                0, 0, 64, 0, // offset, precision
                52, 11, 0, 52, // exponent/mantissa layout
                0xff, 0x03, 0, 0, // bias 1023
            ]
        );
    }

    #[test]
    fn f32_sign_bit_is_31() {
        let bytes = make_f32_type().serialize();
        assert_eq!(bytes[2], 31);
    }

    #[test]
    fn i64_roundtrip() {
        let dt = make_i64_type();
        let (parsed, used) = Datatype::parse(&dt.serialize()).unwrap();
        assert_eq!(parsed, dt);
        assert_eq!(used, 12);
        assert_eq!(parsed.type_size(), 8);
    }

    #[test]
    fn string_roundtrip_keeps_charset() {
        let dt = Datatype::String {
            size: 12,
            padding: StringPadding::NullPad,
            charset: CharacterSet::Ascii,
        };
        let (parsed, used) = Datatype::parse(&dt.serialize()).unwrap();
        assert_eq!(parsed, dt);
        assert_eq!(used, 8);
    }

    #[test]
    fn unsupported_class_rejected() {
        let mut bytes = make_i64_type().serialize();
        bytes[0] = 0x16; // compound
        assert_eq!(
            Datatype::parse(&bytes),
            Err(FormatError::InvalidDatatypeClass(6))
        );
    }

    #[test]
    fn truncated_datatype() {
        assert!(Datatype::parse(&[0x10]).is_err());
    }

    #[test]
    fn charset_for_name() {
        assert_eq!(CharacterSet::for_name("test_attr1"), CharacterSet::Ascii);
        assert_eq!(CharacterSet::for_name("température"), CharacterSet::Utf8);
    }
}
