//! HDF5 Link message (message type 0x0006), hard links only.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::datatype::CharacterSet;
#[cfg(any(test, feature = "readback"))]
use crate::error::FormatError;

/// A hard link from a group to a child object header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    /// Name of this link within its group.
    pub name: String,
    /// Address of the child's object header.
    pub object_header_address: u64,
    /// Character set of the link name.
    pub charset: CharacterSet,
}

impl LinkMessage {
    pub fn hard(name: &str, object_header_address: u64) -> Self {
        Self {
            name: name.into(),
            object_header_address,
            charset: CharacterSet::for_name(name),
        }
    }

    /// Serialize to HDF5 message bytes (link message version 1).
    pub fn serialize(&self, offset_size: u8) -> Vec<u8> {
        let name_bytes = self.name.as_bytes();
        let name_len = name_bytes.len();
        let (size_bits, name_size_width) = if name_len <= 0xFF {
            (0u8, 1)
        } else if name_len <= 0xFFFF {
            (1, 2)
        } else {
            (2, 4)
        };
        let has_charset = self.charset != CharacterSet::Ascii;

        let mut buf = Vec::with_capacity(4 + name_len + offset_size as usize);
        buf.push(1); // version
        let mut flags = size_bits;
        if has_charset { flags |= 0x10; }
        buf.push(flags);
        if has_charset {
            buf.push(self.charset.code());
        }
        match name_size_width {
            1 => buf.push(name_len as u8),
            2 => buf.extend_from_slice(&(name_len as u16).to_le_bytes()),
            _ => buf.extend_from_slice(&(name_len as u32).to_le_bytes()),
        }
        buf.extend_from_slice(name_bytes);
        match offset_size {
            2 => buf.extend_from_slice(&(self.object_header_address as u16).to_le_bytes()),
            4 => buf.extend_from_slice(&(self.object_header_address as u32).to_le_bytes()),
            _ => buf.extend_from_slice(&self.object_header_address.to_le_bytes()),
        }
        buf
    }
}

#[cfg(any(test, feature = "readback"))]
fn read_uint(data: &[u8], pos: usize, size: usize) -> Result<u64, FormatError> {
    if pos + size > data.len() {
        return Err(FormatError::UnexpectedEof {
            expected: pos + size,
            available: data.len(),
        });
    }
    let mut raw = [0u8; 8];
    raw[..size].copy_from_slice(&data[pos..pos + size]);
    Ok(u64::from_le_bytes(raw))
}

#[cfg(any(test, feature = "readback"))]
impl LinkMessage {
    /// Parse a link message. Soft and external links are rejected.
    pub fn parse(data: &[u8], offset_size: u8) -> Result<LinkMessage, FormatError> {
        if data.len() < 2 {
            return Err(FormatError::UnexpectedEof {
                expected: 2,
                available: data.len(),
            });
        }
        let version = data[0];
        if version != 1 {
            return Err(FormatError::InvalidLinkVersion(version));
        }
        let flags = data[1];
        let mut pos = 2;

        if flags & 0x08 != 0 {
            let link_type = read_uint(data, pos, 1)? as u8;
            if link_type != 0 {
                return Err(FormatError::InvalidLinkType(link_type));
            }
            pos += 1;
        }
        if flags & 0x04 != 0 {
            pos += 8; // creation order
        }
        let charset = if flags & 0x10 != 0 {
            let cs = crate::datatype::parse_charset(read_uint(data, pos, 1)? as u8)?;
            pos += 1;
            cs
        } else {
            CharacterSet::Ascii
        };

        let width = 1usize << (flags & 0x03);
        let name_len = read_uint(data, pos, width)? as usize;
        pos += width;
        if pos + name_len > data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: pos + name_len,
                available: data.len(),
            });
        }
        let name = String::from_utf8_lossy(&data[pos..pos + name_len]).into_owned();
        pos += name_len;

        let object_header_address = read_uint(data, pos, offset_size as usize)?;

        Ok(LinkMessage {
            name,
            object_header_address,
            charset,
        })
    }
}
