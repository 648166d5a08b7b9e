//! Version 2 object header parsing, used by read-back.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};

use crate::checksum::jenkins_lookup3;
use crate::error::FormatError;
use crate::message_type::MessageType;

/// One message from an object header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMessage {
    pub msg_type: MessageType,
    pub flags: u8,
    pub data: Vec<u8>,
}

/// A parsed single-chunk v2 object header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    pub flags: u8,
    pub messages: Vec<HeaderMessage>,
}

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

impl ObjectHeader {
    /// Parse the v2 object header at `offset`, verifying its checksum.
    ///
    /// Continuation chunks are not followed; headers written by this crate
    /// always fit in one chunk.
    pub fn parse(data: &[u8], offset: usize) -> Result<ObjectHeader, FormatError> {
        ensure_len(data, offset, 6)?;
        if &data[offset..offset + 4] != b"OHDR" {
            return Err(FormatError::InvalidObjectHeaderSignature);
        }
        let version = data[offset + 4];
        if version != 2 {
            return Err(FormatError::InvalidObjectHeaderVersion(version));
        }
        let flags = data[offset + 5];
        let mut pos = offset + 6;

        if flags & 0x20 != 0 {
            pos += 16; // access/modification/change/birth times
        }
        if flags & 0x10 != 0 {
            pos += 4; // attribute phase change thresholds
        }

        let width = 1usize << (flags & 0x03);
        ensure_len(data, pos, width)?;
        let mut raw = [0u8; 8];
        raw[..width].copy_from_slice(&data[pos..pos + width]);
        let chunk_size = u64::from_le_bytes(raw) as usize;
        pos += width;

        let end = pos + chunk_size;
        ensure_len(data, end, 4)?;
        let stored = LittleEndian::read_u32(&data[end..end + 4]);
        let computed = jenkins_lookup3(&data[offset..end]);
        if stored != computed {
            return Err(FormatError::ChecksumMismatch {
                expected: stored,
                computed,
            });
        }

        let header_size = if flags & 0x04 != 0 { 6 } else { 4 };
        let mut messages = Vec::new();
        while pos + header_size <= end {
            let msg_type = MessageType::from_u16(data[pos] as u16);
            let size = LittleEndian::read_u16(&data[pos + 1..pos + 3]) as usize;
            let msg_flags = data[pos + 3];
            pos += header_size;
            if pos + size > end {
                return Err(FormatError::UnexpectedEof {
                    expected: pos + size,
                    available: end,
                });
            }
            messages.push(HeaderMessage {
                msg_type,
                flags: msg_flags,
                data: data[pos..pos + size].to_vec(),
            });
            pos += size;
        }

        Ok(ObjectHeader { flags, messages })
    }

    /// Messages of one type, in header order.
    pub fn messages_of(&self, msg_type: MessageType) -> impl Iterator<Item = &HeaderMessage> {
        self.messages.iter().filter(move |m| m.msg_type == msg_type)
    }

    /// The first message of the given type.
    pub fn find(&self, msg_type: MessageType) -> Option<&HeaderMessage> {
        self.messages_of(msg_type).next()
    }
}
