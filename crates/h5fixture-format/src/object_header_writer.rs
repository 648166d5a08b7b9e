//! Object header writer for the v2 (`OHDR`) format.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::checksum::jenkins_lookup3;
use crate::error::FormatError;
use crate::message_type::MessageType;

/// Message flag: the message is constant and will not change.
pub const MSG_FLAG_CONSTANT: u8 = 0x01;

/// Collects header messages and serializes them as a single-chunk v2 object
/// header with a trailing lookup3 checksum.
#[derive(Debug, Default)]
pub struct ObjectHeaderWriter {
    messages: Vec<(MessageType, Vec<u8>, u8)>, // (type, data, msg_flags)
}

impl ObjectHeaderWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the header with default flags (0).
    pub fn add_message(&mut self, msg_type: MessageType, data: Vec<u8>) {
        self.messages.push((msg_type, data, 0));
    }

    /// Add a message with specific flags.
    pub fn add_message_with_flags(&mut self, msg_type: MessageType, data: Vec<u8>, flags: u8) {
        self.messages.push((msg_type, data, flags));
    }

    /// Serialize the complete header: `OHDR` + version + flags + chunk size,
    /// then each message as type(1) + size(2) + flags(1) + data, then the
    /// checksum.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        if let Some((_, data, _)) = self.messages.iter().find(|(_, d, _)| d.len() > u16::MAX as usize) {
            return Err(FormatError::MessageTooLarge(data.len()));
        }

        let msg_bytes_total: usize = self.messages.iter().map(|(_, data, _)| 4 + data.len()).sum();

        let (flags, chunk_size_width) = if msg_bytes_total <= 0xFF {
            (0x00u8, 1usize)
        } else if msg_bytes_total <= 0xFFFF {
            (0x01u8, 2)
        } else {
            (0x02u8, 4)
        };

        let mut buf = Vec::with_capacity(6 + chunk_size_width + msg_bytes_total + 4);
        buf.extend_from_slice(b"OHDR");
        buf.push(2);
        buf.push(flags);
        match chunk_size_width {
            1 => buf.push(msg_bytes_total as u8),
            2 => buf.extend_from_slice(&(msg_bytes_total as u16).to_le_bytes()),
            _ => buf.extend_from_slice(&(msg_bytes_total as u32).to_le_bytes()),
        }

        for (msg_type, data, msg_flags) in &self.messages {
            buf.push(msg_type.to_u16() as u8); // type is 1 byte in v2
            buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
            buf.push(*msg_flags);
            buf.extend_from_slice(data);
        }

        let checksum = jenkins_lookup3(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        Ok(buf)
    }
}
