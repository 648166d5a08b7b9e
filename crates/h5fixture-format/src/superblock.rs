//! HDF5 superblock, version 3 (the only version the writer emits).
//!
//! Layout with 8-byte offsets: signature(8) + version(1) + offset_size(1)
//! + length_size(1) + consistency_flags(1) + base address + superblock
//! extension address + end-of-file address + root group object header
//! address + checksum(4) = 48 bytes.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(any(test, feature = "readback"))]
use byteorder::{ByteOrder, LittleEndian};

use crate::checksum::jenkins_lookup3;
#[cfg(any(test, feature = "readback"))]
use crate::error::FormatError;
use crate::signature::HDF5_SIGNATURE;

/// Undefined address marker.
pub const UNDEFINED_ADDRESS: u64 = u64::MAX;

/// Parsed or to-be-written version 2/3 superblock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superblock {
    /// Superblock version (2 or 3).
    pub version: u8,
    /// Size of offsets in bytes.
    pub offset_size: u8,
    /// Size of lengths in bytes.
    pub length_size: u8,
    /// File consistency flags.
    pub consistency_flags: u8,
    /// File base address.
    pub base_address: u64,
    /// Superblock extension address, `UNDEFINED_ADDRESS` when absent.
    pub superblock_extension_address: u64,
    /// End-of-file address.
    pub eof_address: u64,
    /// Root group object header address.
    pub root_group_address: u64,
}

impl Superblock {
    /// A v3 superblock with 8-byte offsets and lengths.
    pub fn v3(eof_address: u64, root_group_address: u64) -> Self {
        Self {
            version: 3,
            offset_size: 8,
            length_size: 8,
            consistency_flags: 0,
            base_address: 0,
            superblock_extension_address: UNDEFINED_ADDRESS,
            eof_address,
            root_group_address,
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        12 + 4 * self.offset_size as usize + 4
    }

    /// Serialize, appending the lookup3 checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&HDF5_SIGNATURE);
        buf.push(self.version);
        buf.push(self.offset_size);
        buf.push(self.length_size);
        buf.push(self.consistency_flags);
        for addr in [
            self.base_address,
            self.superblock_extension_address,
            self.eof_address,
            self.root_group_address,
        ] {
            write_offset(&mut buf, addr, self.offset_size);
        }
        let checksum = jenkins_lookup3(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }
}

fn write_offset(buf: &mut Vec<u8>, val: u64, size: u8) {
    match size {
        2 => buf.extend_from_slice(&(val as u16).to_le_bytes()),
        4 => buf.extend_from_slice(&(val as u32).to_le_bytes()),
        _ => buf.extend_from_slice(&val.to_le_bytes()),
    }
}

#[cfg(any(test, feature = "readback"))]
fn read_offset(data: &[u8], pos: usize, size: u8) -> Result<u64, FormatError> {
    ensure_len(data, pos + size as usize)?;
    let slice = &data[pos..pos + size as usize];
    Ok(match size {
        2 => LittleEndian::read_u16(slice) as u64,
        4 => LittleEndian::read_u32(slice) as u64,
        8 => LittleEndian::read_u64(slice),
        _ => return Err(FormatError::InvalidOffsetSize(size)),
    })
}

#[cfg(any(test, feature = "readback"))]
fn ensure_len(data: &[u8], needed: usize) -> Result<(), FormatError> {
    if data.len() < needed {
        Err(FormatError::UnexpectedEof {
            expected: needed,
            available: data.len(),
        })
    } else {
        Ok(())
    }
}

#[cfg(any(test, feature = "readback"))]
impl Superblock {
    /// Parse a v2/v3 superblock at `signature_offset`, verifying its checksum.
    pub fn parse(data: &[u8], signature_offset: usize) -> Result<Superblock, FormatError> {
        let d = data.get(signature_offset..).unwrap_or(&[]);
        ensure_len(d, 12)?;
        if d[..8] != HDF5_SIGNATURE {
            return Err(FormatError::SignatureNotFound);
        }

        let version = d[8];
        if !matches!(version, 2 | 3) {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let offset_size = d[9];
        let length_size = d[10];
        if !matches!(offset_size, 2 | 4 | 8) {
            return Err(FormatError::InvalidOffsetSize(offset_size));
        }
        if !matches!(length_size, 2 | 4 | 8) {
            return Err(FormatError::InvalidLengthSize(length_size));
        }
        let consistency_flags = d[11];

        let os = offset_size as usize;
        let body_end = 12 + 4 * os;
        ensure_len(d, body_end + 4)?;

        let base_address = read_offset(d, 12, offset_size)?;
        let superblock_extension_address = read_offset(d, 12 + os, offset_size)?;
        let eof_address = read_offset(d, 12 + 2 * os, offset_size)?;
        let root_group_address = read_offset(d, 12 + 3 * os, offset_size)?;

        let stored = LittleEndian::read_u32(&d[body_end..body_end + 4]);
        let computed = jenkins_lookup3(&d[..body_end]);
        if stored != computed {
            return Err(FormatError::ChecksumMismatch {
                expected: stored,
                computed,
            });
        }

        Ok(Superblock {
            version,
            offset_size,
            length_size,
            consistency_flags,
            base_address,
            superblock_extension_address,
            eof_address,
            root_group_address,
        })
    }
}
