//! HDF5 Dataspace message (message type 0x0001).

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

#[cfg(any(test, feature = "readback"))]
use crate::error::FormatError;

/// Type of dataspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataspaceType {
    /// Single element.
    Scalar,
    /// N-dimensional array.
    Simple,
    /// No data.
    Null,
}

/// An HDF5 dataspace: the shape of a dataset or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataspace {
    pub space_type: DataspaceType,
    /// Current dimension sizes; empty for scalar and null spaces.
    pub dimensions: Vec<u64>,
}

impl Dataspace {
    /// A scalar (one element, rank 0) dataspace.
    pub fn scalar() -> Self {
        Self {
            space_type: DataspaceType::Scalar,
            dimensions: vec![],
        }
    }

    /// A simple dataspace with the given shape. An empty shape is scalar.
    pub fn simple(shape: &[u64]) -> Self {
        if shape.is_empty() {
            return Self::scalar();
        }
        Self {
            space_type: DataspaceType::Simple,
            dimensions: shape.to_vec(),
        }
    }

    pub fn rank(&self) -> u8 {
        self.dimensions.len() as u8
    }

    /// Total number of elements. Scalar = 1, Null = 0.
    pub fn num_elements(&self) -> u64 {
        match self.space_type {
            DataspaceType::Null => 0,
            DataspaceType::Scalar => 1,
            DataspaceType::Simple => self.dimensions.iter().product(),
        }
    }

    /// Serialize to HDF5 message bytes (dataspace version 2, no max dims).
    pub fn serialize(&self, length_size: u8) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.dimensions.len() * length_size as usize);
        buf.push(2);
        buf.push(self.rank());
        buf.push(0); // flags: no maximum dimensions
        buf.push(match self.space_type {
            DataspaceType::Scalar => 0,
            DataspaceType::Simple => 1,
            DataspaceType::Null => 2,
        });
        for &dim in &self.dimensions {
            match length_size {
                2 => buf.extend_from_slice(&(dim as u16).to_le_bytes()),
                4 => buf.extend_from_slice(&(dim as u32).to_le_bytes()),
                _ => buf.extend_from_slice(&dim.to_le_bytes()),
            }
        }
        buf
    }
}

#[cfg(any(test, feature = "readback"))]
impl Dataspace {
    /// Parse a version 2 dataspace message. Maximum dimensions, if present,
    /// are skipped.
    pub fn parse(data: &[u8], length_size: u8) -> Result<Dataspace, FormatError> {
        if data.len() < 4 {
            return Err(FormatError::UnexpectedEof {
                expected: 4,
                available: data.len(),
            });
        }
        let version = data[0];
        if version != 2 {
            return Err(FormatError::InvalidDataspaceVersion(version));
        }
        let rank = data[1] as usize;
        let space_type = match data[3] {
            0 => DataspaceType::Scalar,
            1 => DataspaceType::Simple,
            2 => DataspaceType::Null,
            other => return Err(FormatError::InvalidDataspaceType(other)),
        };

        let ls = length_size as usize;
        let needed = 4 + rank * ls;
        if data.len() < needed {
            return Err(FormatError::UnexpectedEof {
                expected: needed,
                available: data.len(),
            });
        }
        let mut dimensions = Vec::with_capacity(rank);
        for i in 0..rank {
            let s = &data[4 + i * ls..4 + (i + 1) * ls];
            let dim = match length_size {
                2 => u16::from_le_bytes([s[0], s[1]]) as u64,
                4 => u32::from_le_bytes([s[0], s[1], s[2], s[3]]) as u64,
                8 => u64::from_le_bytes([s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]]),
                _ => return Err(FormatError::InvalidLengthSize(length_size)),
            };
            dimensions.push(dim);
        }

        Ok(Dataspace {
            space_type,
            dimensions,
        })
    }
}
