//! HDF5 file signature (magic bytes).

/// The 8-byte HDF5 magic signature.
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1A, b'\n'];

/// Search for the HDF5 signature at valid offsets: 0, then 512, 1024, 2048, ...
///
/// Returns the byte offset where the signature was found.
#[cfg(any(test, feature = "readback"))]
pub fn find_signature(data: &[u8]) -> Result<usize, crate::error::FormatError> {
    if data.len() >= 8 && data[..8] == HDF5_SIGNATURE {
        return Ok(0);
    }

    let mut offset = 512;
    while offset + 8 <= data.len() {
        if data[offset..offset + 8] == HDF5_SIGNATURE {
            return Ok(offset);
        }
        offset *= 2;
    }

    Err(crate::error::FormatError::SignatureNotFound)
}
