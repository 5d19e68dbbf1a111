use bytes::Bytes;

use crate::error::{FetchError, Result};

/// Returns `true` for file names with a `.gz` suffix, ignoring case.
pub fn is_compressed_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".gz")
}

/// Decompress a gzip payload.
///
/// Decompression is not supported yet; every call fails with
/// [`FetchError::NotImplemented`] instead of returning the bytes unchanged.
pub fn decompress(_data: Bytes) -> Result<Bytes> {
    Err(FetchError::NotImplemented("decompression"))
}
