//! On-disk index format.
//!
//! The index file is a 4-byte little-endian format version followed by
//! fixed-size [`IndexRecord`]s, appended one per cached shader:
//!
//! | field           | bytes |
//! |-----------------|-------|
//! | `hash_lo`       | 8     |
//! | `hash_hi`       | 8     |
//! | `source_length` | 4     |
//! | `shader_kind`   | 4     |
//! | `blob_offset`   | 4     |
//! | `blob_size`     | 4     |
//!
//! All integers are little-endian with no padding.

use prism_common::{ShaderKind, UnknownShaderKind};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::key::{CacheKey, CacheLocation};

/// Current index format version. Increment on breaking changes to the
/// header or record layout.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the version header.
pub const HEADER_SIZE: usize = 4;

/// Size of one encoded record.
pub const RECORD_SIZE: usize = 32;

/// Fixed-width little-endian encoding; yields exactly [`RECORD_SIZE`] bytes.
fn record_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}

/// Persisted form of one index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Low half of the source digest.
    pub hash_lo: u64,
    /// High half of the source digest.
    pub hash_hi: u64,
    /// Byte length of the source.
    pub source_length: u32,
    /// Stage code, see [`ShaderKind::code`].
    pub shader_kind: u32,
    /// Start of the bytecode in the blob file.
    pub blob_offset: u32,
    /// Length of the bytecode.
    pub blob_size: u32,
}

impl IndexRecord {
    /// Builds the record for an entry.
    ///
    /// Fails if the offset does not fit the 32-bit field.
    pub fn new(key: &CacheKey, location: &CacheLocation) -> Result<Self, CacheError> {
        let blob_offset =
            u32::try_from(location.offset).map_err(|_| CacheError::OffsetOverflow {
                offset: location.offset,
                size: u64::from(location.size),
            })?;
        Ok(Self {
            hash_lo: key.hash_lo,
            hash_hi: key.hash_hi,
            source_length: key.source_length,
            shader_kind: key.kind.code(),
            blob_offset,
            blob_size: location.size,
        })
    }

    /// Splits the record back into key and location.
    pub fn entry(&self) -> Result<(CacheKey, CacheLocation), UnknownShaderKind> {
        let kind = ShaderKind::try_from(self.shader_kind)?;
        let key = CacheKey {
            hash_lo: self.hash_lo,
            hash_hi: self.hash_hi,
            source_length: self.source_length,
            kind,
        };
        let location = CacheLocation {
            offset: u64::from(self.blob_offset),
            size: self.blob_size,
        };
        Ok((key, location))
    }

    /// Encodes the record into its 32-byte on-disk form.
    pub fn encode(&self) -> Result<[u8; RECORD_SIZE], CacheError> {
        let mut buf = [0u8; RECORD_SIZE];
        let written = bincode::serde::encode_into_slice(self, &mut buf, record_config())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        if written != RECORD_SIZE {
            return Err(CacheError::Serialization {
                reason: format!("record encoded to {written} bytes, expected {RECORD_SIZE}"),
            });
        }
        Ok(buf)
    }

    /// Decodes a record from its on-disk form.
    pub fn decode(buf: &[u8; RECORD_SIZE]) -> Result<Self, String> {
        let (record, read) = bincode::serde::decode_from_slice(buf, record_config())
            .map_err(|e| e.to_string())?;
        if read != RECORD_SIZE {
            return Err(format!("record decoded from {read} bytes, expected {RECORD_SIZE}"));
        }
        Ok(record)
    }
}

/// Encodes the index header.
pub fn encode_header() -> [u8; HEADER_SIZE] {
    FORMAT_VERSION.to_le_bytes()
}

/// Decodes the version stored in an index header.
pub fn decode_header(buf: [u8; HEADER_SIZE]) -> u32 {
    u32::from_le_bytes(buf)
}
