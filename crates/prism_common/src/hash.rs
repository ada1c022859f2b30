//! Content hashing for shader cache keys.

use std::fmt;

/// A 128-bit MD5 content digest of raw shader source bytes.
///
/// Two sources with the same `ContentHash` are assumed to have identical content.
/// The digest is also viewed as two little-endian 64-bit halves, which is the
/// form stored in the on-disk index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes the MD5 digest of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(md5::compute(data).0)
    }

    /// Rebuilds a digest from its two little-endian halves.
    pub fn from_halves(lo: u64, hi: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&lo.to_le_bytes());
        bytes[8..].copy_from_slice(&hi.to_le_bytes());
        Self(bytes)
    }

    /// The first eight digest bytes as a little-endian integer.
    pub fn lo(&self) -> u64 {
        let mut half = [0u8; 8];
        half.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(half)
    }

    /// The last eight digest bytes as a little-endian integer.
    pub fn hi(&self) -> u64 {
        let mut half = [0u8; 8];
        half.copy_from_slice(&self.0[8..]);
        u64::from_le_bytes(half)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
