//! Cache keys and blob locations.

use prism_common::{ContentHash, ShaderKind};

/// Identifies one compiled shader: the digest of its source, the source
/// length, and the pipeline stage.
///
/// No canonicalization is applied to the source. Any byte-level difference,
/// including trailing whitespace, yields a different key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Digest bytes 0..8 as a little-endian integer.
    pub hash_lo: u64,
    /// Digest bytes 8..16 as a little-endian integer.
    pub hash_hi: u64,
    /// Byte length of the source.
    pub source_length: u32,
    /// Pipeline stage.
    pub kind: ShaderKind,
}

impl CacheKey {
    /// Builds the key for a shader source.
    ///
    /// Returns `None` for sources longer than `u32::MAX` bytes, which the
    /// index cannot represent.
    pub fn new(kind: ShaderKind, source: &str) -> Option<Self> {
        Self::from_bytes(kind, source.as_bytes())
    }

    /// Builds the key for raw source bytes.
    pub fn from_bytes(kind: ShaderKind, source: &[u8]) -> Option<Self> {
        let source_length = u32::try_from(source.len()).ok()?;
        let hash = ContentHash::from_bytes(source);
        Some(Self {
            hash_lo: hash.lo(),
            hash_hi: hash.hi(),
            source_length,
            kind,
        })
    }

    /// The digest this key was built from.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_halves(self.hash_lo, self.hash_hi)
    }
}

/// A byte range inside the blob file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLocation {
    /// Start of the range.
    pub offset: u64,
    /// Length of the range.
    pub size: u32,
}

impl CacheLocation {
    /// One past the last byte of the range.
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_source_same_key() {
        let a = CacheKey::new(ShaderKind::Pixel, "float4 main() : SV_Target { return 0; }");
        let b = CacheKey::new(ShaderKind::Pixel, "float4 main() : SV_Target { return 0; }");
        assert_eq!(a, b);
    }

    #[test]
    fn kind_is_part_of_key() {
        let ps = CacheKey::new(ShaderKind::Pixel, "A").unwrap();
        let vs = CacheKey::new(ShaderKind::Vertex, "A").unwrap();
        assert_ne!(ps, vs);
        assert_eq!(ps.hash_lo, vs.hash_lo);
        assert_eq!(ps.hash_hi, vs.hash_hi);
    }

    #[test]
    fn trailing_whitespace_changes_key() {
        let a = CacheKey::new(ShaderKind::Vertex, "void main() {}").unwrap();
        let b = CacheKey::new(ShaderKind::Vertex, "void main() {} ").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.source_length + 1, b.source_length);
    }

    #[test]
    fn key_fields_for_single_byte_source() {
        let key = CacheKey::new(ShaderKind::Pixel, "A").unwrap();
        assert_eq!(key.source_length, 1);
        assert_eq!(key.kind, ShaderKind::Pixel);
        assert_eq!(
            key.content_hash().to_string(),
            "7fc56270e7a70fa81a5935b72eacbe29"
        );
    }

    #[test]
    fn empty_source_is_keyed() {
        let key = CacheKey::new(ShaderKind::Compute, "").unwrap();
        assert_eq!(key.source_length, 0);
    }

    #[test]
    fn location_end() {
        let loc = CacheLocation {
            offset: 100,
            size: 28,
        };
        assert_eq!(loc.end(), 128);
    }
}
