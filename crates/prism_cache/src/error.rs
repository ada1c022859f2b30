//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur inside the persistence layer.
///
/// None of these reach the caller of
/// [`ShaderCache::get_compiled_bytecode`](crate::ShaderCache::get_compiled_bytecode):
/// open failures trigger a rebuild or compile-only operation, read failures
/// become a miss, and write failures are logged while the freshly compiled
/// bytecode is still returned.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An existing cache file could not be opened or read.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A fresh cache file could not be created.
    #[error("cannot create cache file {path}: {source}")]
    Create {
        /// The file that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The index header names a different format version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The index file path.
        path: PathBuf,
        /// The current format version.
        expected: u32,
        /// The version found in the file.
        actual: u32,
    },

    /// The index contains a malformed or out-of-range record.
    #[error("corrupt cache index {path}: {reason}")]
    Corrupt {
        /// The index file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A blob range could not be read back.
    #[error("failed to read {size} bytes at offset {offset} from blob file: {source}")]
    Read {
        /// Start of the range.
        offset: u64,
        /// Length of the range.
        size: u32,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Appending to a cache file failed.
    #[error("failed to append to {path}: {source}")]
    Write {
        /// The file being appended to.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The entry does not fit the 32-bit offset and size fields of a record.
    #[error("blob of {size} bytes at offset {offset} exceeds the index record range")]
    OffsetOverflow {
        /// The offset the blob would be written at.
        offset: u64,
        /// The blob length.
        size: u64,
    },

    /// An index record could not be encoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

/// Failure of a convenience call that compiles a shader and creates the
/// device object from its bytecode.
///
/// Compiler and device failures are kept apart so the renderer can tell a
/// broken shader from a broken device.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError<C, D> {
    /// The compiler rejected the source.
    #[error("shader compilation failed: {0}")]
    Compile(#[source] C),

    /// The device rejected the bytecode.
    #[error("failed to create shader object: {0}")]
    Device(#[source] D),
}
