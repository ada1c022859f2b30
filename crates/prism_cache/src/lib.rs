//! Persistent shader bytecode cache.
//!
//! Compiling shader source to backend bytecode is slow enough to stall a
//! renderer at startup. This crate keys compiled bytecode by a digest of the
//! source text and the pipeline stage, and persists it in a pair of
//! append-only files (an index log and a blob store) scoped to one
//! [`TargetProfile`](prism_common::TargetProfile).
//!
//! Every persistence failure is recoverable: corrupt or stale files are
//! rebuilt, and an unwritable location degrades to compile-only operation.
//! Only the compiler's own errors ever reach the caller.

#![warn(missing_docs)]

pub mod compiler;
pub mod device;
pub mod error;
pub mod index;
pub mod key;
pub mod manager;
pub mod paths;
pub mod record;
pub mod store;

pub use compiler::ShaderCompiler;
pub use device::ShaderDevice;
pub use error::{CacheError, ShaderError};
pub use index::CacheIndex;
pub use key::{CacheKey, CacheLocation};
pub use manager::ShaderCache;
pub use paths::CachePaths;
pub use store::{CacheState, CacheSummary};
