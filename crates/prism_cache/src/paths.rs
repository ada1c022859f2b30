//! Cache file naming.

use std::path::{Path, PathBuf};

use prism_common::TargetProfile;

/// Prefix shared by every cache file name.
const FILE_PREFIX: &str = "d3d_shaders_";

/// File extension of the index log.
const INDEX_EXT: &str = "idx";

/// File extension of the blob store.
const BLOB_EXT: &str = "bin";

/// Locations of the index and blob files for one target profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    /// The index log.
    pub index: PathBuf,
    /// The blob store.
    pub blob: PathBuf,
}

impl CachePaths {
    /// Derives `<base>/d3d_shaders_<token>.idx` and `.bin`.
    pub fn new(base_path: &Path, profile: &TargetProfile) -> Self {
        let stem = format!("{FILE_PREFIX}{}", profile.token());
        Self {
            index: base_path.join(format!("{stem}.{INDEX_EXT}")),
            blob: base_path.join(format!("{stem}.{BLOB_EXT}")),
        }
    }
}
