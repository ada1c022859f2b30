//! Configuration types deserialized from `prism.toml`.

use prism_common::{FeatureLevel, TargetProfile};
use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `prism.toml`.
#[derive(Debug, Deserialize)]
pub struct PrismConfig {
    /// Shader binary cache settings.
    pub shader_cache: CacheConfig,
}

/// Settings for one shader binary cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the index and blob files.
    pub directory: PathBuf,
    /// Feature level shaders are compiled against.
    #[serde(default)]
    pub feature_level: FeatureLevel,
    /// Whether shaders are compiled with debug information.
    #[serde(default)]
    pub debug: bool,
}

impl CacheConfig {
    /// The compilation target described by this configuration.
    pub fn target_profile(&self) -> TargetProfile {
        TargetProfile::new(self.feature_level, self.debug)
    }
}
