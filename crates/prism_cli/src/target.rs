//! Resolving which cache file pair a command operates on.

use std::path::{Path, PathBuf};

use prism_cache::CachePaths;
use prism_common::TargetProfile;
use prism_config::{CacheConfig, CONFIG_FILE_NAME};

use crate::{GlobalArgs, TargetArgs};

/// A fully resolved cache location.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// Cache directory.
    pub dir: PathBuf,
    /// Compilation target selecting the file pair.
    pub profile: TargetProfile,
    /// The index and blob file paths.
    pub paths: CachePaths,
}

/// Merges command-line flags over the configuration file.
///
/// The configuration comes from `--config`, or from `prism.toml` in the
/// working directory if one exists. Without either, the directory must be
/// given with `--dir`. A relative `directory` in the file is taken relative
/// to the file; a relative `--dir` is taken relative to the working
/// directory.
pub fn resolve_target(
    args: &TargetArgs,
    global: &GlobalArgs,
) -> Result<ResolvedTarget, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => Some(load_section(Path::new(path))?),
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            Some(load_section(Path::new(CONFIG_FILE_NAME))?)
        }
        None => None,
    };
    merge(args, config)
}

/// Loads `[shader_cache]`, anchoring a relative directory at the file's own
/// directory.
fn load_section(path: &Path) -> Result<CacheConfig, prism_config::ConfigError> {
    let mut section = prism_config::load_config(path)?.shader_cache;
    if section.directory.is_relative() {
        if let Some(parent) = path.parent() {
            section.directory = parent.join(&section.directory);
        }
    }
    Ok(section)
}

fn merge(
    args: &TargetArgs,
    config: Option<CacheConfig>,
) -> Result<ResolvedTarget, Box<dyn std::error::Error>> {
    let dir = match (&args.dir, &config) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(config)) => config.directory.clone(),
        (None, None) => {
            return Err(
                format!("no cache directory given; pass --dir or create {CONFIG_FILE_NAME}")
                    .into(),
            )
        }
    };

    let mut profile = config
        .as_ref()
        .map(CacheConfig::target_profile)
        .unwrap_or_default();
    if let Some(level) = args.feature_level {
        profile.feature_level = level;
    }
    if args.debug {
        profile.debug = true;
    }

    let paths = CachePaths::new(&dir, &profile);
    Ok(ResolvedTarget {
        dir,
        profile,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_common::FeatureLevel;

    fn config() -> CacheConfig {
        CacheConfig {
            directory: PathBuf::from("from_config"),
            feature_level: FeatureLevel::Level10_0,
            debug: true,
        }
    }

    #[test]
    fn flags_only() {
        let args = TargetArgs {
            dir: Some("cache".to_string()),
            feature_level: Some(FeatureLevel::Level12_0),
            debug: false,
        };
        let target = merge(&args, None).unwrap();
        assert_eq!(target.dir, PathBuf::from("cache"));
        assert!(target.paths.index.ends_with("d3d_shaders_sm60.idx"));
    }

    #[test]
    fn defaults_without_level() {
        let args = TargetArgs {
            dir: Some("cache".to_string()),
            ..TargetArgs::default()
        };
        let target = merge(&args, None).unwrap();
        assert_eq!(target.profile, TargetProfile::default());
    }

    #[test]
    fn config_fills_missing_flags() {
        let target = merge(&TargetArgs::default(), Some(config())).unwrap();
        assert_eq!(target.dir, PathBuf::from("from_config"));
        assert!(target.paths.blob.ends_with("d3d_shaders_sm40_debug.bin"));
    }

    #[test]
    fn flags_override_config() {
        let args = TargetArgs {
            dir: Some("override".to_string()),
            feature_level: Some(FeatureLevel::Level11_1),
            debug: false,
        };
        let target = merge(&args, Some(config())).unwrap();
        assert_eq!(target.dir, PathBuf::from("override"));
        assert_eq!(target.profile.feature_level, FeatureLevel::Level11_1);
        assert!(target.profile.debug, "debug from config is kept");
    }

    #[test]
    fn missing_directory_errors() {
        let err = merge(&TargetArgs::default(), None).unwrap_err();
        assert!(err.to_string().contains("--dir"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[shader_cache]\ndirectory = \"shaders\"\nfeature_level = \"12_1\"\n",
        )
        .unwrap();
        let global = GlobalArgs {
            quiet: true,
            config: Some(path.to_string_lossy().into_owned()),
        };
        let target = resolve_target(&TargetArgs::default(), &global).unwrap();
        assert_eq!(target.dir, dir.path().join("shaders"));
        assert_eq!(target.profile.feature_level, FeatureLevel::Level12_1);
    }

    #[test]
    fn config_directory_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir(&nested).unwrap();
        let path = nested.join("prism.toml");
        std::fs::write(&path, "[shader_cache]\ndirectory = \"../cache\"\n").unwrap();

        let section = load_section(&path).unwrap();
        assert_eq!(section.directory, nested.join("../cache"));
    }

    #[test]
    fn absolute_config_directory_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("abs_cache");
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            format!("[shader_cache]\ndirectory = {:?}\n", cache_dir.to_string_lossy()),
        )
        .unwrap();

        let section = load_section(&path).unwrap();
        assert_eq!(section.directory, cache_dir);
    }

    #[test]
    fn dir_flag_is_not_anchored_at_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[shader_cache]\ndirectory = \"shaders\"\n").unwrap();
        let args = TargetArgs {
            dir: Some("elsewhere".to_string()),
            ..TargetArgs::default()
        };
        let global = GlobalArgs {
            quiet: true,
            config: Some(path.to_string_lossy().into_owned()),
        };
        let target = resolve_target(&args, &global).unwrap();
        assert_eq!(target.dir, PathBuf::from("elsewhere"));
    }
}
