//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PrismConfig;
use std::path::Path;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "prism.toml";

/// Loads and validates a `prism.toml` configuration from the given file.
pub fn load_config(path: &Path) -> Result<PrismConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `prism.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PrismConfig, ConfigError> {
    let config: PrismConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present.
fn validate_config(config: &PrismConfig) -> Result<(), ConfigError> {
    if config.shader_cache.directory.as_os_str().is_empty() {
        return Err(ConfigError::MissingField(
            "shader_cache.directory".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_common::FeatureLevel;
    use std::path::PathBuf;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[shader_cache]
directory = "cache/shaders"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.shader_cache.directory,
            PathBuf::from("cache/shaders")
        );
    }

    #[test]
    fn default_values() {
        let toml = r#"
[shader_cache]
directory = "cache"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.shader_cache.feature_level, FeatureLevel::Level11_0);
        assert!(!config.shader_cache.debug);
    }

    #[test]
    fn empty_directory_errors() {
        let toml = r#"
[shader_cache]
directory = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn missing_section_errors() {
        let err = load_config_from_str("").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_feature_level_errors() {
        let toml = r#"
[shader_cache]
directory = "cache"
feature_level = "9_3"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[shader_cache]\ndirectory = \"shaders\"\ndebug = true\n",
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.shader_cache.debug);
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config(Path::new("/nonexistent/dir/prism.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
