//! Compilation target profiles.
//!
//! A [`TargetProfile`] captures everything that makes bytecode from one
//! configuration binary-incompatible with another: the hardware feature level
//! and whether debug information was requested. Its [`token`](TargetProfile::token)
//! names the cache file pair so incompatible generations never collide.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Hardware feature level the shaders are compiled against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum FeatureLevel {
    /// Feature level 10.0 (shader model 4.0).
    #[serde(rename = "10_0")]
    Level10_0,
    /// Feature level 10.1 (shader model 4.1).
    #[serde(rename = "10_1")]
    Level10_1,
    /// Feature level 11.0 (shader model 5.0, default).
    #[default]
    #[serde(rename = "11_0")]
    Level11_0,
    /// Feature level 11.1.
    #[serde(rename = "11_1")]
    Level11_1,
    /// Feature level 12.0.
    #[serde(rename = "12_0")]
    Level12_0,
    /// Feature level 12.1.
    #[serde(rename = "12_1")]
    Level12_1,
    /// A level reported by the device that has no dedicated token.
    #[serde(skip)]
    Unknown,
}

impl FeatureLevel {
    /// The shader-model token used in cache file names.
    pub fn token(self) -> &'static str {
        match self {
            FeatureLevel::Level10_0 => "sm40",
            FeatureLevel::Level10_1 => "sm41",
            FeatureLevel::Level11_0 => "sm50",
            FeatureLevel::Level11_1 => "sm51",
            FeatureLevel::Level12_0 => "sm60",
            FeatureLevel::Level12_1 => "sm61",
            FeatureLevel::Unknown => "unk",
        }
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureLevel::Level10_0 => "10_0",
            FeatureLevel::Level10_1 => "10_1",
            FeatureLevel::Level11_0 => "11_0",
            FeatureLevel::Level11_1 => "11_1",
            FeatureLevel::Level12_0 => "12_0",
            FeatureLevel::Level12_1 => "12_1",
            FeatureLevel::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Error type for parsing feature level strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid feature level: '{input}'")]
pub struct ParseFeatureLevelError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for FeatureLevel {
    type Err = ParseFeatureLevelError;

    /// Accepts `11_0` as well as `11.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('.', "_").as_str() {
            "10_0" => Ok(FeatureLevel::Level10_0),
            "10_1" => Ok(FeatureLevel::Level10_1),
            "11_0" => Ok(FeatureLevel::Level11_0),
            "11_1" => Ok(FeatureLevel::Level11_1),
            "12_0" => Ok(FeatureLevel::Level12_0),
            "12_1" => Ok(FeatureLevel::Level12_1),
            _ => Err(ParseFeatureLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// The compilation target: feature level plus debug flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TargetProfile {
    /// Hardware feature level.
    pub feature_level: FeatureLevel,
    /// Whether shaders are compiled with debug information.
    pub debug: bool,
}

impl TargetProfile {
    /// Creates a profile for the given level and debug flag.
    pub fn new(feature_level: FeatureLevel, debug: bool) -> Self {
        Self {
            feature_level,
            debug,
        }
    }

    /// The configuration token appended to cache file names, e.g. `sm50_debug`.
    pub fn token(&self) -> String {
        if self.debug {
            format!("{}_debug", self.feature_level.token())
        } else {
            self.feature_level.token().to_string()
        }
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feature_level)?;
        if self.debug {
            write!(f, " (debug)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_per_level() {
        assert_eq!(FeatureLevel::Level10_0.token(), "sm40");
        assert_eq!(FeatureLevel::Level10_1.token(), "sm41");
        assert_eq!(FeatureLevel::Level11_0.token(), "sm50");
        assert_eq!(FeatureLevel::Level11_1.token(), "sm51");
        assert_eq!(FeatureLevel::Level12_0.token(), "sm60");
        assert_eq!(FeatureLevel::Level12_1.token(), "sm61");
        assert_eq!(FeatureLevel::Unknown.token(), "unk");
    }

    #[test]
    fn debug_suffix() {
        let release = TargetProfile::new(FeatureLevel::Level11_0, false);
        let debug = TargetProfile::new(FeatureLevel::Level11_0, true);
        assert_eq!(release.token(), "sm50");
        assert_eq!(debug.token(), "sm50_debug");
        assert_ne!(release.token(), debug.token());
    }

    #[test]
    fn parse_levels() {
        assert_eq!("10_1".parse::<FeatureLevel>(), Ok(FeatureLevel::Level10_1));
        assert_eq!("12.0".parse::<FeatureLevel>(), Ok(FeatureLevel::Level12_0));
        assert_eq!(" 11_1 ".parse::<FeatureLevel>(), Ok(FeatureLevel::Level11_1));
    }

    #[test]
    fn parse_invalid_level() {
        let err = "9_3".parse::<FeatureLevel>().unwrap_err();
        assert_eq!(err.to_string(), "invalid feature level: '9_3'");
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for level in [
            FeatureLevel::Level10_0,
            FeatureLevel::Level10_1,
            FeatureLevel::Level11_0,
            FeatureLevel::Level11_1,
            FeatureLevel::Level12_0,
            FeatureLevel::Level12_1,
        ] {
            assert_eq!(level.to_string().parse::<FeatureLevel>(), Ok(level));
        }
    }

    #[test]
    fn deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: FeatureLevel,
        }
        let w: Wrapper = toml::from_str(r#"level = "12_1""#).unwrap();
        assert_eq!(w.level, FeatureLevel::Level12_1);
    }

    #[test]
    fn default_profile() {
        let p = TargetProfile::default();
        assert_eq!(p.feature_level, FeatureLevel::Level11_0);
        assert!(!p.debug);
        assert_eq!(p.to_string(), "11_0");
    }
}
