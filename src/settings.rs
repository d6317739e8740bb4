// src/settings.rs

//! Build settings that accompany a feature set

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Build configuration classification
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Parse a build type name, case-insensitively
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::ConfigurationError(format!(
                "Unknown build type '{}'. Expected Debug, Release, RelWithDebInfo or MinSizeRel",
                s
            ))
        })
    }

    /// Whether artifacts are built with debug symbols
    pub fn with_symbols(&self) -> bool {
        matches!(self, Self::Debug | Self::RelWithDebInfo)
    }

    /// Whether the compiler optimizer stays enabled
    pub fn is_optimized(&self) -> bool {
        !matches!(self, Self::Debug)
    }
}

/// Settings of the build a registry is computed for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildSettings {
    pub build_type: BuildType,
    pub os: String,
    pub arch: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            build_type: BuildType::default(),
            os: "Linux".to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

impl BuildSettings {
    /// Create settings for a build type on the default platform
    pub fn new(build_type: BuildType) -> Self {
        Self {
            build_type,
            ..Self::default()
        }
    }

    /// Set the target operating system
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Set the target architecture
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_build_type_parse() {
        assert_eq!(BuildType::parse("Debug").unwrap(), BuildType::Debug);
        assert_eq!(BuildType::parse("relwithdebinfo").unwrap(), BuildType::RelWithDebInfo);
        assert!(BuildType::parse("Profile").unwrap_err().is_configuration());
    }

    #[test]
    fn test_build_type_display_roundtrip() {
        for build_type in BuildType::iter() {
            assert_eq!(BuildType::parse(&build_type.to_string()).unwrap(), build_type);
        }
    }

    #[test]
    fn test_symbols_and_optimization() {
        assert!(BuildType::Debug.with_symbols());
        assert!(!BuildType::Debug.is_optimized());
        assert!(BuildType::RelWithDebInfo.with_symbols());
        assert!(BuildType::RelWithDebInfo.is_optimized());
        assert!(!BuildType::Release.with_symbols());
        assert!(!BuildType::MinSizeRel.with_symbols());
    }

    #[test]
    fn test_settings_builder() {
        let settings = BuildSettings::new(BuildType::Debug)
            .with_os("Linux")
            .with_arch("armv8");
        assert_eq!(settings.build_type, BuildType::Debug);
        assert_eq!(settings.arch, "armv8");
        assert_eq!(BuildSettings::default().build_type, BuildType::Release);
    }
}
