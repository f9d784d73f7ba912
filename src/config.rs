// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Geometry configuration: undefined sentinel and numeric tolerances

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GridError;

/// Sentinel value marking undefined geometry
pub const UNDEF: f64 = 1.0e33;

/// Values at or above this limit are treated as undefined
pub const UNDEF_LIMIT: f64 = 9.9e32;

/// Numeric configuration bound to a grid at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Sentinel written for undefined values
    pub undef: f64,
    /// Threshold for detecting the sentinel
    pub undef_limit: f64,
    /// Slack allowed when checking a depth against a pillar's depth range
    pub depth_tolerance: f64,
    /// Relative spread under which cell sizes and rotations count as uniform
    pub regularity_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            undef: UNDEF,
            undef_limit: UNDEF_LIMIT,
            depth_tolerance: 1.0e-6,
            regularity_tolerance: 1.0e-4,
        }
    }
}

impl GeometryConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: GeometryConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `cpgrid.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("cpgrid.toml").exists() {
            Self::from_file("cpgrid.toml")?
        } else {
            Self::default()
        };

        if let Ok(value) = std::env::var("CPGRID_DEPTH_TOLERANCE") {
            config.depth_tolerance = value
                .parse()
                .with_context(|| format!("Invalid CPGRID_DEPTH_TOLERANCE: {}", value))?;
        }

        if let Ok(value) = std::env::var("CPGRID_REGULARITY_TOLERANCE") {
            config.regularity_tolerance = value
                .parse()
                .with_context(|| format!("Invalid CPGRID_REGULARITY_TOLERANCE: {}", value))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Check that the sentinel and tolerances are usable
    pub fn validate(&self) -> std::result::Result<(), GridError> {
        if !(self.undef_limit < self.undef) {
            return Err(GridError::invalid(format!(
                "undef_limit {} must be below undef {}",
                self.undef_limit, self.undef
            )));
        }
        if !(self.depth_tolerance >= 0.0) || !(self.regularity_tolerance >= 0.0) {
            return Err(GridError::invalid("tolerances must be non-negative"));
        }
        Ok(())
    }

    /// True when a value should be read as undefined
    #[inline]
    pub fn is_undef(&self, value: f64) -> bool {
        !value.is_finite() || value.abs() >= self.undef_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        let config = GeometryConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_undef(UNDEF));
        assert!(config.is_undef(f64::NAN));
        assert!(!config.is_undef(1.0e6));
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<()> {
        let file = NamedTempFile::new()?;
        let config = GeometryConfig {
            depth_tolerance: 0.5,
            ..GeometryConfig::default()
        };
        config.save(file.path())?;

        let loaded = GeometryConfig::from_file(file.path())?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), "regularity_tolerance = 0.01\n")?;

        let loaded = GeometryConfig::from_file(file.path())?;
        assert_eq!(loaded.regularity_tolerance, 0.01);
        assert_eq!(loaded.undef, UNDEF);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_limit() {
        let config = GeometryConfig {
            undef_limit: 2.0e33,
            ..GeometryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
