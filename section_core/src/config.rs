//! # Configuration
//!
//! Analysis settings and application configuration.
//!
//! The configuration file is TOML:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [analysis]
//! degrees_per_segment = 5.0
//! reference_material = "steel"
//! ```
//!
//! Discovery order: explicit path, then the `SECTION_CONFIG` environment
//! variable, then `./config/default.toml`, then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};
use crate::geometry::arc::DEFAULT_DEGREES_PER_SEGMENT;
use crate::materials::MaterialRegistry;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "SECTION_CONFIG";

/// Finest accepted arc fidelity (degrees per chord)
pub const MIN_DEGREES_PER_SEGMENT: f64 = 1.0;

/// Coarsest accepted arc fidelity (degrees per chord)
pub const MAX_DEGREES_PER_SEGMENT: f64 = 45.0;

/// Default reference material for transformed properties
pub const DEFAULT_REFERENCE_MATERIAL: &str = "aluminium";

/// Settings that control import and analysis of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Angular sweep replaced by one straight chord when discretizing arcs
    #[serde(default = "default_degrees_per_segment")]
    pub degrees_per_segment: f64,

    /// Material whose modulus transforms the modulus-weighted properties
    #[serde(default = "default_reference_material")]
    pub reference_material: String,
}

fn default_degrees_per_segment() -> f64 {
    DEFAULT_DEGREES_PER_SEGMENT
}

fn default_reference_material() -> String {
    DEFAULT_REFERENCE_MATERIAL.to_string()
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            degrees_per_segment: default_degrees_per_segment(),
            reference_material: default_reference_material(),
        }
    }
}

impl AnalysisSettings {
    pub fn with_degrees_per_segment(mut self, degrees: f64) -> Self {
        self.degrees_per_segment = degrees;
        self
    }

    pub fn with_reference_material(mut self, id: impl Into<String>) -> Self {
        self.reference_material = id.into();
        self
    }

    /// Check ranges and that the reference material is registered.
    pub fn validate(&self, registry: &MaterialRegistry) -> SectionResult<()> {
        if !(MIN_DEGREES_PER_SEGMENT..=MAX_DEGREES_PER_SEGMENT).contains(&self.degrees_per_segment) {
            return Err(SectionError::invalid_input(
                "degrees_per_segment",
                self.degrees_per_segment.to_string(),
                format!(
                    "must be between {} and {} degrees",
                    MIN_DEGREES_PER_SEGMENT, MAX_DEGREES_PER_SEGMENT
                ),
            ));
        }
        registry.get(&self.reference_material)?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> SectionResult<Self> {
        toml::from_str(content).map_err(SectionError::serialization)
    }

    /// Load configuration from an explicit path.
    pub fn from_file(path: &Path) -> SectionResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SectionError::file_error("read config", path.display().to_string(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| SectionError::SerializationError {
            reason: format!("Invalid config in {}: {}", path.display(), e),
        })
    }

    /// Locate and load the configuration; missing default file yields defaults.
    pub fn discover(explicit: Option<&Path>) -> SectionResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(&PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|e| SectionError::file_error("resolve", "current directory", e.to_string()))?;

        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}
