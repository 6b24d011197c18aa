//! Session configuration.
//!
//! Tolerances, scale and behaviour flags a producer hands to the encoder
//! before any serialize call. Persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Topology-context configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Context behaviour byte.
    pub behaviour: u8,
    /// Smallest meaningful length.
    pub granularity: f64,
    /// Modelling tolerance.
    pub tolerance: f64,
    /// Thinnest face, written only when present.
    pub smallest_face_thickness: Option<f64>,
    /// Context scale, written only when present.
    pub scale: Option<f64>,
    /// Default tolerance of compressed brep bodies.
    pub compression_tolerance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            behaviour: 0,
            granularity: 0.0,
            tolerance: 0.0,
            smallest_face_thickness: None,
            scale: None,
            compression_tolerance: 1e-4,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every numeric field is in range.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [("granularity", self.granularity), ("tolerance", self.tolerance)];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{} must be finite and >= 0, got {}", name, value)));
            }
        }
        if !self.compression_tolerance.is_finite() || self.compression_tolerance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "compression_tolerance must be finite and > 0, got {}",
                self.compression_tolerance
            )));
        }
        if let Some(t) = self.smallest_face_thickness {
            if !t.is_finite() || t < 0.0 {
                return Err(Error::InvalidConfig(format!("smallest_face_thickness out of range: {}", t)));
            }
        }
        if let Some(s) = self.scale {
            if !s.is_finite() || s <= 0.0 {
                return Err(Error::InvalidConfig(format!("scale must be finite and > 0, got {}", s)));
            }
        }
        Ok(())
    }
}
