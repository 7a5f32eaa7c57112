//! Configuration for the resampling engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwathGridError};

/// Tunable constants for grid definition and correspondence building.
///
/// The defaults are sensor-resolution constants inherited from the product
/// family this tool was written for: 70 m output pixels and a 210 m search
/// radius (about three along-track pixels). They are applied uniformly
/// across product families; adjust via environment when that assumption
/// does not hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Output pixel size in meters (also drives the geographic pixel-size
    /// equalization pass).
    pub pixel_size_m: f64,

    /// Maximum distance in meters between an output cell center and its
    /// nearest swath pixel; cells beyond it stay unmatched.
    pub max_distance_m: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            pixel_size_m: 70.0,
            max_distance_m: 210.0,
        }
    }
}

impl ResampleConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SWATH_PIXEL_SIZE_M") {
            if let Ok(size) = val.parse() {
                config.pixel_size_m = size;
            }
        }

        if let Ok(val) = std::env::var("SWATH_MAX_DISTANCE_M") {
            if let Ok(dist) = val.parse() {
                config.max_distance_m = dist;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.pixel_size_m.is_finite() || self.pixel_size_m <= 0.0 {
            return Err(SwathGridError::Config(
                "pixel_size_m must be > 0".to_string(),
            ));
        }
        if !self.max_distance_m.is_finite() || self.max_distance_m <= 0.0 {
            return Err(SwathGridError::Config(
                "max_distance_m must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResampleConfig::default();
        assert_eq!(config.pixel_size_m, 70.0);
        assert_eq!(config.max_distance_m, 210.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ResampleConfig::default();
        config.pixel_size_m = 0.0;
        assert!(config.validate().is_err());

        config = ResampleConfig::default();
        config.max_distance_m = f64::NAN;
        assert!(config.validate().is_err());
    }
}
