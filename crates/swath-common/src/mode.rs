//! Output projection mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target projection for output rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Universal Transverse Mercator, zone chosen from the scene center.
    Utm,
    /// Geographic lat/lon (EPSG:4326).
    Geo,
}

impl OutputMode {
    /// The token used in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utm => "UTM",
            Self::Geo => "GEO",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid output projection {0:?}: options are UTM and GEO")]
pub struct ModeParseError(pub String);

impl FromStr for OutputMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UTM" => Ok(Self::Utm),
            "GEO" => Ok(Self::Geo),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("UTM".parse::<OutputMode>().unwrap(), OutputMode::Utm);
        assert_eq!("GEO".parse::<OutputMode>().unwrap(), OutputMode::Geo);
        assert!("utm".parse::<OutputMode>().is_err());
        assert!("GEOGRAPHIC".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_display_matches_filename_token() {
        assert_eq!(OutputMode::Utm.to_string(), "UTM");
        assert_eq!(OutputMode::Geo.to_string(), "GEO");
    }
}
