//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: intraprocedural only
    ///
    /// - Interprocedural: off
    /// - Field tracking: off
    /// - Worklist cap: 1000 block visits
    Fast,

    /// Development: shallow interprocedural lookups
    ///
    /// - Interprocedural: context-sensitive, call chain depth 2
    /// - Field tracking: off
    Balanced,

    /// Audit: deep interprocedural lookups and field tracking
    ///
    /// - Interprocedural: context-sensitive, call chain depth 8
    /// - Field tracking: on
    Thorough,

    /// Custom: User-defined (YAML only)
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("fast").unwrap(), Preset::Fast);
        assert_eq!(Preset::from_str("BALANCED").unwrap(), Preset::Balanced);
        assert_eq!(Preset::from_str("Thorough").unwrap(), Preset::Thorough);
        assert!(Preset::from_str("turbo").is_err());
    }

    #[test]
    fn test_preset_roundtrip_str() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom] {
            assert_eq!(Preset::from_str(preset.as_str()).unwrap(), preset);
        }
    }
}
