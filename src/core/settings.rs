// Copyright @yucwang 2026

use crate::core::tonemap::Tonemap;
use crate::math::constants::{EPSILON, Float};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    ZeroResolution { width: usize, height: usize },
    InvalidMaxDepth(u32),
    InvalidSurviveRate(Float),
    InvalidRayEpsilon(Float),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::ZeroResolution { width, height } =>
                write!(f, "resolution must be non-zero, got {}x{}", width, height),
            SettingsError::InvalidMaxDepth(depth) =>
                write!(f, "max depth must be at least 1, got {}", depth),
            SettingsError::InvalidSurviveRate(rate) =>
                write!(f, "survive rate must be finite and positive, got {}", rate),
            SettingsError::InvalidRayEpsilon(eps) =>
                write!(f, "ray epsilon must be finite and positive, got {}", eps),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Everything needed to set up an engine and drive its passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub max_depth: u32,
    /// Scales throughput before the roulette survival curve; larger values
    /// keep paths alive longer.
    pub survive_rate: Float,
    pub tonemap: Tonemap,
    pub passes: u32,
    pub light_paths: bool,
    /// Light lanes per light pass, 0 for one per pixel.
    pub light_lanes: usize,
    pub ray_epsilon: Float,
    /// Worker threads per wavefront step, 0 for all available cores.
    pub workers: usize,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            max_depth: 8,
            survive_rate: 1.0,
            tonemap: Tonemap::Filmic,
            passes: 16,
            light_paths: false,
            light_lanes: 0,
            ray_epsilon: EPSILON,
            workers: 0,
            seed: 0,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::ZeroResolution { width: self.width, height: self.height });
        }
        if !(self.ray_epsilon.is_finite() && self.ray_epsilon > 0.0) {
            return Err(SettingsError::InvalidRayEpsilon(self.ray_epsilon));
        }
        PassConfig::from(self).validate()
    }
}

/// Options for one call to `PathEngine::render`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassConfig {
    pub passes: u32,
    pub max_depth: u32,
    pub survive_rate: Float,
    pub light_paths: bool,
    pub show_progress: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        PassConfig::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for PassConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            passes: settings.passes,
            max_depth: settings.max_depth,
            survive_rate: settings.survive_rate,
            light_paths: settings.light_paths,
            show_progress: false,
        }
    }
}

impl PassConfig {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_pass(self.max_depth, self.survive_rate)
    }
}

/// Checks the per-pass transport options: at least one bounce and a finite,
/// positive survival rate.
pub fn validate_pass(max_depth: u32, survive_rate: Float) -> Result<(), SettingsError> {
    if max_depth < 1 {
        return Err(SettingsError::InvalidMaxDepth(max_depth));
    }
    if !(survive_rate.is_finite() && survive_rate > 0.0) {
        return Err(SettingsError::InvalidSurviveRate(survive_rate));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(RenderSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = RenderSettings::default();
        settings.width = 0;
        assert!(matches!(settings.validate(), Err(SettingsError::ZeroResolution { .. })));

        let mut settings = RenderSettings::default();
        settings.max_depth = 0;
        assert_eq!(settings.validate(), Err(SettingsError::InvalidMaxDepth(0)));

        let mut settings = RenderSettings::default();
        settings.survive_rate = 0.0;
        assert_eq!(settings.validate(), Err(SettingsError::InvalidSurviveRate(0.0)));

        let mut settings = RenderSettings::default();
        settings.ray_epsilon = -1.0;
        assert_eq!(settings.validate(), Err(SettingsError::InvalidRayEpsilon(-1.0)));
    }

    #[test]
    fn test_pass_config_from_settings() {
        let mut settings = RenderSettings::default();
        settings.max_depth = 3;
        settings.light_paths = true;
        let pass = PassConfig::from(&settings);
        assert_eq!(pass.max_depth, 3);
        assert!(pass.light_paths);
        assert!(!pass.show_progress);
    }
}
