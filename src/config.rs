// Tunables for both ambient effects. Exported to JS as plain value objects:
// `new FieldConfig()` gives the defaults and every field can be overwritten
// before handing it to `attach`.

use crate::error::RenderError;
use wasm_bindgen::prelude::*;

/// Connections are checked pairwise every frame, so the field stays small.
pub const MAX_PARTICLES: u32 = 5_000;
pub const MAX_FLAKES: u32 = 1_000;

#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub particle_count: u32,
    /// Connection reach in CSS pixels.
    pub max_distance: f64,
    pub particle_size: f64,
    /// Base drift speed in backing pixels per frame.
    pub speed: f64,
    pub z_range: f64,
    /// Attraction reach in CSS pixels.
    pub mouse_radius: f64,
    pub mouse_force: f64,
    pub mouse_influence: bool,
    pub damping: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: 100,
            max_distance: 150.0,
            particle_size: 2.0,
            speed: 0.3,
            z_range: 1000.0,
            mouse_radius: 200.0,
            mouse_force: 1.2,
            mouse_influence: true,
            damping: 0.98,
        }
    }
}

#[wasm_bindgen]
impl FieldConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FieldConfig {
        FieldConfig::default()
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        at_most("particle_count", self.particle_count, MAX_PARTICLES)?;
        positive("z_range", self.z_range)?;
        positive("max_distance", self.max_distance)?;
        positive("mouse_radius", self.mouse_radius)?;
        non_negative("particle_size", self.particle_size)?;
        non_negative("speed", self.speed)?;
        non_negative("mouse_force", self.mouse_force)?;
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(RenderError::InvalidConfig(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }

    /// Speed below which a velocity component gets nudged.
    pub fn stall_floor(&self) -> f64 {
        self.speed * 0.5
    }

    pub fn max_speed(&self) -> f64 {
        self.speed * 3.0
    }
}

#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnowConfig {
    pub flake_count: u32,
    pub refresh_interval_ms: f64,
    /// Share of the flakes regenerated on every refresh tick.
    pub refresh_fraction: f64,
    pub navigation_pause_ms: f64,
}

impl Default for SnowConfig {
    fn default() -> Self {
        SnowConfig {
            flake_count: 35,
            refresh_interval_ms: 5000.0,
            refresh_fraction: 0.2,
            navigation_pause_ms: 500.0,
        }
    }
}

#[wasm_bindgen]
impl SnowConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SnowConfig {
        SnowConfig::default()
    }
}

impl SnowConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        at_most("flake_count", self.flake_count, MAX_FLAKES)?;
        positive("refresh_interval_ms", self.refresh_interval_ms)?;
        non_negative("navigation_pause_ms", self.navigation_pause_ms)?;
        if !(0.0..=1.0).contains(&self.refresh_fraction) {
            return Err(RenderError::InvalidConfig(format!(
                "refresh_fraction must be in [0, 1], got {}",
                self.refresh_fraction
            )));
        }
        Ok(())
    }

    pub fn flakes_per_refresh(&self) -> usize {
        (self.flake_count as f64 * self.refresh_fraction).floor() as usize
    }
}

fn at_most(name: &str, value: u32, max: u32) -> Result<(), RenderError> {
    if value <= max {
        Ok(())
    } else {
        Err(RenderError::InvalidConfig(format!(
            "{} must be at most {}, got {}",
            name, max, value
        )))
    }
}

fn positive(name: &str, value: f64) -> Result<(), RenderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidConfig(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), RenderError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidConfig(format!(
            "{} must not be negative, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FieldConfig::default().validate().is_ok());
        assert!(SnowConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_runaway_damping() {
        let config = FieldConfig {
            damping: 1.5,
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_degenerate_depth() {
        let config = FieldConfig {
            z_range: 0.0,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FieldConfig {
            max_distance: f64::NAN,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_populations() {
        let at_limit = FieldConfig {
            particle_count: MAX_PARTICLES,
            ..FieldConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let huge = FieldConfig {
            particle_count: u32::MAX,
            ..FieldConfig::default()
        };
        assert!(matches!(huge.validate(), Err(RenderError::InvalidConfig(_))));

        let blizzard = SnowConfig {
            flake_count: MAX_FLAKES + 1,
            ..SnowConfig::default()
        };
        assert!(blizzard.validate().is_err());
    }

    #[test]
    fn refresh_batch_rounds_down() {
        assert_eq!(SnowConfig::default().flakes_per_refresh(), 7);
        let config = SnowConfig {
            flake_count: 4,
            ..SnowConfig::default()
        };
        assert_eq!(config.flakes_per_refresh(), 0);
    }
}
