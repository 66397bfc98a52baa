//! Tunable constants for the particle field.
//!
//! [`FieldConfig::default`] reproduces the portfolio background exactly. A
//! host can override any subset of the fields from JSON; missing keys keep
//! their defaults:
//!
//! ```json
//! {
//!   "density": 8000.0,
//!   "link_distance": 120.0,
//!   "hue_range": [180.0, 240.0],
//!   "max_speed": 1.5
//! }
//! ```

use serde::Deserialize;

/// Smallest canvas area, in square pixels, a single particle may stand for.
pub const MIN_DENSITY: f64 = 1.0;
/// Smallest link distance and pointer radius, in pixels.
pub const MIN_DISTANCE: f64 = 1.0;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Canvas area covered by one particle; count is `floor(w * h / density)`
    pub density: f64,
    /// Each velocity component is `(r - 0.5) * velocity_spread` for `r` in [0, 1)
    pub velocity_spread: f64,
    pub radius_range: (f64, f64),
    pub opacity_range: (f64, f64),
    pub hue_range: (f64, f64),
    pub saturation: f64,
    pub lightness: f64,

    pub link_distance: f64,
    pub link_alpha: f64,
    /// RRGGBBAA
    pub link_color: u32,
    pub link_width: f64,

    pub pointer_radius: f64,
    pub pointer_strength: f64,
    /// Upper bound on particle speed after a pointer nudge. `None` leaves the
    /// nudge unclamped, so speed keeps growing while the pointer hovers.
    pub max_speed: Option<f64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            density: 10_000.0,
            velocity_spread: 0.5,
            radius_range: (1.0, 3.0),
            opacity_range: (0.2, 0.7),
            hue_range: (200.0, 260.0),
            saturation: 70.0,
            lightness: 60.0,
            link_distance: 100.0,
            link_alpha: 0.1,
            link_color: 0x3b82f6ff,
            link_width: 1.0,
            pointer_radius: 100.0,
            pointer_strength: 0.00005,
            max_speed: None,
        }
    }
}

impl FieldConfig {
    pub fn from_json(json: &str) -> Result<FieldConfig, String> {
        let config: FieldConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid field config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    // Ranges are sampled half-open, so an empty range would panic inside rand
    pub fn validate(&self) -> Result<(), String> {
        if !(self.density.is_finite() && self.density >= MIN_DENSITY) {
            return Err(format!(
                "density must be finite and at least {}, got {}",
                MIN_DENSITY, self.density
            ));
        }
        for (name, distance) in &[
            ("link_distance", self.link_distance),
            ("pointer_radius", self.pointer_radius),
        ] {
            if !(distance.is_finite() && *distance >= MIN_DISTANCE) {
                return Err(format!(
                    "{} must be finite and at least {}, got {}",
                    name, MIN_DISTANCE, distance
                ));
            }
        }
        for (name, (lo, hi)) in &[
            ("radius_range", self.radius_range),
            ("opacity_range", self.opacity_range),
            ("hue_range", self.hue_range),
        ] {
            if !(lo < hi) {
                return Err(format!("{} must satisfy min < max, got ({}, {})", name, lo, hi));
            }
        }
        if let Some(max_speed) = self.max_speed {
            if !(max_speed >= 0.0) {
                return Err(format!("max_speed must be non-negative, got {}", max_speed));
            }
        }
        Ok(())
    }
}
