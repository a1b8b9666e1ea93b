//! Engine configuration.

use crate::camera::{ZOOM_MAX, ZOOM_MIN};
use crate::error::{CoreError, CoreResult};
use crate::geometry::PICK_TOLERANCE;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::input::ModifierKey;
use crate::shapes::ShapeColor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable behavior of an [`Engine`](crate::Engine).
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of undo snapshots.
    pub history_capacity: usize,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Hit-test tolerance in screen pixels.
    pub pick_tolerance: f64,
    /// Zoom factor per wheel pixel: `factor = exp(-delta_y * sensitivity)`.
    pub wheel_zoom_sensitivity: f64,
    pub double_tap_window_ms: u64,
    /// Maximum screen distance between the two taps of a double-tap.
    pub double_tap_distance: f64,
    /// Whether a double-tap with the draw tool clears the canvas.
    pub double_tap_clears: bool,
    /// Held with the primary button to pan instead of draw/select.
    pub pan_modifier: ModifierKey,
    /// Held during wheel events to zoom instead of pan.
    pub zoom_modifier: ModifierKey,
    pub default_brush_size: f64,
    /// Brush color at startup; a random color when unset.
    pub initial_color: Option<ShapeColor>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            pick_tolerance: PICK_TOLERANCE,
            wheel_zoom_sensitivity: 0.01,
            double_tap_window_ms: 300,
            double_tap_distance: 10.0,
            double_tap_clears: true,
            pan_modifier: ModifierKey::Alt,
            zoom_modifier: ModifierKey::Ctrl,
            default_brush_size: 2.0,
            initial_color: None,
        }
    }
}

impl EngineConfig {
    /// Load from JSON and validate.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |msg: String| Err(CoreError::InvalidConfig(msg));

        if self.history_capacity == 0 {
            return invalid("history_capacity must be at least 1".into());
        }
        if !(self.zoom_min.is_finite() && self.zoom_min > 0.0) {
            return invalid(format!("zoom_min must be positive, got {}", self.zoom_min));
        }
        if !self.zoom_max.is_finite() || self.zoom_max < self.zoom_min {
            return invalid(format!(
                "zoom_max ({}) must be finite and >= zoom_min ({})",
                self.zoom_max, self.zoom_min
            ));
        }
        if !(self.pick_tolerance.is_finite() && self.pick_tolerance >= 0.0) {
            return invalid(format!("pick_tolerance must be >= 0, got {}", self.pick_tolerance));
        }
        if !self.wheel_zoom_sensitivity.is_finite() {
            return invalid("wheel_zoom_sensitivity must be finite".into());
        }
        if !(self.double_tap_distance.is_finite() && self.double_tap_distance >= 0.0) {
            return invalid(format!(
                "double_tap_distance must be >= 0, got {}",
                self.double_tap_distance
            ));
        }
        if !(self.default_brush_size.is_finite() && self.default_brush_size > 0.0) {
            return invalid(format!(
                "default_brush_size must be positive, got {}",
                self.default_brush_size
            ));
        }
        Ok(())
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.double_tap_window(), Duration::from_millis(300));
        assert_eq!(config.pan_modifier, ModifierKey::Alt);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(
            r##"{"history_capacity": 5, "zoom_modifier": "meta", "initial_color": {"r": 1, "g": 2, "b": 3, "a": 255}}"##,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.zoom_modifier, ModifierKey::Meta);
        assert_eq!(config.initial_color, Some(ShapeColor::rgb(1, 2, 3)));
        assert!((config.zoom_max - ZOOM_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig {
            double_tap_clears: false,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"history_capacity": 0}"#),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"zoom_min": 5.0, "zoom_max": 2.0}"#),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"default_brush_size": 0}"#),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(CoreError::Json(_))
        ));
    }
}
