use crate::blur;
use crate::color::{self, Color, ColorSpec};
use crate::geometry;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything that shapes how a radial button looks and animates.
///
/// Sizes are in surface units, angles in degrees, durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub start_angle: f64,
    pub end_angle: f64,
    pub button_gap: f64,
    pub main_button_size: f64,
    pub sub_button_size: f64,
    /// Shadow size; the widget reserves twice this around the primary button.
    pub elevation: f64,
    pub main_text_size: f64,
    pub sub_text_size: f64,
    pub main_text_color: ColorSpec,
    pub sub_text_color: ColorSpec,
    pub expand_duration_ms: u64,
    pub rotate_duration_ms: u64,
    pub rotate_degrees: f64,
    pub mask_color: ColorSpec,
    pub selection_mode: bool,
    pub ripple: bool,
    pub ripple_color: Option<ColorSpec>,
    pub blur_background: bool,
    pub blur_radius: f64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            start_angle: 90.0,
            end_angle: 90.0,
            button_gap: 25.0,
            main_button_size: 60.0,
            sub_button_size: 60.0,
            elevation: 4.0,
            main_text_size: 20.0,
            sub_text_size: 20.0,
            main_text_color: color::BLACK.into(),
            sub_text_color: color::BLACK.into(),
            expand_duration_ms: 225,
            rotate_duration_ms: 300,
            rotate_degrees: 0.0,
            mask_color: color::TRANSPARENT.into(),
            selection_mode: false,
            ripple: true,
            ripple_color: None,
            blur_background: false,
            blur_radius: blur::DEFAULT_BLUR_RADIUS,
        }
    }
}

impl WidgetConfig {
    /// Layout used by board nodes: sub-buttons fan out left and right, close in.
    pub fn node() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 180.0,
            button_gap: 5.0,
            ..Self::default()
        }
    }

    pub fn expand_duration(&self) -> Duration {
        Duration::from_millis(self.expand_duration_ms)
    }

    pub fn rotate_duration(&self) -> Duration {
        Duration::from_millis(self.rotate_duration_ms)
    }

    pub fn ripple_duration(&self) -> Duration {
        self.expand_duration().mul_f64(0.9)
    }

    pub fn has_rotation(&self) -> bool {
        self.rotate_degrees != 0.0
    }

    pub fn side_margin(&self) -> f64 {
        self.elevation * 2.0
    }

    /// Width and height the widget asks for when collapsed.
    pub fn desired_size(&self) -> f64 {
        self.main_button_size + self.side_margin() * 2.0
    }

    pub fn expansion_radius(&self) -> f64 {
        geometry::expansion_radius(
            self.main_button_size,
            self.sub_button_size,
            self.button_gap,
        )
    }

    pub fn blur_radius(&self) -> f64 {
        blur::clamp_radius(self.blur_radius)
    }

    pub fn ripple_color(&self) -> Option<Color> {
        self.ripple_color.map(Color::from)
    }

    /// Presses closer together than this are treated as accidental repeats.
    pub fn repeat_threshold(&self) -> Duration {
        if self.has_rotation() {
            self.expand_duration().max(self.rotate_duration())
        } else {
            self.expand_duration()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: WidgetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.desired_size(), 76.0);
        assert_eq!(config.expansion_radius(), 85.0);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let json = r##"{
            "start_angle": 0,
            "end_angle": 180,
            "ripple_color": "#ff000080",
            "blur_radius": 90
        }"##;
        let config: WidgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.end_angle, 180.0);
        assert_eq!(config.ripple_color().unwrap().red, 1.0);
        assert_eq!(config.blur_radius(), blur::DEFAULT_BLUR_RADIUS);
        assert_eq!(config.sub_button_size, 60.0);
    }

    #[test]
    fn bad_color_is_rejected() {
        let result: Result<WidgetConfig, _> = serde_json::from_str(r#"{"mask_color": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn repeat_threshold_includes_rotation_only_when_configured() {
        let mut config = WidgetConfig::default();
        assert_eq!(config.repeat_threshold(), Duration::from_millis(225));
        config.rotate_degrees = 45.0;
        assert_eq!(config.repeat_threshold(), Duration::from_millis(300));
    }
}
