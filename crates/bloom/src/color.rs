use crate::error::ConfigurationError;
use palette::encoding;
use palette::{FromColor, Hsv, Srgb, Srgba};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

pub type Color = Srgba<f64>;

pub const WHITE: Color = Srgba::new(1.0, 1.0, 1.0, 1.0);
pub const BLACK: Color = Srgba::new(0.0, 0.0, 0.0, 1.0);
pub const TRANSPARENT: Color = Srgba::new(0.0, 0.0, 0.0, 0.0);

const LIGHTER_FACTOR: f64 = 1.1;
const DARKER_FACTOR: f64 = 0.9;

fn scale_value(color: Color, factor: f64) -> Color {
    let mut hsv: Hsv<encoding::Srgb, f64> = Hsv::from_color(color.color);
    hsv.value = (hsv.value * factor).clamp(0.0, 1.0);
    let rgb: Srgb<f64> = Srgb::from_color(hsv);
    Srgba::new(rgb.red, rgb.green, rgb.blue, color.alpha)
}

pub fn lighter(color: Color) -> Color {
    scale_value(color, LIGHTER_FACTOR)
}

pub fn darker(color: Color) -> Color {
    scale_value(color, DARKER_FACTOR)
}

/// Background used while a button is held down.
pub fn pressed(color: Color) -> Color {
    darker(color)
}

/// Compares colors at 8 bits per channel, the precision they are painted at.
pub fn same_on_screen(a: Color, b: Color) -> bool {
    a.into_format::<u8, u8>() == b.into_format::<u8, u8>()
}

/// Picks a ripple tint that stays visible on `background`.
///
/// Already-bright colors cannot get lighter, so they get darker instead.
pub fn ripple_tint(background: Color) -> Color {
    let light = lighter(background);
    if same_on_screen(light, background) {
        darker(background)
    } else {
        light
    }
}

pub fn with_alpha(color: Color, alpha: f64) -> Color {
    Srgba::new(color.red, color.green, color.blue, alpha)
}

/// A color written as `#rrggbb` or `#rrggbbaa` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct ColorSpec(pub Color);

impl From<ColorSpec> for Color {
    fn from(spec: ColorSpec) -> Self {
        spec.0
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self(color)
    }
}

impl FromStr for ColorSpec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| invalid())
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };

        Ok(Self(Srgba::new(channel(0)?, channel(2)?, channel(4)?, alpha)))
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0.into_format::<u8, u8>();
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            c.red, c.green, c.blue, c.alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_ripple_goes_darker() {
        let tint = ripple_tint(WHITE);
        assert!(same_on_screen(tint, darker(WHITE)));
        assert!(tint.red < 1.0);
    }

    #[test]
    fn mid_gray_ripple_goes_lighter() {
        let gray = Srgba::new(0.5, 0.5, 0.5, 1.0);
        let tint = ripple_tint(gray);
        assert!(tint.red > gray.red);
    }

    #[test]
    fn pressed_keeps_alpha() {
        let c = Srgba::new(0.2, 0.4, 0.6, 0.5);
        assert_eq!(pressed(c).alpha, 0.5);
        assert!(pressed(c).blue < c.blue);
    }

    #[test]
    fn parses_hex_with_and_without_alpha() {
        let opaque: ColorSpec = "#ff0000".parse().unwrap();
        assert_eq!(opaque.0, Srgba::new(1.0, 0.0, 0.0, 1.0));

        let faded: ColorSpec = "00ff0080".parse().unwrap();
        assert_eq!(faded.0.green, 1.0);
        assert!((faded.0.alpha - 128.0 / 255.0).abs() < 1e-9);

        assert!("#12345".parse::<ColorSpec>().is_err());
        assert!("#gg0000".parse::<ColorSpec>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let spec: ColorSpec = "#336699cc".parse().unwrap();
        assert_eq!(spec.to_string(), "#336699cc");
    }
}
