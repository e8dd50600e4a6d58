//! Laser colour state and colour maths.
//!
//! The controller owns exactly one [`ColorState`]. Effects never reach for it
//! directly; they are handed a [`ColorSource`] for each frame instead.

mod cycler;

use anyhow::{bail, Error};

pub use common::color::{ColorMode, LaserColor};
pub use cycler::{ColorCycler, COLOR_FADE, FADE_STEPS};

/// Which colours an effect should draw with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSource {
    /// The colours baked into the effect itself
    Predefined,
    /// Everything lit is drawn in this colour
    Laser(LaserColor),
}

impl ColorSource {
    /// Resolve a colour, using `predefined` when the effect owns its palette
    pub fn pick(self, predefined: LaserColor) -> LaserColor {
        match self {
            ColorSource::Predefined => predefined,
            ColorSource::Laser(color) => color,
        }
    }
}

#[derive(Debug)]
pub struct ColorState {
    current: LaserColor,
    default: LaserColor,
    cycler: Option<ColorCycler>,
}

impl ColorState {
    pub fn new(default: LaserColor) -> Self {
        Self {
            current: default,
            default,
            cycler: None,
        }
    }

    /// Go back to the configured default colour
    pub fn set_laser_color(&mut self) {
        self.set(self.default);
    }

    pub fn set_laser_color_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.set(LaserColor::new(red, green, blue));
    }

    pub fn set(&mut self, color: LaserColor) {
        self.current = color;
        self.cycler = None;
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.cycler = match mode {
            ColorMode::Static => None,
            mode => Some(ColorCycler::new(mode, self.current)),
        };
    }

    pub fn color_mode(&self) -> ColorMode {
        self.cycler
            .as_ref()
            .map(ColorCycler::mode)
            .unwrap_or(ColorMode::Static)
    }

    pub fn laser_color(&self) -> LaserColor {
        self.current
    }

    /// Colour for the frame about to be drawn. With a colour mode running this
    /// advances the fade and remembers where it got to.
    pub fn frame_color(&mut self) -> LaserColor {
        if let Some(cycler) = self.cycler.as_mut() {
            self.current = cycler.color_now();
        }
        self.current
    }
}

/// Parse `RRGGBB`, with or without a leading `#`
pub fn parse_hex(s: &str) -> Result<LaserColor, Error> {
    let digits = s.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("expected a colour like ff8000, got {:?}", s);
    }

    Ok(LaserColor::from_hex(u32::from_str_radix(digits, 16)?))
}

/// Convert a hue in degrees plus 8-bit saturation and value to a colour
pub fn hsv_to_rgb(hue: u16, saturation: u8, value: u8) -> LaserColor {
    let h = (hue % 360) as f32;
    let s = saturation as f32 / 255.0;
    let v = value as f32 / 255.0;

    let sector = (h / 60.0) as u8 % 6;
    let f = h / 60.0 - (h / 60.0).floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    LaserColor::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Linear blend between two colours, `t` clamped to `0.0..=1.0`
pub fn interpolate(from: LaserColor, to: LaserColor, t: f32) -> LaserColor {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;

    LaserColor::new(
        channel(from.red, to.red),
        channel(from.green, to.green),
        channel(from.blue, to.blue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_laser_color() {
        let mut state = ColorState::new(LaserColor::WHITE);
        assert_eq!(state.laser_color(), LaserColor::WHITE);

        state.set_laser_color_rgb(10, 20, 30);
        assert_eq!(state.laser_color(), LaserColor::new(10, 20, 30));

        state.set_laser_color();
        assert_eq!(state.laser_color(), LaserColor::WHITE);
    }

    #[test]
    fn test_setting_color_stops_mode() {
        let mut state = ColorState::new(LaserColor::BLUE);
        state.set_color_mode(ColorMode::Rave);
        assert_eq!(state.color_mode(), ColorMode::Rave);

        state.set_laser_color_rgb(1, 2, 3);
        assert_eq!(state.color_mode(), ColorMode::Static);
        assert_eq!(state.frame_color(), LaserColor::new(1, 2, 3));

        state.set_color_mode(ColorMode::Halloween);
        state.set_color_mode(ColorMode::Static);
        assert_eq!(state.color_mode(), ColorMode::Static);
    }

    #[test]
    fn test_color_source() {
        assert_eq!(
            ColorSource::Predefined.pick(LaserColor::RED),
            LaserColor::RED
        );
        assert_eq!(
            ColorSource::Laser(LaserColor::GREEN).pick(LaserColor::RED),
            LaserColor::GREEN
        );
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("ff8000").unwrap(), LaserColor::new(255, 128, 0));
        assert_eq!(parse_hex("#0000FF").unwrap(), LaserColor::BLUE);
        assert!(parse_hex("fff").is_err());
        assert!(parse_hex("zz0000").is_err());
        assert!(parse_hex("+12345").is_err());
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0, 255, 255), LaserColor::RED);
        assert_eq!(hsv_to_rgb(60, 255, 255), LaserColor::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(120, 255, 255), LaserColor::GREEN);
        assert_eq!(hsv_to_rgb(240, 255, 255), LaserColor::BLUE);
        assert_eq!(hsv_to_rgb(360, 255, 255), LaserColor::RED);
        assert_eq!(hsv_to_rgb(200, 0, 255), LaserColor::WHITE);
        assert_eq!(hsv_to_rgb(200, 255, 0), LaserColor::OFF);
    }

    #[test]
    fn test_interpolate() {
        let from = LaserColor::OFF;
        let to = LaserColor::new(255, 100, 0);

        assert_eq!(interpolate(from, to, 0.0), from);
        assert_eq!(interpolate(from, to, 1.0), to);
        assert_eq!(interpolate(from, to, 0.5), LaserColor::new(127, 50, 0));
        assert_eq!(interpolate(to, from, 0.5), LaserColor::new(127, 50, 0));
        assert_eq!(interpolate(from, to, 4.0), to);
    }
}
