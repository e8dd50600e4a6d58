use serde::{Deserialize, Serialize};

/// Intensity of each laser diode. Full scale is 255 on every channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaserColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LaserColor {
    pub const OFF: LaserColor = LaserColor::new(0, 0, 0);
    pub const WHITE: LaserColor = LaserColor::new(255, 255, 255);
    pub const RED: LaserColor = LaserColor::new(255, 0, 0);
    pub const GREEN: LaserColor = LaserColor::new(0, 255, 0);
    pub const BLUE: LaserColor = LaserColor::new(0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a colour from a packed `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            red: (hex >> 16) as u8,
            green: (hex >> 8) as u8,
            blue: hex as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    pub const fn is_off(self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

/// How the laser colour evolves while duration effects run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Hold whatever colour was last set
    #[default]
    Static,
    /// Walk the hue wheel
    FullSpectrum,
    /// Jump between random hues
    Rave,
    Halloween,
    BoilerRoom,
}

impl ColorMode {
    pub const ALL: [ColorMode; 5] = [
        ColorMode::Static,
        ColorMode::FullSpectrum,
        ColorMode::Rave,
        ColorMode::Halloween,
        ColorMode::BoilerRoom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ColorMode::Static => "static",
            ColorMode::FullSpectrum => "full_spectrum",
            ColorMode::Rave => "rave",
            ColorMode::Halloween => "halloween",
            ColorMode::BoilerRoom => "boiler_room",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == s)
    }
}
