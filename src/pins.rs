use std::fmt::Display;

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

/// DAC channel 1 drives GPIO25
pub const DAC1_CHANNEL: u8 = 0;
/// DAC channel 2 drives GPIO26
pub const DAC2_CHANNEL: u8 = 1;

pub const DAC1_GPIO: u8 = 25;
pub const DAC2_GPIO: u8 = 26;

pub const X_GALVO_PIN: u8 = DAC1_GPIO;
pub const Y_GALVO_PIN: u8 = DAC2_GPIO;
pub const RED_LASER_PIN: u8 = 27;
pub const GREEN_LASER_PIN: u8 = 14;
pub const BLUE_LASER_PIN: u8 = 12;

// GPIO34 and up are input only on the ESP32
const MAX_OUTPUT_GPIO: u8 = 33;

/// One of the two 8-bit DAC outputs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DacChannel {
    Dac1,
    Dac2,
}

impl DacChannel {
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            DAC1_GPIO => Some(DacChannel::Dac1),
            DAC2_GPIO => Some(DacChannel::Dac2),
            _ => None,
        }
    }

    pub const fn channel(self) -> u8 {
        match self {
            DacChannel::Dac1 => DAC1_CHANNEL,
            DacChannel::Dac2 => DAC2_CHANNEL,
        }
    }

    pub const fn gpio(self) -> u8 {
        match self {
            DacChannel::Dac1 => DAC1_GPIO,
            DacChannel::Dac2 => DAC2_GPIO,
        }
    }
}

/// Where each laser diode and galvo is wired. The controller takes this by
/// value and never hands out a mutable reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PinAssignment {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub x_galvo: u8,
    pub y_galvo: u8,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            red: RED_LASER_PIN,
            green: GREEN_LASER_PIN,
            blue: BLUE_LASER_PIN,
            x_galvo: X_GALVO_PIN,
            y_galvo: Y_GALVO_PIN,
        }
    }
}

impl PinAssignment {
    pub fn validate(&self) -> Result<(), Error> {
        let (x, y) = match (
            DacChannel::from_gpio(self.x_galvo),
            DacChannel::from_gpio(self.y_galvo),
        ) {
            (Some(x), Some(y)) => (x, y),
            _ => bail!(
                "galvo pins must be the DAC outputs GPIO{} and GPIO{}, got X={} Y={}",
                DAC1_GPIO,
                DAC2_GPIO,
                self.x_galvo,
                self.y_galvo
            ),
        };
        if x == y {
            bail!("X and Y galvo share DAC pin GPIO{}", x.gpio());
        }

        let lasers = [("red", self.red), ("green", self.green), ("blue", self.blue)];
        for (i, (name, pin)) in lasers.iter().enumerate() {
            if *pin > MAX_OUTPUT_GPIO {
                bail!("{} laser pin GPIO{} cannot drive an output", name, pin);
            }
            if *pin == self.x_galvo || *pin == self.y_galvo {
                bail!("{} laser pin GPIO{} is already used by a galvo", name, pin);
            }
            if let Some((other, _)) = lasers[..i].iter().find(|(_, p)| p == pin) {
                bail!("{} and {} lasers share pin GPIO{}", other, name, pin);
            }
        }

        Ok(())
    }

    pub fn x_channel(&self) -> Option<DacChannel> {
        DacChannel::from_gpio(self.x_galvo)
    }

    pub fn y_channel(&self) -> Option<DacChannel> {
        DacChannel::from_gpio(self.y_galvo)
    }
}

impl Display for PinAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "R=GPIO{} G=GPIO{} B=GPIO{} X=GPIO{} Y=GPIO{}",
            self.red, self.green, self.blue, self.x_galvo, self.y_galvo
        )
    }
}
