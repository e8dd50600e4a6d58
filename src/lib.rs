use std::time::Duration;

use color::{ColorMode, LaserColor};
use drawing::Drawing;
use effect::EffectId;

pub mod color;
pub mod config;
pub mod drawing;
pub mod effect;
pub mod geometry;
pub mod laser;
pub mod pins;
pub mod show;
pub mod sink;
pub mod structure;

pub mod prelude {
    pub use crate::{
        color::{ColorMode, ColorSource, LaserColor},
        config::Config,
        drawing::Drawing,
        effect::{Effect, EffectId, EffectSlot},
        laser::{FrameSendPack, LaserController, MessageSendPack},
        pins::PinAssignment,
        show::prelude::*,
        sink::{LaserSink, LogSink, RecordingSink, UartSink},
        InternalMessage,
    };
}

/// Requests for the laser controller, handled one at a time in the order
/// they were sent
#[derive(Clone, Debug)]
pub enum InternalMessage {
    /// Run an effect. Without a duration it uses its fixed timing and
    /// predefined colours.
    Effect {
        id: EffectId,
        duration: Option<Duration>,
    },
    /// Replay a recorded drawing in the laser colour
    Drawing { drawing: Drawing, duration: Duration },
    /// Set the laser colour, or go back to the default with `None`
    SetColor(Option<LaserColor>),
    SetColorMode(ColorMode),
    /// Blank the beam at the centre
    Blank,
}
