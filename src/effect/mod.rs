//! The twenty effect slots.
//!
//! An effect only describes where the beam goes. Timing, colour state and
//! the hardware all live in the controller.

mod dark;
mod heart;
mod square;

use std::time::Duration;

pub use common::effect::{EffectId, EFFECT_COUNT};
pub use dark::DarkEffect;
pub use heart::HeartEffect;
pub use square::SquareEffect;

use crate::{color::ColorSource, geometry::Trace};

/// How long the fixed-signature effects run for
pub const FIXED_EFFECT_DURATION: Duration = Duration::from_secs(5);

pub trait Effect {
    /// Build the frame to show `elapsed` into the effect
    fn trace(&self, elapsed: Duration, colors: ColorSource) -> Trace;
}

/// Effect slot - enum holding whichever effect an id maps to
#[derive(Debug, Clone)]
pub enum EffectSlot {
    Square(SquareEffect),
    Heart(HeartEffect),
    Dark(DarkEffect),
}

impl EffectSlot {
    pub fn from_id(id: EffectId) -> Self {
        match id {
            EffectId::Square => EffectSlot::Square(SquareEffect::default()),
            EffectId::Heart => EffectSlot::Heart(HeartEffect::default()),
            _ => EffectSlot::Dark(DarkEffect),
        }
    }
}

impl Effect for EffectSlot {
    fn trace(&self, elapsed: Duration, colors: ColorSource) -> Trace {
        match self {
            EffectSlot::Square(effect) => effect.trace(elapsed, colors),
            EffectSlot::Heart(effect) => effect.trace(elapsed, colors),
            EffectSlot::Dark(effect) => effect.trace(elapsed, colors),
        }
    }
}
