use std::time::Duration;

use super::Effect;
use crate::{
    color::ColorSource,
    geometry::{Point, Trace},
};

/// Reserved slot. Keeps the beam off and parked in the middle of the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkEffect;

impl Effect for DarkEffect {
    fn trace(&self, _elapsed: Duration, _colors: ColorSource) -> Trace {
        Trace::parked(Point::CENTER)
    }
}
