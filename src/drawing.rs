//! Freehand drawings recorded on a canvas and replayed by the projector.
//!
//! A drawing is stored as the voltages the galvo drivers should see, one
//! `[x, y, laser_on]` triple per mouse event. A press starts a stroke with the
//! beam off, each drag sample extends it with the beam on.

use std::{path::Path, time::Duration};

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};

use crate::{
    color::{ColorSource, LaserColor},
    effect::Effect,
    geometry::{Point, Trace},
    laser::MAX_POINTS_PER_FRAME,
};

/// Canvas pixels per volt of galvo drive
pub const PIXELS_PER_VOLT: f32 = 100.0;
/// Drive voltage at the far edge of the field
pub const FULL_SCALE_VOLTS: f32 = 5.0;

/// Colour used when the drawing is played without a laser colour
pub const DRAWING_COLOR: LaserColor = LaserColor::WHITE;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample(pub f32, pub f32, pub bool);

impl Sample {
    pub fn x_volts(&self) -> f32 {
        self.0
    }

    pub fn y_volts(&self) -> f32 {
        self.1
    }

    pub fn laser_on(&self) -> bool {
        self.2
    }

    /// Position in the drawing field. Canvas Y grows downwards, the field's
    /// grows upwards.
    pub fn to_point(&self) -> Point {
        let half = FULL_SCALE_VOLTS / 2.0;
        Point::new(self.0 / half - 1.0, 1.0 - self.1 / half)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drawing {
    samples: Vec<Sample>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading drawing {}", path.display()))?;
        Drawing::from_json(&contents).with_context(|| format!("parsing drawing {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mouse pressed at a canvas position: start a new stroke
    pub fn press(&mut self, x_px: f32, y_px: f32) {
        self.samples
            .push(Sample(x_px / PIXELS_PER_VOLT, y_px / PIXELS_PER_VOLT, false));
    }

    /// Mouse dragged to a canvas position: continue the current stroke
    pub fn drag(&mut self, x_px: f32, y_px: f32) {
        self.samples
            .push(Sample(x_px / PIXELS_PER_VOLT, y_px / PIXELS_PER_VOLT, true));
    }
}

impl Effect for Drawing {
    fn trace(&self, _elapsed: Duration, colors: ColorSource) -> Trace {
        if self.samples.is_empty() {
            return Trace::parked(Point::CENTER);
        }

        let color = colors.pick(DRAWING_COLOR);
        let mut trace = Trace::new();
        for sample in &self.samples {
            if sample.laser_on() {
                trace.push(sample.to_point(), color);
            } else {
                trace.move_to(sample.to_point());
            }
        }

        // Long recordings are thinned to fit a single frame
        trace.resampled(MAX_POINTS_PER_FRAME)
    }
}
