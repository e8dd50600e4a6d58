use std::{f32::consts::TAU, time::Duration};

use super::Effect;
use crate::{
    color::{ColorSource, LaserColor},
    geometry::{Point, Trace},
};

const HEART_POINTS: usize = 200;

// The raw curve spans x in -16..=16 and y in -17..=12
const CURVE_SCALE: f32 = 1.0 / 18.0;

pub const HEART_COLOR: LaserColor = LaserColor::RED;

/// A beating heart outline
#[derive(Debug, Clone)]
pub struct HeartEffect {
    /// Beats per second
    pub rate: f32,
    /// Smallest scale reached during a beat, the largest is always 1.0
    pub min_scale: f32,
}

impl Default for HeartEffect {
    fn default() -> Self {
        Self {
            rate: 1.0,
            min_scale: 0.85,
        }
    }
}

impl HeartEffect {
    fn scale(&self, elapsed: Duration) -> f32 {
        let mid = (1.0 + self.min_scale) / 2.0;
        let swing = (1.0 - self.min_scale) / 2.0;
        mid + swing * (TAU * self.rate * elapsed.as_secs_f32()).sin()
    }
}

/// Point on the classic heart curve, `t` in radians
pub fn heart_curve(t: f32) -> Point {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Point::new(x, y).scale(CURVE_SCALE)
}

impl Effect for HeartEffect {
    fn trace(&self, elapsed: Duration, colors: ColorSource) -> Trace {
        let scale = self.scale(elapsed);
        let color = colors.pick(HEART_COLOR);

        let mut trace = Trace::new();
        trace.move_to(heart_curve(0.0).scale(scale));
        for i in 1..=HEART_POINTS {
            let t = TAU * i as f32 / HEART_POINTS as f32;
            trace.push(heart_curve(t).scale(scale), color);
        }

        trace
    }
}
