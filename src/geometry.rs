//! Normalised drawing coordinates and the traces effects are built from.
//!
//! The field runs from -1.0 to 1.0 on both axes, centre at the origin. It only
//! becomes DAC codes when a frame is packed.

use common::color::LaserColor;

/// Dark samples spent at the end of every blank move so the galvos settle
/// before the beam comes back on
pub const BLANK_DWELL: usize = 4;

pub const DAC_CENTER: u8 = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const CENTER: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn to_dac(self) -> (u8, u8) {
        (to_dac(self.x), to_dac(self.y))
    }
}

/// Map a normalised coordinate to an 8-bit DAC code, clamping anything
/// outside the field to its edge
pub fn to_dac(value: f32) -> u8 {
    ((value.clamp(-1.0, 1.0) + 1.0) * 0.5 * 255.0).round() as u8
}

/// A single sample of the beam. An `OFF` colour means the beam is blanked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracePoint {
    pub point: Point,
    pub color: LaserColor,
}

impl TracePoint {
    pub fn is_blank(&self) -> bool {
        self.color.is_off()
    }
}

/// The ordered path the beam follows during one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    points: Vec<TracePoint>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trace that only parks the dark beam at `point`
    pub fn parked(point: Point) -> Self {
        let mut trace = Self::new();
        trace.push(point, LaserColor::OFF);
        trace
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().map(|p| p.point)
    }

    pub fn push(&mut self, point: Point, color: LaserColor) {
        self.points.push(TracePoint { point, color });
    }

    /// Jump to `point` with the beam off
    pub fn move_to(&mut self, point: Point) {
        for _ in 0..BLANK_DWELL {
            self.push(point, LaserColor::OFF);
        }
    }

    /// Draw a straight lit line from the current position to `point` in
    /// `steps` samples. The end point is included, the start point is not.
    pub fn line_to(&mut self, point: Point, color: LaserColor, steps: usize) {
        let start = self.last_point().unwrap_or(point);
        let steps = steps.max(1);

        for i in 1..=steps {
            self.push(start.lerp(point, i as f32 / steps as f32), color);
        }
    }

    pub fn lit_points(&self) -> impl Iterator<Item = &TracePoint> {
        self.points.iter().filter(|p| !p.is_blank())
    }

    /// Thin the trace to at most `max` evenly spaced points, always keeping
    /// the first and last
    pub fn resampled(self, max: usize) -> Trace {
        let len = self.points.len();
        if len <= max {
            return self;
        }
        if max < 2 {
            return Trace {
                points: self.points.into_iter().take(max).collect(),
            };
        }

        Trace {
            points: (0..max)
                .map(|i| self.points[i * (len - 1) / (max - 1)])
                .collect(),
        }
    }
}
