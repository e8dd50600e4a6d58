use std::{f32::consts::TAU, time::Duration};

use super::Effect;
use crate::{
    color::{ColorSource, LaserColor},
    geometry::{Point, Trace},
};

/// Samples along each side
const SIDE_POINTS: usize = 40;

/// Side colours when drawn with the predefined palette, in drawing order
pub const SQUARE_COLORS: [LaserColor; 4] = [
    LaserColor::RED,
    LaserColor::GREEN,
    LaserColor::BLUE,
    LaserColor::WHITE,
];

/// A square outline turning slowly around the centre
#[derive(Debug, Clone)]
pub struct SquareEffect {
    /// Half the side length. Corners stay inside the field at any angle as
    /// long as this is at most `1 / sqrt(2)`.
    pub half_extent: f32,
    /// Time for one full turn
    pub period: Duration,
}

impl Default for SquareEffect {
    fn default() -> Self {
        Self {
            half_extent: 0.7,
            period: Duration::from_secs(8),
        }
    }
}

impl SquareEffect {
    fn angle(&self, elapsed: Duration) -> f32 {
        if self.period.is_zero() {
            return 0.0;
        }
        let turns = elapsed.as_secs_f32() / self.period.as_secs_f32();
        turns.fract() * TAU
    }
}

impl Effect for SquareEffect {
    fn trace(&self, elapsed: Duration, colors: ColorSource) -> Trace {
        let h = self.half_extent;
        let angle = self.angle(elapsed);
        let corners = [
            Point::new(-h, -h),
            Point::new(h, -h),
            Point::new(h, h),
            Point::new(-h, h),
        ]
        .map(|corner| corner.rotate(angle));

        let mut trace = Trace::new();
        trace.move_to(corners[0]);
        for (side, color) in SQUARE_COLORS.iter().enumerate() {
            trace.line_to(corners[(side + 1) % 4], colors.pick(*color), SIDE_POINTS);
        }

        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BLANK_DWELL;

    #[test]
    fn test_square_outline() {
        let trace = SquareEffect::default().trace(Duration::ZERO, ColorSource::Predefined);

        assert_eq!(trace.len(), BLANK_DWELL + 4 * SIDE_POINTS);
        // Closed outline ends back on the first corner
        assert_eq!(trace.last_point(), Some(Point::new(-0.7, -0.7)));

        // Each side is drawn in its own colour
        let lit: Vec<_> = trace.lit_points().collect();
        for (side, color) in SQUARE_COLORS.iter().enumerate() {
            let chunk = &lit[side * SIDE_POINTS..(side + 1) * SIDE_POINTS];
            assert!(chunk.iter().all(|p| p.color == *color));
        }
    }

    #[test]
    fn test_square_rotates() {
        let square = SquareEffect::default();
        let quarter = square.period / 4;

        let start = square.trace(Duration::ZERO, ColorSource::Predefined);
        let turned = square.trace(quarter, ColorSource::Predefined);
        assert_ne!(start.points()[0].point, turned.points()[0].point);

        // A quarter turn maps the square onto itself
        let a = start.points()[0].point;
        let b = turned.points()[0].point;
        assert!((a.x - b.y).abs() < 1e-3 || (a.x + b.x).abs() < 1e-3, "{:?} {:?}", a, b);

        // Full turn is back where it started
        let full = square.trace(square.period, ColorSource::Predefined);
        let c = full.points()[0].point;
        assert!((a.x - c.x).abs() < 1e-4 && (a.y - c.y).abs() < 1e-4);
    }
}
