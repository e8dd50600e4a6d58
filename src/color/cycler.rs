use std::time::Duration;

use common::color::{ColorMode, LaserColor};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tokio::time::Instant;

use super::{hsv_to_rgb, interpolate};

/// Time spent fading from one target colour to the next
pub const COLOR_FADE: Duration = Duration::from_secs(1);
/// A fade moves in this many discrete steps
pub const FADE_STEPS: u32 = 100;

const HUE_STEP: u16 = 20;

const HALLOWEEN_COLORS: [u32; 4] = [0xFF4500, 0x8A2BE2, 0xFF0000, 0x008000];
const BOILER_ROOM_COLORS: [u32; 2] = [0x8B0000, 0x4B0082];

/// Walks through the colours of a [`ColorMode`], fading between targets
#[derive(Debug)]
pub struct ColorCycler {
    mode: ColorMode,
    from: LaserColor,
    to: LaserColor,
    hue: u16,
    cycle: u64,
    started: Instant,
    rng: StdRng,
}

impl ColorCycler {
    pub fn new(mode: ColorMode, start: LaserColor) -> Self {
        Self::with_rng(mode, start, StdRng::from_entropy())
    }

    /// Same as [`ColorCycler::new`] but with reproducible random picks
    pub fn with_seed(mode: ColorMode, start: LaserColor, seed: u64) -> Self {
        Self::with_rng(mode, start, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: ColorMode, start: LaserColor, rng: StdRng) -> Self {
        let mut cycler = Self {
            mode,
            from: start,
            to: start,
            hue: 0,
            cycle: 0,
            started: Instant::now(),
            rng,
        };
        cycler.to = cycler.next_target();
        cycler
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn color_now(&mut self) -> LaserColor {
        let elapsed = self.started.elapsed();
        self.color_at(elapsed)
    }

    /// Colour `elapsed` after the cycler was created. Time only moves forward;
    /// asking for an earlier point than before stays in the current fade.
    pub fn color_at(&mut self, elapsed: Duration) -> LaserColor {
        let fade_ms = COLOR_FADE.as_millis();
        let elapsed_ms = elapsed.as_millis();

        let cycle = (elapsed_ms / fade_ms) as u64;
        while self.cycle < cycle {
            self.from = self.to;
            self.to = self.next_target();
            self.cycle += 1;
        }

        let step = (elapsed_ms % fade_ms) * FADE_STEPS as u128 / fade_ms;
        interpolate(self.from, self.to, step as f32 / FADE_STEPS as f32)
    }

    fn next_target(&mut self) -> LaserColor {
        match self.mode {
            ColorMode::Static => self.to,
            ColorMode::FullSpectrum => {
                self.hue = (self.hue + HUE_STEP) % 360;
                hsv_to_rgb(self.hue, 255, 255)
            }
            ColorMode::Rave => hsv_to_rgb(self.rng.gen_range(0..360), 255, 255),
            ColorMode::Halloween => self.pick(&HALLOWEEN_COLORS),
            ColorMode::BoilerRoom => self.pick(&BOILER_ROOM_COLORS),
        }
    }

    fn pick(&mut self, palette: &[u32]) -> LaserColor {
        palette
            .choose(&mut self.rng)
            .map(|hex| LaserColor::from_hex(*hex))
            .unwrap_or(self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_holds_color() {
        let mut cycler = ColorCycler::with_seed(ColorMode::Static, LaserColor::GREEN, 1);
        for ms in [0, 250, 1000, 5500] {
            assert_eq!(
                cycler.color_at(Duration::from_millis(ms)),
                LaserColor::GREEN
            );
        }
    }

    #[test]
    fn test_full_spectrum_walks_hue() {
        let mut cycler = ColorCycler::with_seed(ColorMode::FullSpectrum, LaserColor::OFF, 1);

        // Fading from the start colour towards hue 20
        assert_eq!(cycler.color_at(Duration::ZERO), LaserColor::OFF);
        assert_eq!(
            cycler.color_at(Duration::from_millis(500)),
            interpolate(LaserColor::OFF, hsv_to_rgb(20, 255, 255), 0.5)
        );

        // Each cycle starts exactly on the previous target
        assert_eq!(
            cycler.color_at(Duration::from_millis(1000)),
            hsv_to_rgb(20, 255, 255)
        );
        assert_eq!(
            cycler.color_at(Duration::from_millis(3000)),
            hsv_to_rgb(60, 255, 255)
        );
    }

    #[test]
    fn test_palette_modes_stay_in_palette() {
        let mut halloween = ColorCycler::with_seed(ColorMode::Halloween, LaserColor::OFF, 7);
        let mut boiler = ColorCycler::with_seed(ColorMode::BoilerRoom, LaserColor::OFF, 7);

        for cycle in 1..20 {
            let at = Duration::from_secs(cycle);
            let color = halloween.color_at(at);
            assert!(HALLOWEEN_COLORS.contains(&color.to_hex()), "{:?}", color);

            let color = boiler.color_at(at);
            assert!(BOILER_ROOM_COLORS.contains(&color.to_hex()), "{:?}", color);
        }
    }

    #[test]
    fn test_rave_is_fully_saturated() {
        let mut cycler = ColorCycler::with_seed(ColorMode::Rave, LaserColor::OFF, 42);

        for cycle in 1..20 {
            let color = cycler.color_at(Duration::from_secs(cycle));
            let channels = [color.red, color.green, color.blue];
            assert!(channels.contains(&255), "{:?}", color);
            assert!(channels.contains(&0), "{:?}", color);
        }
    }

    #[test]
    fn test_same_seed_same_colors() {
        let mut a = ColorCycler::with_seed(ColorMode::Rave, LaserColor::OFF, 9);
        let mut b = ColorCycler::with_seed(ColorMode::Rave, LaserColor::OFF, 9);

        for ms in (0..5000).step_by(333) {
            let at = Duration::from_millis(ms);
            assert_eq!(a.color_at(at), b.color_at(at));
        }
    }
}
