use std::time::Duration;

use anyhow::Error;
use log::{error, info, warn};
use tokio::{
    sync::mpsc,
    time::{sleep, Instant},
};

use super::{FrameSendPack, MessageSendPack};
use crate::{
    color::{ColorMode, ColorSource, ColorState, LaserColor},
    config::Config,
    drawing::Drawing,
    effect::{Effect, EffectId, EffectSlot, FIXED_EFFECT_DURATION},
    geometry::Point,
    pins::PinAssignment,
    sink::LaserSink,
    InternalMessage,
};

/// Shortest time a frame is held, however few points it has
const MIN_FRAME_PERIOD: Duration = Duration::from_millis(1);

/// Owns the projector: its pin map, the laser colour and the frame sink.
///
/// Everything runs on one task. An effect plays until its time is up and the
/// beam is blanked before the next request is looked at.
pub struct LaserController<S> {
    pins: PinAssignment,
    colors: ColorState,
    point_rate: u32,
    sink: S,
}

impl<S: LaserSink> LaserController<S> {
    pub fn init(config: &Config, sink: S) -> Result<Self, Error> {
        config.validate()?;

        info!(
            "Laser controller on {} at {} points/s",
            config.pins, config.point_rate
        );

        Ok(Self {
            pins: config.pins,
            colors: ColorState::new(config.default_color),
            point_rate: config.point_rate,
            sink,
        })
    }

    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn laser_color(&self) -> LaserColor {
        self.colors.laser_color()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.colors.color_mode()
    }

    /// Back to the configured default colour
    pub fn set_laser_color(&mut self) {
        self.colors.set_laser_color();
        info!("Laser colour reset to {:?}", self.colors.laser_color());
    }

    pub fn set_laser_color_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.colors.set_laser_color_rgb(red, green, blue);
        info!("Laser colour set to {:?}", self.colors.laser_color());
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.colors.set_color_mode(mode);
        info!("Colour mode set to {}", mode.as_str());
    }

    /// Run an effect with its built-in timing and colours
    pub async fn run_effect(&mut self, id: EffectId) -> Result<u64, Error> {
        info!("Running {} with fixed timing", id);
        let slot = EffectSlot::from_id(id);
        self.play(Some(id), &slot, FIXED_EFFECT_DURATION, false).await
    }

    /// Run an effect for `duration` in the current laser colour
    pub async fn run_effect_for(&mut self, id: EffectId, duration: Duration) -> Result<u64, Error> {
        info!("Running {} for {}ms", id, duration.as_millis());
        let slot = EffectSlot::from_id(id);
        self.play(Some(id), &slot, duration, true).await
    }

    pub async fn run_drawing(&mut self, drawing: &Drawing, duration: Duration) -> Result<u64, Error> {
        info!(
            "Running a drawing of {} samples for {}ms",
            drawing.len(),
            duration.as_millis()
        );
        self.play(None, drawing, duration, true).await
    }

    /// Turn the beam off and park the galvos in the middle of the field
    pub fn blank(&mut self) -> Result<(), Error> {
        let frame = FrameSendPack::try_from(MessageSendPack::blank_message(
            Point::CENTER,
            self.point_period_us(),
        ))?;
        self.sink.send(frame)
    }

    /// Returns the number of effect frames sent. The beam is blanked
    /// afterwards even when drawing failed part way.
    async fn play<E: Effect>(
        &mut self,
        id: Option<EffectId>,
        effect: &E,
        duration: Duration,
        use_laser_color: bool,
    ) -> Result<u64, Error> {
        let drawn = self.draw_frames(id, effect, duration, use_laser_color).await;
        self.blank()?;

        if let Ok(frames) = drawn {
            info!("Sent {} frames", frames);
        }
        drawn
    }

    async fn draw_frames<E: Effect>(
        &mut self,
        id: Option<EffectId>,
        effect: &E,
        duration: Duration,
        use_laser_color: bool,
    ) -> Result<u64, Error> {
        let start = Instant::now();
        let mut frames = 0;

        while start.elapsed() < duration {
            let colors = match use_laser_color {
                true => ColorSource::Laser(self.colors.frame_color()),
                false => ColorSource::Predefined,
            };

            let trace = effect.trace(start.elapsed(), colors);
            let period = self.frame_period(trace.len());
            let message = MessageSendPack::new(id, &trace, self.point_period_us())?;
            self.sink.send(FrameSendPack::try_from(message)?)?;
            frames += 1;

            let remaining = duration.saturating_sub(start.elapsed());
            sleep(period.min(remaining)).await;
        }

        Ok(frames)
    }

    fn point_period_us(&self) -> u16 {
        (1_000_000 / self.point_rate.max(1)).clamp(1, u16::MAX as u32) as u16
    }

    fn frame_period(&self, points: usize) -> Duration {
        let period = Duration::from_micros(self.point_period_us() as u64 * points as u64);
        period.max(MIN_FRAME_PERIOD)
    }

    pub async fn handle(&mut self, message: InternalMessage) -> Result<(), Error> {
        match message {
            InternalMessage::Effect { id, duration } => {
                match duration {
                    Some(duration) => self.run_effect_for(id, duration).await?,
                    None => self.run_effect(id).await?,
                };
            }
            InternalMessage::Drawing { drawing, duration } => {
                self.run_drawing(&drawing, duration).await?;
            }
            InternalMessage::SetColor(Some(color)) => {
                self.set_laser_color_rgb(color.red, color.green, color.blue)
            }
            InternalMessage::SetColor(None) => self.set_laser_color(),
            InternalMessage::SetColorMode(mode) => self.set_color_mode(mode),
            InternalMessage::Blank => self.blank()?,
        }

        Ok(())
    }

    /// Work through requests in order until every sender is gone
    pub async fn start(&mut self, mut rx: mpsc::Receiver<InternalMessage>) {
        while let Some(message) = rx.recv().await {
            if let Err(e) = self.handle(message).await {
                error!("Laser request failed: {:#}", e);
            }
        }

        warn!("Laser request channel closed, blanking");
        if let Err(e) = self.blank() {
            error!("Failed to blank the laser: {:#}", e);
        }
    }
}
