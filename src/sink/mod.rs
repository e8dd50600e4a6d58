//! Where finished frames go.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Error};
use log::{debug, info};

#[cfg(feature = "pi")]
use rppal::uart::{Parity, Uart};

use crate::{config::Link, laser::FrameSendPack};

pub trait LaserSink {
    fn send(&mut self, frame: FrameSendPack) -> Result<(), Error>;
}

impl<S: LaserSink + ?Sized> LaserSink for Box<S> {
    fn send(&mut self, frame: FrameSendPack) -> Result<(), Error> {
        (**self).send(frame)
    }
}

/// Streams frames over the serial link to the projector board
pub struct UartSink {
    #[cfg(feature = "pi")]
    uart: Uart,
}

impl UartSink {
    pub fn init(link: &Link) -> Result<Self, Error> {
        #[cfg(feature = "pi")]
        let uart = {
            let mut uart = Uart::with_path(&link.path, link.baud, Parity::None, 8, 1)?;
            uart.set_write_mode(true)?;
            uart
        };

        info!("Laser link open on {} at {} baud", link.path, link.baud);

        Ok(UartSink {
            #[cfg(feature = "pi")]
            uart,
        })
    }
}

impl LaserSink for UartSink {
    fn send(&mut self, #[allow(unused_variables)] frame: FrameSendPack) -> Result<(), Error> {
        #[cfg(feature = "pi")]
        self.uart.write(&frame.into_bytes())?;

        Ok(())
    }
}

/// Drops frames after logging their size. Used when no hardware is attached.
#[derive(Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl LogSink {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl LaserSink for LogSink {
    fn send(&mut self, frame: FrameSendPack) -> Result<(), Error> {
        self.frames += 1;
        debug!(
            "Frame {}: {} points, {} bytes",
            self.frames,
            frame.points.len(),
            (frame.points.len() + 1) * frame.header.len()
        );
        Ok(())
    }
}

/// Keeps every frame in memory. Clones share the same buffer, so a handle
/// can be kept while the controller owns the sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<FrameSendPack>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<FrameSendPack> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .map(|frames| frames.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
    }
}

impl LaserSink for RecordingSink {
    fn send(&mut self, frame: FrameSendPack) -> Result<(), Error> {
        self.frames
            .lock()
            .map_err(|_| anyhow!("frame recording lock poisoned"))?
            .push(frame);
        Ok(())
    }
}
