use std::fmt::{Debug, Display};

use anyhow::{bail, Error};
use log::debug;
use packed_struct::{PackedStruct, PackingError};

use self::pack::{CheckSum, HeaderPack, PointPack, Word};
use crate::{
    effect::EffectId,
    geometry::{Point, Trace},
};

pub mod controller;
pub mod pack;

pub use controller::LaserController;

/// The firmware buffers at most this many points per frame
pub const MAX_POINTS_PER_FRAME: usize = 1024;

/// A frame ready for the wire: checksummed header followed by its points
#[derive(PartialEq, Clone, Debug)]
pub struct FrameSendPack {
    pub header: Word,
    pub points: Vec<Word>,
}

impl FrameSendPack {
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.points.len() + 1) * self.header.len());

        bytes.extend_from_slice(&self.header);
        for point in self.points {
            bytes.extend_from_slice(&point);
        }

        bytes
    }

    pub fn header_pack(&self) -> Result<HeaderPack, PackingError> {
        HeaderPack::unpack(&self.header)
    }

    pub fn point_packs(&self) -> Result<Vec<PointPack>, PackingError> {
        self.points.iter().map(PointPack::unpack).collect()
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct MessageSendPack {
    pub header: HeaderPack,
    pub points: Vec<PointPack>,
}

impl Display for MessageSendPack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let effect = match *self.header.effect_id {
            0 => "no effect".to_string(),
            id => format!("effect {}", id),
        };

        let task = match self.header.blank {
            true => "a blank frame".to_string(),
            false => format!(
                "{} points at {}us",
                self.points.len(),
                *self.header.point_period_us
            ),
        };

        write!(f, "Sending {} with {}", effect, task)
    }
}

impl MessageSendPack {
    pub fn new(effect: Option<EffectId>, trace: &Trace, point_period_us: u16) -> Result<Self, Error> {
        if trace.len() > MAX_POINTS_PER_FRAME {
            bail!(
                "frame has {} points, the limit is {}",
                trace.len(),
                MAX_POINTS_PER_FRAME
            );
        }

        Ok(MessageSendPack {
            header: HeaderPack {
                effect_id: effect.map(EffectId::number).unwrap_or(0).into(),
                blank: false,
                point_count: (trace.len() as u16).into(),
                point_period_us: point_period_us.into(),
                ..Default::default()
            },
            points: trace.points().iter().map(PointPack::from).collect(),
        })
    }

    /// A single dark point parking the galvos at `at`
    pub fn blank_message(at: Point, point_period_us: u16) -> Self {
        let trace = Trace::parked(at);

        MessageSendPack {
            header: HeaderPack {
                blank: true,
                point_count: 1.into(),
                point_period_us: point_period_us.into(),
                ..Default::default()
            },
            points: trace.points().iter().map(PointPack::from).collect(),
        }
    }
}

/// Change from a MessageSendPack to a FrameSendPack
impl TryFrom<MessageSendPack> for FrameSendPack {
    type Error = PackingError;

    fn try_from(mut msg: MessageSendPack) -> Result<FrameSendPack, PackingError> {
        debug!("{msg}");

        Ok(FrameSendPack {
            header: msg.header.checksum_pack()?,
            points: msg
                .points
                .iter_mut()
                .map(|point| point.checksum_pack())
                .collect::<Result<_, _>>()?,
        })
    }
}
