use std::time::Duration;

pub use common::show::{Cue, SerializableShow};

use crate::InternalMessage;

pub mod show_manager;

pub mod prelude {
    pub use super::show_manager::{ShowChoice, ShowManager, ShowMap, ShowName};
    pub use super::{Cue, SerializableShow};
}

/// The controller requests that make up one cue: any colour change first,
/// then the effect itself
pub fn cue_messages(cue: &Cue) -> Vec<InternalMessage> {
    let mut messages = Vec::new();

    if let Some(color) = cue.color {
        messages.push(InternalMessage::SetColor(Some(color)));
    }
    if let Some(mode) = cue.color_mode {
        messages.push(InternalMessage::SetColorMode(mode));
    }

    messages.push(InternalMessage::Effect {
        id: cue.effect,
        duration: cue.duration_ms.map(Duration::from_millis),
    });

    messages
}
