use alloc::{string::String, vec::Vec};

use serde::{Deserialize, Serialize};

use crate::{
    color::{ColorMode, LaserColor},
    effect::EffectId,
};

/// A show is an ordered list of cues. It carries no audio, only what the
/// projector should draw and for how long.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableShow {
    pub name: String,
    /// Start again from the first cue once the last one finishes
    #[serde(default)]
    pub looping: bool,
    pub cues: Vec<Cue>,
}

/// One effect run, optionally preceded by a colour change
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub effect: EffectId,
    /// Milliseconds to run for. Without it the effect uses its fixed timing
    /// and predefined colours.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub color: Option<LaserColor>,
    #[serde(default)]
    pub color_mode: Option<ColorMode>,
}

impl SerializableShow {
    /// Total runtime of one pass, counting only cues with an explicit duration.
    /// Saturates at `u64::MAX`.
    pub fn timed_runtime_ms(&self) -> u64 {
        self.cues
            .iter()
            .filter_map(|cue| cue.duration_ms)
            .fold(0u64, |total, ms| total.saturating_add(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_json() {
        let show: SerializableShow = serde_json::from_str(
            r#"{
                "name": "opening",
                "cues": [
                    { "effect": "square" },
                    { "effect": "heart", "duration_ms": 3000, "color": { "red": 255, "green": 0, "blue": 64 } },
                    { "effect": "effect5", "duration_ms": 500, "color_mode": "rave" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(show.name, "opening");
        assert!(!show.looping);
        assert_eq!(show.cues.len(), 3);
        assert_eq!(show.cues[0].duration_ms, None);
        assert_eq!(show.cues[1].color, Some(LaserColor::new(255, 0, 64)));
        assert_eq!(show.cues[2].color_mode, Some(ColorMode::Rave));
        assert_eq!(show.timed_runtime_ms(), 3500);
    }

    #[test]
    fn test_runtime_saturates() {
        let show: SerializableShow = serde_json::from_str(
            r#"{
                "name": "endless",
                "cues": [
                    { "effect": "square", "duration_ms": 18446744073709551615 },
                    { "effect": "heart", "duration_ms": 1 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(show.timed_runtime_ms(), u64::MAX);
    }
}
