use serde::{Deserialize, Serialize};

pub const EFFECT_COUNT: usize = 20;

/// The twenty effect slots, numbered the way the projector firmware numbers
/// them. Only the first two draw anything yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EffectId {
    Square = 1,
    Heart = 2,
    Effect3 = 3,
    Effect4 = 4,
    Effect5 = 5,
    Effect6 = 6,
    Effect7 = 7,
    Effect8 = 8,
    Effect9 = 9,
    Effect10 = 10,
    Effect11 = 11,
    Effect12 = 12,
    Effect13 = 13,
    Effect14 = 14,
    Effect15 = 15,
    Effect16 = 16,
    Effect17 = 17,
    Effect18 = 18,
    Effect19 = 19,
    Effect20 = 20,
}

impl EffectId {
    pub const ALL: [EffectId; EFFECT_COUNT] = [
        EffectId::Square,
        EffectId::Heart,
        EffectId::Effect3,
        EffectId::Effect4,
        EffectId::Effect5,
        EffectId::Effect6,
        EffectId::Effect7,
        EffectId::Effect8,
        EffectId::Effect9,
        EffectId::Effect10,
        EffectId::Effect11,
        EffectId::Effect12,
        EffectId::Effect13,
        EffectId::Effect14,
        EffectId::Effect15,
        EffectId::Effect16,
        EffectId::Effect17,
        EffectId::Effect18,
        EffectId::Effect19,
        EffectId::Effect20,
    ];

    /// Look up a slot by its 1-based number
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=20 => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Slots 3 to 20 are reserved and keep the beam dark
    pub const fn is_placeholder(self) -> bool {
        !matches!(self, EffectId::Square | EffectId::Heart)
    }
}

impl core::fmt::Display for EffectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EffectId::Square => write!(f, "effect 1 (square)"),
            EffectId::Heart => write!(f, "effect 2 (heart)"),
            other => write!(f, "effect {}", other.number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        for (i, id) in EffectId::ALL.iter().enumerate() {
            assert_eq!(id.number() as usize, i + 1);
            assert_eq!(EffectId::from_number(id.number()), Some(*id));
        }

        assert_eq!(EffectId::from_number(0), None);
        assert_eq!(EffectId::from_number(21), None);
    }

    #[test]
    fn test_placeholders() {
        assert!(!EffectId::Square.is_placeholder());
        assert!(!EffectId::Heart.is_placeholder());
        assert_eq!(
            EffectId::ALL.iter().filter(|id| id.is_placeholder()).count(),
            18
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&EffectId::Heart).unwrap(), "\"heart\"");
        assert_eq!(
            serde_json::from_str::<EffectId>("\"effect17\"").unwrap(),
            EffectId::Effect17
        );
    }
}
