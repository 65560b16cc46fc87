//! Pitch-class table.
//!
//! Twelve chromatic note names (sharp spelling canonical) mapped to the
//! integers 0-11. Flat spellings of the black keys normalize to their sharp
//! enharmonic before lookup; anything else that is not in the table resolves
//! to `None` rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical note names, indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings accepted as aliases for the sharp names.
const FLAT_ALIASES: [(&str, &str); 5] = [
    ("Db", "C#"),
    ("Eb", "D#"),
    ("Gb", "F#"),
    ("Ab", "G#"),
    ("Bb", "A#"),
];

/// A pitch class in 12-TET, `0..=11` (C = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create from a value in `0..=11`.
    pub fn new(value: u8) -> Option<Self> {
        (value < 12).then_some(PitchClass(value))
    }

    /// Look up a note name. Sharp names and the five flat aliases resolve;
    /// `Cb`, `E#`, lowercase names and the like do not.
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical = FLAT_ALIASES
            .iter()
            .find(|(flat, _)| *flat == name)
            .map(|(_, sharp)| *sharp)
            .unwrap_or(name);

        NOTE_NAMES
            .iter()
            .position(|n| *n == canonical)
            .map(|i| PitchClass(i as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Canonical (sharp) name.
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Semitones from `tonic` up to `self`, `0..=11`.
    pub fn interval_above(self, tonic: PitchClass) -> u8 {
        (self.0 + 12 - tonic.0) % 12
    }

    /// All twelve pitch classes in ascending order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PitchClass::new(value).ok_or_else(|| format!("pitch class {} out of range 0-11", value))
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A note name as written in a chord symbol, plus the pitch class it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpelledNote {
    pub spelling: String,
    /// `None` when the spelling is not in the table (e.g. `Cb`).
    pub pitch_class: Option<PitchClass>,
}

impl SpelledNote {
    pub fn new(spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        let pitch_class = PitchClass::from_name(&spelling);
        if pitch_class.is_none() {
            tracing::debug!(spelling = %spelling, "note spelling has no pitch class");
        }
        SpelledNote {
            spelling,
            pitch_class,
        }
    }
}

impl fmt::Display for SpelledNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_sharp_name_round_trips() {
        for (i, name) in NOTE_NAMES.iter().enumerate() {
            let pc = PitchClass::from_name(name).unwrap();
            assert_eq!(pc.value() as usize, i);
            assert_eq!(pc.name(), *name);
        }
    }

    #[test]
    fn test_flat_aliases_normalize_to_sharps() {
        assert_eq!(PitchClass::from_name("Db"), PitchClass::from_name("C#"));
        assert_eq!(PitchClass::from_name("Eb").map(|p| p.name()), Some("D#"));
        assert_eq!(PitchClass::from_name("Gb").map(|p| p.value()), Some(6));
        assert_eq!(PitchClass::from_name("Ab").map(|p| p.value()), Some(8));
        assert_eq!(PitchClass::from_name("Bb").map(|p| p.value()), Some(10));
    }

    #[test]
    fn test_unlisted_spellings_are_unknown() {
        for name in ["Cb", "Fb", "E#", "B#", "c", "H", "", "C##"] {
            assert_eq!(PitchClass::from_name(name), None, "{name:?}");
        }
    }

    #[test]
    fn test_interval_above_wraps() {
        let c = PitchClass::from_name("C").unwrap();
        let a = PitchClass::from_name("A").unwrap();
        assert_eq!(c.interval_above(a), 3);
        assert_eq!(a.interval_above(c), 9);
        assert_eq!(c.interval_above(c), 0);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(PitchClass::new(11).is_some());
        assert!(PitchClass::new(12).is_none());
        assert!(serde_json::from_str::<PitchClass>("12").is_err());
        assert_eq!(serde_json::from_str::<PitchClass>("7").unwrap().name(), "G");
    }

    #[test]
    fn test_spelled_note_keeps_spelling() {
        let note = SpelledNote::new("Bb");
        assert_eq!(note.spelling, "Bb");
        assert_eq!(note.pitch_class.map(|p| p.name()), Some("A#"));

        let odd = SpelledNote::new("Cb");
        assert_eq!(odd.to_string(), "Cb");
        assert_eq!(odd.pitch_class, None);
    }
}
