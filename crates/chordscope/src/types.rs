//! Core types: decomposed chords and keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::parser::parse_main_key;
use crate::pitch::{PitchClass, SpelledNote};

/// Triad quality as read from the chord symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Major => write!(f, "major"),
            Quality::Minor => write!(f, "minor"),
            Quality::Diminished => write!(f, "diminished"),
            Quality::Augmented => write!(f, "augmented"),
        }
    }
}

/// A chord symbol split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    /// The symbol exactly as it was decomposed.
    pub symbol: String,
    /// `None` when the symbol does not start with a note name.
    pub root: Option<SpelledNote>,
    pub quality: Quality,
    /// Whatever follows the quality prefix, unmodified: "7", "M7(13)", "sus4".
    pub extensions: String,
    /// Bass note of a slash chord.
    pub bass: Option<SpelledNote>,
}

impl Chord {
    pub fn root_pitch_class(&self) -> Option<PitchClass> {
        self.root.as_ref().and_then(|r| r.pitch_class)
    }

    /// Extensions with stray punctuation removed, ready to append to a label.
    pub fn display_extensions(&self) -> String {
        clean_extensions(&self.extensions)
    }
}

/// Keep only `[0-9A-Za-z+#b(),-]`.
pub fn clean_extensions(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '(' | ')' | ',' | '-'))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Exact labels only: "Major" or "Minor".
    pub fn from_label(label: &str) -> Option<Mode> {
        match label {
            "Major" => Some(Mode::Major),
            "Minor" => Some(Mode::Minor),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "Major"),
            Mode::Minor => write!(f, "Minor"),
        }
    }
}

/// A tonal centre. The root always resolves to a pitch class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Root as spelled by the caller ("Eb", "F#").
    pub spelling: String,
    pub root: PitchClass,
    pub mode: Mode,
}

impl Key {
    /// Returns `None` if `spelling` is not in the pitch-class table.
    pub fn new(spelling: impl Into<String>, mode: Mode) -> Option<Self> {
        let spelling = spelling.into();
        let root = PitchClass::from_name(&spelling)?;
        Some(Key {
            spelling,
            root,
            mode,
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.spelling, self.mode)
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_main_key(s).ok_or_else(|| Error::InvalidKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_extensions_strips_stray_punctuation() {
        assert_eq!(clean_extensions("7"), "7");
        assert_eq!(clean_extensions("M7(13)"), "M7(13)");
        assert_eq!(clean_extensions("7(b9,#11)"), "7(b9,#11)");
        assert_eq!(clean_extensions("add9-"), "add9-");
        assert_eq!(clean_extensions("6/9"), "69");
        assert_eq!(clean_extensions("7 ]]"), "7");
        assert_eq!(clean_extensions("sus4!?"), "sus4");
    }

    #[test]
    fn test_mode_labels_are_exact() {
        assert_eq!(Mode::from_label("Major"), Some(Mode::Major));
        assert_eq!(Mode::from_label("Minor"), Some(Mode::Minor));
        assert_eq!(Mode::from_label("major"), None);
        assert_eq!(Mode::from_label("m"), None);
        assert_eq!(Mode::from_label(""), None);
    }

    #[test]
    fn test_key_requires_known_root() {
        let key = Key::new("Eb", Mode::Major).unwrap();
        assert_eq!(key.root.value(), 3);
        assert_eq!(key.to_string(), "Eb Major");

        assert!(Key::new("Cb", Mode::Minor).is_none());
        assert!(Key::new("", Mode::Major).is_none());
    }

    #[test]
    fn test_key_from_str() {
        let key: Key = "D Minor".parse().unwrap();
        assert_eq!(key.root.value(), 2);
        assert_eq!(key.mode, Mode::Minor);

        let err = "D minor".parse::<Key>().unwrap_err();
        assert!(matches!(err, Error::InvalidKey(ref s) if s == "D minor"));
    }

    #[test]
    fn test_quality_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Quality::Diminished).unwrap(),
            "\"diminished\""
        );
    }
}
