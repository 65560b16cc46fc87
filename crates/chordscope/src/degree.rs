//! Roman-numeral degree labels for chords in a key.
//!
//! The base numeral comes from one of two fixed tables indexed by the interval
//! from the key root to the chord root; the table is picked by the key's mode
//! alone. Chord quality then adjusts case and adds `°` or `+`, the cleaned
//! extension string is appended, and slash chords get `/<bass degree>`.

use crate::parser::parse_main_key;
use crate::types::{Chord, Key, Mode, Quality};

/// Shown when a degree cannot be worked out.
pub const UNKNOWN_DEGREE: &str = "?";

/// Degrees in a major key, indexed by semitones above the tonic.
pub const MAJOR_DEGREES: [&str; 12] = [
    "I", "bII", "II", "bIII", "III", "IV", "#IV", "V", "bVI", "VI", "bVII", "VII",
];

/// Degrees in a minor key. Tonic, subdominant and dominant are lowercase.
pub const MINOR_DEGREES: [&str; 12] = [
    "i", "bII", "II", "bIII", "III", "iv", "#iv", "v", "bVI", "VI", "bVII", "vii",
];

/// Label `chord` relative to `key`, e.g. "V7", "iv", "bVI", "II/#IV".
///
/// Returns `"?"` if the chord root does not resolve to a pitch class.
pub fn degree_label(chord: &Chord, key: &Key) -> String {
    let Some(root) = chord.root_pitch_class() else {
        return UNKNOWN_DEGREE.to_string();
    };

    let interval = root.interval_above(key.root) as usize;
    let mut label = match key.mode {
        Mode::Major => in_major(MAJOR_DEGREES[interval], chord.quality),
        Mode::Minor => in_minor(MINOR_DEGREES[interval], chord.quality),
    };

    label.push_str(&chord.display_extensions());

    if let Some(bass) = &chord.bass {
        label.push('/');
        // The bass is always read from the major table, whatever the key's mode.
        match bass.pitch_class {
            Some(pc) => label.push_str(MAJOR_DEGREES[pc.interval_above(key.root) as usize]),
            None => label.push_str(UNKNOWN_DEGREE),
        }
    }

    label
}

/// Label `chord` against a service key string such as "A Minor".
///
/// Every chord gets `"?"` when the key string does not parse.
pub fn degree_label_for_main_key(chord: &Chord, main_key: &str) -> String {
    match parse_main_key(main_key) {
        Some(key) => degree_label(chord, &key),
        None => UNKNOWN_DEGREE.to_string(),
    }
}

fn in_major(base: &str, quality: Quality) -> String {
    match quality {
        Quality::Major => base.to_string(),
        Quality::Minor => base.to_lowercase(),
        Quality::Diminished => base.to_lowercase() + "°",
        Quality::Augmented => base.to_string() + "+",
    }
}

fn in_minor(base: &str, quality: Quality) -> String {
    match quality {
        // The whole label is uppercased, accidental included ("bVI" -> "BVI").
        Quality::Major => base.to_uppercase(),
        Quality::Minor => base.to_string(),
        Quality::Diminished => base.to_string() + "°",
        Quality::Augmented => base.to_string() + "+",
    }
}
