//! Progression and chord-symbol parsing.
//!
//! Nothing in here fails on musical input: unusable bracket spans are dropped
//! (and described in feedback), unknown note names resolve to no pitch class.

mod key;
mod progression;
mod symbol;

pub use key::parse_main_key;
pub use progression::{extract_chords, scan_progression, ChordToken, Progression};
pub use symbol::{decompose, note_name, quality, split_bass};
