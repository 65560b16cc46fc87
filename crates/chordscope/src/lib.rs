//! Chord-progression parsing and Roman-numeral degree analysis.
//!
//! This crate reads bracketed chord progressions (`[C][Am][F][G7]`), splits
//! each symbol into root, quality, extensions and slash bass, and labels it
//! with a scale degree relative to a key. Results from an external
//! key-estimation service are consumed to mark borrowed chords and to pick
//! which source key to display for them.
//!
//! # Example
//!
//! ```
//! use chordscope::{analyze_progression, AnalysisResult, SelectedBorrowedKeys};
//!
//! let result = AnalysisResult::from_json(r#"{
//!     "main_key": "C Major",
//!     "confidence": 0.9,
//!     "borrowed_chords": [{
//!         "chord": "Fm",
//!         "non_diatonic_notes": ["G#"],
//!         "source_candidates": [
//!             {"key": "C Minor", "relationship": "Parallel Minor", "confidence": 0.8}
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let report = analyze_progression("[C][Fm][G7]", &result, &SelectedBorrowedKeys::new());
//! let degrees: Vec<_> = report.value.iter().map(|c| c.degree.as_str()).collect();
//! assert_eq!(degrees, ["I", "iv", "V7"]);
//! assert_eq!(
//!     report.value[1].annotation.displayed_source_key.as_deref(),
//!     Some("C Minor")
//! );
//! ```

pub mod borrowed;
pub mod degree;
pub mod error;
pub mod feedback;
pub mod parser;
pub mod pitch;
pub mod report;
pub mod result;
pub mod types;

pub use borrowed::{
    annotate, candidate_statuses, parse_selection, BorrowedAnnotation, CandidateStatus,
    RelationshipKind, SelectedBorrowedKeys,
};
pub use degree::{degree_label, degree_label_for_main_key, UNKNOWN_DEGREE};
pub use error::{Error, Result};
pub use feedback::{Feedback, FeedbackLevel, ParseResult};
pub use parser::{decompose, extract_chords, parse_main_key, scan_progression, Progression};
pub use pitch::{PitchClass, SpelledNote};
pub use report::{analyze_progression, pitch_class_profile, AnalysisSession, ChordReport};
pub use result::{
    format_confidence, AnalysisResult, BorrowedChordInfo, ConfidenceTier, KeyCandidate,
    KeyEstimate,
};
pub use types::{Chord, Key, Mode, Quality};
