//! Per-chord report for a progression against an analysis result.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::borrowed::{annotate, BorrowedAnnotation, SelectedBorrowedKeys};
use crate::degree::{degree_label, UNKNOWN_DEGREE};
use crate::feedback::ParseResult;
use crate::parser::{decompose, scan_progression};
use crate::pitch::PitchClass;
use crate::result::AnalysisResult;
use crate::types::Chord;

/// Everything shown for one chord of the progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordReport {
    pub symbol: String,
    /// Byte offsets of the `[...]` span in the input.
    pub span: (usize, usize),
    pub chord: Chord,
    pub degree: String,
    pub annotation: BorrowedAnnotation,
}

/// Tokenize `input` and label every chord against `result`.
///
/// The key is parsed once; if it is malformed every degree is `"?"`.
pub fn analyze_progression(
    input: &str,
    result: &AnalysisResult,
    selections: &SelectedBorrowedKeys,
) -> ParseResult<Vec<ChordReport>> {
    let key = result.key();

    scan_progression(input).map(|progression| {
        progression
            .tokens
            .into_iter()
            .map(|token| {
                let chord = decompose(&token.symbol);
                let degree = match &key {
                    Some(key) => degree_label(&chord, key),
                    None => UNKNOWN_DEGREE.to_string(),
                };
                let annotation = annotate(&token.symbol, &result.borrowed_chords, selections);
                ChordReport {
                    symbol: token.symbol,
                    span: token.span,
                    chord,
                    degree,
                    annotation,
                }
            })
            .collect()
    })
}

/// Pitch-class names paired with the service's weights. Missing entries are 0.0.
pub fn pitch_class_profile(result: &AnalysisResult) -> Vec<(&'static str, f64)> {
    PitchClass::all()
        .map(|pc| {
            let weight = result
                .pitch_class_vector
                .get(pc.value() as usize)
                .copied()
                .unwrap_or(0.0);
            (pc.name(), weight)
        })
        .collect()
}

/// The analysis currently on display plus the user's source-key choices.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    input: String,
    result: AnalysisResult,
    selections: SelectedBorrowedKeys,
}

impl AnalysisSession {
    pub fn new(input: impl Into<String>, result: AnalysisResult) -> Self {
        AnalysisSession {
            input: input.into(),
            result,
            selections: SelectedBorrowedKeys::new(),
        }
    }

    /// Install a new analysis. Earlier selections are dropped.
    pub fn replace(&mut self, input: impl Into<String>, result: AnalysisResult) {
        info!(
            main_key = %result.main_key,
            dropped_selections = self.selections.len(),
            "replacing analysis"
        );
        self.input = input.into();
        self.result = result;
        self.selections.clear();
    }

    pub fn select(&mut self, chord: impl Into<String>, key: impl Into<String>) {
        self.selections.select(chord, key);
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn selections(&self) -> &SelectedBorrowedKeys {
        &self.selections
    }

    pub fn report(&self) -> ParseResult<Vec<ChordReport>> {
        analyze_progression(&self.input, &self.result, &self.selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn c_major_result() -> AnalysisResult {
        AnalysisResult::from_json(
            r#"{
                "main_key": "C Major",
                "confidence": 0.87,
                "borrowed_chords": [
                    {
                        "chord": "Fm",
                        "non_diatonic_notes": ["G#"],
                        "source_candidates": [
                            {"key": "C Minor", "relationship": "Parallel Minor", "confidence": 0.9},
                            {"key": "F Minor", "relationship": "Subdominant Minor", "confidence": 0.7}
                        ]
                    }
                ],
                "pitch_class_vector": [0.3, 0.0, 0.1, 0.0, 0.1, 0.2, 0.0, 0.2, 0.1]
            }"#,
        )
        .unwrap()
    }

    fn degrees(reports: &[ChordReport]) -> Vec<&str> {
        reports.iter().map(|r| r.degree.as_str()).collect()
    }

    #[test]
    fn test_analyze_progression() {
        let result = c_major_result();
        let report = analyze_progression(
            "[C][Am][Fm][G7]",
            &result,
            &SelectedBorrowedKeys::new(),
        );

        assert!(report.is_clean());
        assert_eq!(degrees(&report.value), vec!["I", "vi", "iv", "V7"]);
        assert_eq!(report.value[2].span, (7, 11));

        let borrowed: Vec<_> = report
            .value
            .iter()
            .map(|r| r.annotation.is_borrowed)
            .collect();
        assert_eq!(borrowed, vec![false, false, true, false]);
        assert_eq!(
            report.value[2].annotation.displayed_source_key.as_deref(),
            Some("C Minor")
        );
    }

    #[test]
    fn test_rejected_spans_become_feedback() {
        let result = c_major_result();
        let report = analyze_progression("[C][ ][|][G]", &result, &SelectedBorrowedKeys::new());
        assert_eq!(degrees(&report.value), vec!["I", "V"]);
        assert_eq!(report.feedback.len(), 2);
    }

    #[test]
    fn test_malformed_key_labels_everything_unknown() {
        let mut result = c_major_result();
        result.main_key = "C major".to_string();
        let report = analyze_progression("[C][Fm]", &result, &SelectedBorrowedKeys::new());
        assert_eq!(degrees(&report.value), vec!["?", "?"]);
        assert!(report.value[1].annotation.is_borrowed);
    }

    #[test]
    fn test_pitch_class_profile_pads_missing() {
        let profile = pitch_class_profile(&c_major_result());
        assert_eq!(profile.len(), 12);
        assert_eq!(profile[0], ("C", 0.3));
        assert_eq!(profile[7], ("G", 0.2));
        assert_eq!(profile[11], ("B", 0.0));
    }

    #[test]
    fn test_session_selection_and_replace() {
        let mut session = AnalysisSession::new("[C][Fm][G]", c_major_result());
        session.select("Fm", "F Minor");
        assert_eq!(
            session.report().value[1]
                .annotation
                .displayed_source_key
                .as_deref(),
            Some("F Minor")
        );

        session.replace("[C][Fm][G][C]", c_major_result());
        assert!(session.selections().is_empty());
        assert_eq!(session.input(), "[C][Fm][G][C]");

        let report = session.report();
        assert_eq!(report.value.len(), 4);
        assert_eq!(
            report.value[1].annotation.displayed_source_key.as_deref(),
            Some("C Minor")
        );
    }
}
