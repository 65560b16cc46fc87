//! Borrowed-chord annotation and user source-key selection.
//!
//! The borrowed-chord list comes from the analysis service. For each chord in
//! the progression we decide whether it is borrowed and which source key to
//! show: the user's explicit choice if there is one, otherwise the service's
//! top-ranked candidate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::result::{BorrowedChordInfo, KeyCandidate};

/// User overrides: chord symbol -> chosen source key.
///
/// No entry means "use the top candidate". Owned by whoever displays the
/// current analysis and cleared when that analysis is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedBorrowedKeys {
    selections: BTreeMap<String, String>,
}

impl SelectedBorrowedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chord: &str) -> Option<&str> {
        self.selections.get(chord).map(String::as_str)
    }

    /// Choose `key` as the source for `chord`. An empty `key` removes the
    /// override, leaving no trace of the earlier choice.
    pub fn select(&mut self, chord: impl Into<String>, key: impl Into<String>) {
        let chord = chord.into();
        let key = key.into();
        if key.is_empty() {
            self.selections.remove(&chord);
        } else {
            self.selections.insert(chord, key);
        }
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Parse a `CHORD=KEY` argument. `CHORD=` (empty key) is a reset.
pub fn parse_selection(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((chord, key)) if !chord.trim().is_empty() => {
            Ok((chord.trim().to_string(), key.trim().to_string()))
        }
        _ => Err(Error::InvalidSelection(arg.to_string())),
    }
}

/// What the presentation layer needs to know about one chord.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorrowedAnnotation {
    pub is_borrowed: bool,
    pub non_diatonic_notes: Vec<String>,
    pub displayed_source_key: Option<String>,
}

/// Annotate `chord` against the service's borrowed list and the user's overrides.
///
/// Matching is exact on the chord symbol. Candidates are taken in the order
/// given; they are not re-ranked here.
pub fn annotate(
    chord: &str,
    borrowed: &[BorrowedChordInfo],
    selections: &SelectedBorrowedKeys,
) -> BorrowedAnnotation {
    let Some(info) = borrowed.iter().find(|b| b.chord == chord) else {
        return BorrowedAnnotation::default();
    };

    let displayed_source_key = selections
        .get(chord)
        .map(str::to_string)
        .or_else(|| info.source_candidates.first().map(|c| c.key.clone()));

    BorrowedAnnotation {
        is_borrowed: true,
        non_diatonic_notes: info.non_diatonic_notes.clone(),
        displayed_source_key,
    }
}

/// How a candidate relates to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    /// The user picked this one.
    Selected,
    /// No override; this is the top candidate.
    AutoSelected,
    Unselected,
}

/// Status of each candidate of `info`, in candidate order.
pub fn candidate_statuses<'a>(
    info: &'a BorrowedChordInfo,
    selections: &SelectedBorrowedKeys,
) -> Vec<(&'a KeyCandidate, CandidateStatus)> {
    let chosen = selections.get(&info.chord);
    info.source_candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let status = match chosen {
                Some(key) if key == candidate.key => CandidateStatus::Selected,
                None if i == 0 => CandidateStatus::AutoSelected,
                _ => CandidateStatus::Unselected,
            };
            (candidate, status)
        })
        .collect()
}

/// Broad family of a candidate's relationship tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Parallel,
    Relative,
    Dominant,
    Subdominant,
    Other,
}

impl RelationshipKind {
    /// Case-sensitive substring match, first hit wins:
    /// Parallel, Relative, Dominant, Subdominant.
    pub fn classify(tag: &str) -> Self {
        if tag.contains("Parallel") {
            RelationshipKind::Parallel
        } else if tag.contains("Relative") {
            RelationshipKind::Relative
        } else if tag.contains("Dominant") {
            RelationshipKind::Dominant
        } else if tag.contains("Subdominant") {
            RelationshipKind::Subdominant
        } else {
            RelationshipKind::Other
        }
    }
}
