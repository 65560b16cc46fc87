//! Analysis results as delivered by the key-estimation service.
//!
//! The engine reads these; it never produces them.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::parser::parse_main_key;
use crate::types::Key;

/// One possible source key for a borrowed chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCandidate {
    pub key: String,
    /// Free-form tag: "Parallel Minor", "Relative Major", "Secondary Dominant", ...
    pub relationship: String,
    /// 0.0-1.0
    pub confidence: f64,
}

/// A chord the service found outside the main key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedChordInfo {
    /// Chord symbol as it appears in the progression.
    pub chord: String,
    pub non_diatonic_notes: Vec<String>,
    /// Highest confidence first.
    pub source_candidates: Vec<KeyCandidate>,
}

/// Per-algorithm key estimate, when the service ran more than one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    pub key: String,
    pub confidence: f64,
    pub borrowed_chord_count: u32,
    pub algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// "<Root> <Major|Minor>"
    pub main_key: String,
    pub confidence: f64,
    #[serde(default)]
    pub borrowed_chords: Vec<BorrowedChordInfo>,
    /// Normalized weight per pitch class, C first.
    #[serde(default)]
    pub pitch_class_vector: Vec<f64>,
    #[serde(default)]
    pub key_candidates: Vec<KeyEstimate>,
    #[serde(default)]
    pub algorithm_used: Option<String>,
}

impl AnalysisResult {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// The main key, if it parses.
    pub fn key(&self) -> Option<Key> {
        parse_main_key(&self.main_key)
    }

    pub fn borrowed_info(&self, chord: &str) -> Option<&BorrowedChordInfo> {
        self.borrowed_chords.iter().find(|b| b.chord == chord)
    }
}

/// Display band for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// `>= 0.8` high, `>= 0.6` medium, anything else low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceTier::High
        } else if confidence >= 0.6 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

/// Percentage with one decimal: 0.875 -> "87.5%".
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
