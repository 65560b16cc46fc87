//! Terminal colors for text output.

use chordscope::{CandidateStatus, ConfidenceTier, RelationshipKind};
use owo_colors::OwoColorize;

/// Applies colors only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn symbol(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn degree(&self, text: &str) -> String {
        if !self.enabled {
            text.to_string()
        } else if text.trim_end() == chordscope::UNKNOWN_DEGREE {
            text.bright_red().to_string()
        } else {
            text.bright_green().to_string()
        }
    }

    pub fn borrowed(&self, text: &str) -> String {
        if self.enabled {
            text.bright_yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn confidence(&self, text: &str, tier: ConfidenceTier) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match tier {
            ConfidenceTier::High => text.green().to_string(),
            ConfidenceTier::Medium => text.yellow().to_string(),
            ConfidenceTier::Low => text.red().to_string(),
        }
    }

    pub fn relationship(&self, text: &str, kind: RelationshipKind) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match kind {
            RelationshipKind::Parallel => text.blue().to_string(),
            RelationshipKind::Relative => text.green().to_string(),
            RelationshipKind::Dominant => text.yellow().to_string(),
            RelationshipKind::Subdominant => text.magenta().to_string(),
            RelationshipKind::Other => text.to_string(),
        }
    }

    pub fn candidate(&self, text: &str, status: CandidateStatus) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match status {
            CandidateStatus::Selected => text.bright_cyan().bold().to_string(),
            CandidateStatus::AutoSelected => text.cyan().to_string(),
            CandidateStatus::Unselected => text.to_string(),
        }
    }
}
