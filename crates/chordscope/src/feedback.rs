//! Parser feedback for dropped bracket spans.
//!
//! The tokenizer never fails on free-form pasted text. Spans it cannot use are
//! left out of the progression and described here instead, so callers that
//! want diagnostics can show them without changing what counts as a chord.

use serde::{Deserialize, Serialize};

/// One note about a span the tokenizer skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub span: Option<(usize, usize)>, // (start, end) byte offsets
    pub suggestion: Option<String>,
}

impl Feedback {
    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Warning,
            message: message.into(),
            line,
            column,
            span: None,
            suggestion: None,
        }
    }

    pub fn info(message: impl Into<String>, line: usize, column: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Info,
            message: message.into(),
            line,
            column,
            span: None,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Looks like a chord that was mistyped
    Warning,
    /// Skipped content (separators, empty brackets, annotations)
    Info,
}

/// Collector for feedback while scanning
#[derive(Debug, Default)]
pub struct FeedbackCollector {
    feedback: Vec<Feedback>,
    current_line: usize,
    current_column: usize,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        FeedbackCollector {
            feedback: Vec::new(),
            current_line: 1,
            current_column: 1,
        }
    }

    /// Update position tracking (call before recording feedback for a span)
    pub fn set_position(&mut self, line: usize, column: usize) {
        self.current_line = line;
        self.current_column = column;
    }

    /// Add info covering `span` at the current position
    pub fn info(&mut self, message: impl Into<String>, span: (usize, usize)) {
        self.feedback.push(
            Feedback::info(message, self.current_line, self.current_column)
                .with_span(span.0, span.1),
        );
    }

    /// Add a warning with suggestion covering `span` at the current position
    pub fn warning_with_suggestion(
        &mut self,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        span: (usize, usize),
    ) {
        self.feedback.push(
            Feedback::warning(message, self.current_line, self.current_column)
                .with_suggestion(suggestion)
                .with_span(span.0, span.1),
        );
    }

    pub fn into_feedback(self) -> Vec<Feedback> {
        self.feedback
    }
}

/// A value together with the feedback gathered while producing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult<T> {
    pub value: T,
    pub feedback: Vec<Feedback>,
}

impl<T> ParseResult<T> {
    pub fn new(value: T, feedback: Vec<Feedback>) -> Self {
        ParseResult { value, feedback }
    }

    /// Nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.feedback.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Warning)
    }

    /// Keep the feedback, replace the value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            value: f(self.value),
            feedback: self.feedback,
        }
    }
}
