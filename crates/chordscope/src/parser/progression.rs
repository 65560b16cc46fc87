//! Bracket-delimited progression scanning: `[C][Am][F][G7]`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use winnow::combinator::delimited;
use winnow::prelude::*;
use winnow::token::take_while;

use super::symbol::note_name;
use crate::feedback::{FeedbackCollector, ParseResult};

type PResult<T> = winnow::ModalResult<T>;

/// A chord symbol taken from one bracket pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordToken {
    /// Trimmed inner text.
    pub symbol: String,
    /// Byte offsets of the whole `[...]` span in the input.
    pub span: (usize, usize),
}

/// Accepted chord tokens in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progression {
    pub tokens: Vec<ChordToken>,
}

impl Progression {
    pub fn symbols(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Inner text of a `[...]` span: one or more characters that are not `]`.
fn bracketed<'s>(input: &mut &'s str) -> PResult<&'s str> {
    delimited('[', take_while(1.., |c: char| c != ']'), ']').parse_next(input)
}

/// Why a bracket span was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Empty,
    Separator,
    LowercaseRoot,
    NoRoot,
}

fn check_symbol(symbol: &str) -> Result<(), Rejection> {
    if symbol.is_empty() {
        return Err(Rejection::Empty);
    }
    if symbol == "|" {
        return Err(Rejection::Separator);
    }

    let mut rest = symbol;
    if note_name(&mut rest).is_ok() {
        return Ok(());
    }

    if symbol.starts_with(|c: char| ('a'..='g').contains(&c)) {
        Err(Rejection::LowercaseRoot)
    } else {
        Err(Rejection::NoRoot)
    }
}

/// Scan `input` for bracketed chord symbols.
///
/// Spans are matched left to right without overlap. An unclosed `[` and an
/// empty `[]` are not spans; scanning resumes one character later. Spans whose
/// trimmed text is empty, `|`, or does not begin with a note name are dropped
/// from the progression and reported in the feedback.
pub fn scan_progression(input: &str) -> ParseResult<Progression> {
    let mut collector = FeedbackCollector::new();
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find('[') {
        rest = &rest[open..];
        let start = input.len() - rest.len();

        let mut cursor = rest;
        let inner = match bracketed(&mut cursor) {
            Ok(inner) => inner,
            Err(_) => {
                rest = &rest[1..];
                continue;
            }
        };
        rest = cursor;
        let end = input.len() - rest.len();
        let symbol = inner.trim();

        match check_symbol(symbol) {
            Ok(()) => tokens.push(ChordToken {
                symbol: symbol.to_string(),
                span: (start, end),
            }),
            Err(rejection) => {
                debug!(symbol, start, ?rejection, "dropping bracket span");
                let (line, column) = line_col(input, start);
                collector.set_position(line, column);
                match rejection {
                    Rejection::Empty => collector.info("Empty chord brackets", (start, end)),
                    Rejection::Separator => {
                        collector.info("Bar separator inside brackets", (start, end))
                    }
                    Rejection::LowercaseRoot => {
                        let mut chars = symbol.chars();
                        let suggestion = chars
                            .next()
                            .map(|c| c.to_ascii_uppercase().to_string() + chars.as_str())
                            .unwrap_or_default();
                        collector.warning_with_suggestion(
                            format!("'{}' has a lowercase root", symbol),
                            suggestion,
                            (start, end),
                        );
                    }
                    Rejection::NoRoot => collector.info(
                        format!("'{}' does not start with a note name A-G", symbol),
                        (start, end),
                    ),
                }
            }
        }
    }

    ParseResult::new(Progression { tokens }, collector.into_feedback())
}

/// Chord symbols of `input` in order, with rejected spans silently dropped.
pub fn extract_chords(input: &str) -> Vec<String> {
    scan_progression(input).value.symbols()
}

/// 1-based line and column (in chars) of a byte offset.
fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before[line_start..].chars().count() + 1)
}
