//! Chord-symbol decomposition using winnow combinators.
//!
//! Rule order is part of the contract:
//! 1. split off a slash bass (`D/F#`),
//! 2. read the root note name,
//! 3. read the quality prefix: minor, then diminished, then augmented,
//!    falling back to major,
//! 4. everything left over is the extension string.

use winnow::combinator::{alt, empty, not, opt};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::pitch::SpelledNote;
use crate::types::{Chord, Quality};

type PResult<T> = winnow::ModalResult<T>;

/// A note name: `A`-`G` with an optional `#` or `b`.
pub fn note_name<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (one_of('A'..='G'), opt(one_of(['#', 'b'])))
        .take()
        .parse_next(input)
}

/// Quality prefix of the text after the root. Never fails; no prefix is major.
pub fn quality(input: &mut &str) -> PResult<Quality> {
    alt((
        ('m', not("aj")).value(Quality::Minor),
        alt(("dim", "°")).value(Quality::Diminished),
        alt(("aug", "+")).value(Quality::Augmented),
        empty.value(Quality::Major),
    ))
    .parse_next(input)
}

/// Split `main/bass` when the symbol has exactly one `/`, something before it,
/// and a complete note name after it.
pub fn split_bass(symbol: &str) -> (&str, Option<&str>) {
    if symbol.matches('/').count() != 1 {
        return (symbol, None);
    }
    let Some((main, bass)) = symbol.split_once('/') else {
        return (symbol, None);
    };

    let mut rest = bass;
    match note_name(&mut rest) {
        Ok(name) if rest.is_empty() && !main.is_empty() => (main, Some(name)),
        _ => (symbol, None),
    }
}

/// Decompose a chord symbol into root, quality, extensions and bass.
///
/// A symbol without a leading note name (including the empty string) yields a
/// chord whose root is `None`; the remaining fields are still filled in from
/// the whole text so callers can display them.
pub fn decompose(symbol: &str) -> Chord {
    let (main, bass) = split_bass(symbol);

    let mut rest = main;
    let root = match note_name(&mut rest) {
        Ok(name) => Some(SpelledNote::new(name)),
        Err(_) => {
            rest = main;
            None
        }
    };

    let quality = quality(&mut rest).unwrap_or_default();

    Chord {
        symbol: symbol.to_string(),
        root,
        quality,
        extensions: rest.to_string(),
        bass: bass.map(SpelledNote::new),
    }
}
