//! Key strings as reported by the analysis service: "C Major", "F# Minor".

use tracing::debug;

use crate::types::{Key, Mode};

/// Parse a `main_key` value.
///
/// The string is split on single spaces and the first two parts are read as
/// root and mode. Fewer than two parts, a root outside the pitch-class table,
/// or a mode other than exactly `Major`/`Minor` gives `None`.
pub fn parse_main_key(value: &str) -> Option<Key> {
    let mut parts = value.split(' ');
    let (Some(root), Some(mode)) = (parts.next(), parts.next()) else {
        debug!(value, "key string has fewer than two parts");
        return None;
    };

    let Some(mode) = Mode::from_label(mode) else {
        debug!(value, mode, "unknown key mode");
        return None;
    };

    let key = Key::new(root, mode);
    if key.is_none() {
        debug!(value, root, "unknown key root");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_key() {
        let key = parse_main_key("C Major").unwrap();
        assert_eq!(key.spelling, "C");
        assert_eq!(key.root.value(), 0);
        assert_eq!(key.mode, Mode::Major);
    }

    #[test]
    fn test_parse_minor_key_with_accidental() {
        let key = parse_main_key("F# Minor").unwrap();
        assert_eq!(key.root.value(), 6);
        assert_eq!(key.mode, Mode::Minor);

        let key = parse_main_key("Bb Minor").unwrap();
        assert_eq!(key.spelling, "Bb");
        assert_eq!(key.root.value(), 10);
    }

    #[test]
    fn test_extra_parts_ignored() {
        let key = parse_main_key("G Major (relative)").unwrap();
        assert_eq!(key.mode, Mode::Major);
    }

    #[test]
    fn test_malformed_keys() {
        assert!(parse_main_key("").is_none());
        assert!(parse_main_key("C").is_none());
        assert!(parse_main_key("CMajor").is_none());
        assert!(parse_main_key("C major").is_none());
        assert!(parse_main_key("C  Major").is_none());
        assert!(parse_main_key("H Major").is_none());
        assert!(parse_main_key("Cb Major").is_none());
        assert!(parse_main_key("C Dorian").is_none());
    }
}
