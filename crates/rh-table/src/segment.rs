//! Parsing of `label value` segments typed by users (`STR:50`, `Move Rate 8`).

use rh_dice::split_items;

use crate::error::{TableError, TableResult};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '=' | '：')
}

/// Parse one segment into a label and a signed integer.
///
/// The value is the trailing integer, optionally signed (`luck -5`,
/// `luck - 5`); it must be separated from a non-empty label by whitespace,
/// `:`, `=` or `：`.
pub fn parse_segment(raw: &str) -> TableResult<(String, i64)> {
    let invalid = || TableError::InvalidSegment {
        raw: raw.to_string(),
    };
    let trimmed = raw.trim();
    let digits_start = trimmed
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .len();
    if digits_start == trimmed.len() {
        return Err(invalid());
    }

    let digits = &trimmed[digits_start..];
    let head = &trimmed[..digits_start];
    let (head, sign) = match head.trim_end().strip_suffix(['+', '-']) {
        Some(rest) => (rest, &head[rest.len()..rest.len() + 1]),
        None => (head, ""),
    };
    let value: i64 = format!("{sign}{digits}").parse().map_err(|_| invalid())?;
    if !head.ends_with(is_separator) {
        return Err(invalid());
    }

    let label = head.trim_end_matches(is_separator).trim();
    if label.is_empty() {
        return Err(invalid());
    }
    Ok((label.to_string(), value))
}

/// Split a list on the usual item separators and parse every segment.
pub fn parse_segments(raw: &str) -> TableResult<Vec<(String, i64)>> {
    let items = split_items(raw);
    if items.is_empty() {
        return Err(TableError::InvalidSegment {
            raw: raw.to_string(),
        });
    }
    items.iter().map(|item| parse_segment(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        assert_eq!(parse_segment("STR:50").unwrap(), ("STR".to_string(), 50));
        assert_eq!(parse_segment("luck=-5").unwrap(), ("luck".to_string(), -5));
        assert_eq!(parse_segment("DEX：60").unwrap(), ("DEX".to_string(), 60));
        assert_eq!(parse_segment("POW +3").unwrap(), ("POW".to_string(), 3));
    }

    #[test]
    fn sign_may_be_spaced_from_number() {
        assert_eq!(parse_segment("luck - 5").unwrap(), ("luck".to_string(), -5));
        assert_eq!(parse_segment("SAN: + 2").unwrap(), ("SAN".to_string(), 2));
        assert!(parse_segment("luck- 5").is_err());
    }

    #[test]
    fn multi_word_label() {
        assert_eq!(
            parse_segment("  Move Rate 8 ").unwrap(),
            ("Move Rate".to_string(), 8)
        );
        assert_eq!(
            parse_segment("Credit Rating : 30").unwrap(),
            ("Credit Rating".to_string(), 30)
        );
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["STR", "50", ":50", "STR50", "STR:", "HP 1-2", "", "X 99999999999999999999"] {
            assert_eq!(
                parse_segment(raw),
                Err(TableError::InvalidSegment {
                    raw: raw.to_string()
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn segment_lists() {
        let pairs = parse_segments("STR:50, DEX 60; CON=40|Move Rate 8").unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[3], ("Move Rate".to_string(), 8));
        assert!(parse_segments(" , ; ").is_err());
    }
}
