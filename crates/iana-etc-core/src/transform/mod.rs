//! Registry record filtering and flat-file generation.
//!
//! Both transformers share the same shape: stream records out of a
//! [`RegistryReader`](crate::registry::RegistryReader), drop the ones that
//! name unusable assignments, normalize the survivors, and emit one
//! whitespace-column line each. The differences live in the submodules:
//!
//! - [`services`]: port/service assignments, deduplicated on the formatted
//!   entry string
//! - [`protocols`]: protocol-number assignments, no deduplication
//!
//! Records whose description (or, for protocols, name) mentions an
//! unassigned, deprecated, reserved, or historic assignment are dropped,
//! matching how the `services(5)` and `protocols(5)` databases are curated.

mod protocols;
mod services;

pub use protocols::{generate_protocols, write_protocols};
pub use services::{generate_services, write_services};

use crate::error::{Error, Result};

/// Description/name substrings marking records that never reach the output
const IGNORE_MARKERS: [&str; 4] = ["unassigned", "deprecated", "reserved", "historic"];

/// Whether a description or name marks the record as unusable.
///
/// Case-insensitive substring match; an absent description is passed in as
/// the empty string and never matches.
fn is_ignored(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    IGNORE_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn has_whitespace(text: &str) -> bool {
    text.chars().any(char::is_whitespace)
}

/// Parses an integer record field, surfacing the field name on failure
fn parse_int_field(field: &'static str, text: &str) -> Result<u32> {
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|e| Error::invalid_number(field, trimmed, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_markers_match_any_case() {
        assert!(is_ignored("Deprecated"));
        assert!(is_ignored("IANA assigned this well-known port, now RESERVED"));
        assert!(is_ignored("historic, not usable"));
        assert!(is_ignored("Unassigned"));
        assert!(!is_ignored("Hypertext Transfer Protocol"));
        assert!(!is_ignored(""));
    }

    #[test]
    fn test_has_whitespace() {
        assert!(has_whitespace("two words"));
        assert!(has_whitespace("tab\tseparated"));
        assert!(has_whitespace(" leading"));
        assert!(!has_whitespace("hyphen-ok"));
    }

    #[test]
    fn test_parse_int_field() {
        assert_eq!(parse_int_field("number", "80").unwrap(), 80);
        assert_eq!(parse_int_field("number", " 80 ").unwrap(), 80);
        let err = parse_int_field("number", "eighty").unwrap_err();
        assert!(err.to_string().contains("number"));
    }
}
