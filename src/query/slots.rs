//! Slot extractors.
//!
//! Each extractor is a pure function over normalized text. None of them
//! fail: a missing slot is `None` (or an empty string for the flag).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FLAG_STOP_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"the|under|registered").expect("static regex"));
static FLAG_STOP_WORDS_BOUNDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:the|under|registered)\b").expect("static regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Phrases that introduce a vessel name, in priority order.
pub const VESSEL_NAME_PHRASES: [&str; 7] = [
    "named",
    "called",
    "find vessel",
    "search for",
    "tell me about",
    "look for",
    "find",
];

/// Canonical statuses, in priority order.
pub const STATUSES: [&str; 3] = ["in transit", "docked", "active"];

/// Which extraction rules to apply.
///
/// `Legacy` reproduces the historical behaviour exactly, including two
/// known quirks: speed bounds are taken in the order they appear, and
/// flag stop words are removed as raw substrings. `Corrected` sorts the
/// bounds and strips stop words only as whole words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    #[default]
    Legacy,
    Corrected,
}

/// Inclusive speed bounds in knots, in the order the user gave them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

fn is_plain_decimal(token: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Pull a speed range out of `text`.
///
/// Succeeds only when exactly two whitespace-separated tokens are
/// non-negative decimals. The bounds are not reordered.
pub fn extract_speed_range(text: &str) -> Option<SpeedRange> {
    let speeds: Vec<f64> = text
        .split_whitespace()
        .filter(|token| is_plain_decimal(token))
        .filter_map(|token| token.parse::<f64>().ok())
        .collect();

    match speeds.as_slice() {
        [min, max] => Some(SpeedRange { min: *min, max: *max }),
        _ => None,
    }
}

/// Like [`extract_speed_range`], but returns the bounds in ascending order.
pub fn extract_speed_range_sorted(text: &str) -> Option<SpeedRange> {
    extract_speed_range(text).map(|range| SpeedRange {
        min: range.min.min(range.max),
        max: range.min.max(range.max),
    })
}

/// Everything after the last occurrence of "flag" (or the whole text when
/// absent), with "the", "under" and "registered" removed as substrings.
pub fn extract_flag(text: &str) -> String {
    let tail = text.rsplit("flag").next().unwrap_or(text).trim();
    FLAG_STOP_WORDS.replace_all(tail, "").trim().to_string()
}

/// Like [`extract_flag`], but only whole stop words are removed and the
/// remaining words are joined by single spaces.
pub fn extract_flag_bounded(text: &str) -> String {
    let tail = text.rsplit("flag").next().unwrap_or(text);
    let stripped = FLAG_STOP_WORDS_BOUNDED.replace_all(tail, " ");
    WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
}

/// Everything after the last occurrence of "owned by", trimmed.
pub fn extract_owner(text: &str) -> Option<String> {
    text.rfind("owned by")
        .map(|idx| text[idx + "owned by".len()..].trim().to_string())
}

/// Everything after the first trigger phrase that occurs in `text`.
///
/// Phrases are tried in [`VESSEL_NAME_PHRASES`] order; the first phrase in
/// that list wins even if another phrase appears earlier in the text.
pub fn extract_vessel_name(text: &str) -> Option<String> {
    VESSEL_NAME_PHRASES.iter().find_map(|phrase| {
        text.find(phrase)
            .map(|idx| text[idx + phrase.len()..].trim().to_string())
    })
}

/// The first canonical status contained in `text`.
pub fn extract_status(text: &str) -> Option<&'static str> {
    STATUSES.iter().copied().find(|status| text.contains(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::normalize::normalize;

    #[test]
    fn test_speed_range_two_numbers() {
        let range = extract_speed_range("show me vessels with speed 10 20").unwrap();
        assert_eq!(range, SpeedRange { min: 10.0, max: 20.0 });
    }

    #[test]
    fn test_speed_range_decimals() {
        let range = extract_speed_range("speed 8.5 and 12").unwrap();
        assert_eq!(range, SpeedRange { min: 8.5, max: 12.0 });
    }

    #[test]
    fn test_speed_range_wrong_count() {
        assert_eq!(extract_speed_range("speed 10 20 30"), None);
        assert_eq!(extract_speed_range("speed 10"), None);
        assert_eq!(extract_speed_range("how fast is it"), None);
    }

    #[test]
    fn test_speed_range_ignores_non_numeric_tokens() {
        assert_eq!(extract_speed_range("speed 1.2.3 10 20 x5 -3"), Some(SpeedRange { min: 10.0, max: 20.0 }));
        assert_eq!(extract_speed_range("speed . 10 20"), Some(SpeedRange { min: 10.0, max: 20.0 }));
    }

    #[test]
    fn test_speed_range_keeps_reversed_order() {
        let range = extract_speed_range("speed 20 10").unwrap();
        assert_eq!(range, SpeedRange { min: 20.0, max: 10.0 });

        let sorted = extract_speed_range_sorted("speed 20 10").unwrap();
        assert_eq!(sorted, SpeedRange { min: 10.0, max: 20.0 });
    }

    #[test]
    fn test_flag_after_last_flag_token() {
        assert_eq!(extract_flag("vessels under the flag of panama"), "of panama");
        assert_eq!(extract_flag("flag flag liberia"), "liberia");
        assert_eq!(extract_flag("which vessels fly the german flag"), "");
    }

    #[test]
    fn test_flag_without_flag_token_uses_whole_text() {
        assert_eq!(extract_flag("registered under panama"), "panama");
    }

    #[test]
    fn test_flag_strips_substrings_inside_words() {
        // "the" inside "netherlands" is removed too.
        assert_eq!(extract_flag("flag netherlands"), "nerlands");
        assert_eq!(extract_flag_bounded("flag netherlands"), "netherlands");
        assert_eq!(extract_flag_bounded("registered under the flag  of the  bahamas"), "of bahamas");
    }

    #[test]
    fn test_owner_after_last_occurrence() {
        assert_eq!(extract_owner("vessels owned by acme shipping").as_deref(), Some("acme shipping"));
        assert_eq!(extract_owner("owned by a owned by b").as_deref(), Some("b"));
        assert_eq!(extract_owner("who owns it"), None);
    }

    #[test]
    fn test_vessel_name_tell_me_about() {
        let text = normalize("tell me about Sea Queen");
        assert_eq!(extract_vessel_name(&text).as_deref(), Some("sea queen"));
    }

    #[test]
    fn test_vessel_name_phrase_priority_follows_list() {
        // "find" appears first in the text, but "named" is earlier in the list.
        let text = "find the vessel named ocean explorer";
        assert_eq!(extract_vessel_name(text).as_deref(), Some("ocean explorer"));

        // "find vessel" beats the bare "find".
        assert_eq!(extract_vessel_name("please find vessel atlantic star").as_deref(), Some("atlantic star"));
    }

    #[test]
    fn test_vessel_name_missing() {
        assert_eq!(extract_vessel_name("what vessel is fastest"), None);
    }

    #[test]
    fn test_status_priority() {
        assert_eq!(extract_status("active vessels in transit"), Some("in transit"));
        assert_eq!(extract_status("docked or active"), Some("docked"));
        assert_eq!(extract_status("active ones"), Some("active"));
        assert_eq!(extract_status("idle"), None);
    }
}
