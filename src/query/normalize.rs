//! Input normalization.

/// Lowercase `text`, drop every character that is not a letter, digit or
/// whitespace, and trim the ends.
///
/// Inner whitespace is left as-is. Note that decimal points are stripped
/// too, so `12.5` becomes `125`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
