//! Typed filter expressions over the `vessels` table.
//!
//! A filter is the only way a query reaches the store, and it always
//! translates to a fixed WHERE clause with bound parameters. Filters also
//! travel through download links as an opaque URL-safe token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rusqlite::types::Value as SqlValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding a download token.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid filter token encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid filter token payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A single filter over vessel records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VesselFilter {
    /// `speed_knots BETWEEN min AND max`; a reversed range matches nothing.
    SpeedBetween { min: f64, max: f64 },
    /// Case-insensitive exact owner match.
    OwnerIs { owner: String },
    /// Case-insensitive exact name match.
    NameIs { name: String },
    /// Case-insensitive exact status match.
    StatusIs { status: String },
    /// Case-insensitive substring match on the flag.
    FlagContains { flag: String },
}

/// Escape LIKE wildcards so the pattern matches `text` literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl VesselFilter {
    /// WHERE clause (without the keyword) and its bound parameters.
    ///
    /// Text comparisons go through the connection's `fold_case` function
    /// (Unicode lowercase), registered by the SQLite store on every session.
    pub fn to_sql(&self) -> (&'static str, Vec<SqlValue>) {
        match self {
            Self::SpeedBetween { min, max } => (
                "speed_knots BETWEEN ?1 AND ?2",
                vec![SqlValue::Real(*min), SqlValue::Real(*max)],
            ),
            Self::OwnerIs { owner } => (
                "fold_case(owner) = ?1",
                vec![SqlValue::Text(owner.to_lowercase())],
            ),
            Self::NameIs { name } => (
                "fold_case(vessel_name) = ?1",
                vec![SqlValue::Text(name.to_lowercase())],
            ),
            Self::StatusIs { status } => (
                "fold_case(status) = ?1",
                vec![SqlValue::Text(status.to_lowercase())],
            ),
            Self::FlagContains { flag } => (
                "fold_case(flag) LIKE ?1 ESCAPE '\\'",
                vec![SqlValue::Text(format!("%{}%", escape_like(&flag.to_lowercase())))],
            ),
        }
    }

    /// Encode as an opaque, URL-safe token.
    pub fn to_token(&self) -> String {
        // Serializing a plain enum of strings and floats cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token produced by [`VesselFilter::to_token`].
    pub fn from_token(token: &str) -> Result<Self, FilterError> {
        let json = URL_SAFE_NO_PAD.decode(token.trim())?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Relative download link for this filter's result set.
    pub fn download_link(&self) -> String {
        format!("/download?filter={}", self.to_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_with_hostile_text() {
        let filter = VesselFilter::OwnerIs {
            owner: "x' OR '1'='1; DROP TABLE vessels; --".to_string(),
        };
        let token = filter.to_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(VesselFilter::from_token(&token).unwrap(), filter);
    }

    #[test]
    fn test_bad_tokens_rejected() {
        assert!(matches!(
            VesselFilter::from_token("not base64!"),
            Err(FilterError::Encoding(_))
        ));
        let token = URL_SAFE_NO_PAD.encode(br#"{"kind":"teleport"}"#);
        assert!(matches!(
            VesselFilter::from_token(&token),
            Err(FilterError::Payload(_))
        ));
    }

    #[test]
    fn test_sql_never_contains_user_text() {
        let filter = VesselFilter::FlagContains {
            flag: "pan'ama".to_string(),
        };
        let (clause, params) = filter.to_sql();
        assert!(!clause.contains("pan"));
        assert_eq!(params, vec![SqlValue::Text("%pan'ama%".to_string())]);
    }

    #[test]
    fn test_flag_pattern_escapes_wildcards() {
        let filter = VesselFilter::FlagContains {
            flag: "100%_Sure".to_string(),
        };
        let (_, params) = filter.to_sql();
        assert_eq!(params, vec![SqlValue::Text(r"%100\%\_sure%".to_string())]);
    }

    #[test]
    fn test_download_link() {
        let filter = VesselFilter::StatusIs {
            status: "docked".to_string(),
        };
        let link = filter.download_link();
        let token = link.strip_prefix("/download?filter=").unwrap();
        assert_eq!(VesselFilter::from_token(token).unwrap(), filter);
    }
}
