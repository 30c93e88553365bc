//! Dictated transcripts.
//!
//! Speech recognition happens outside this crate; transcripts arrive as finished strings.
//! [`TranscriptLog`] records what was submitted and [`parse_history`] decodes a history body
//! returned by the transcript endpoint.

use crate::constants::{HISTORY_INVALID_ENTRY, HISTORY_UNKNOWN_FORMAT};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use clinic_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;

/// Decode a history response body into display strings.
///
/// The body is expected to be a JSON array. Each element becomes one entry:
/// a string is kept as is, an object contributes its `text` field, and anything else becomes
/// a placeholder. An empty body means no history.
///
/// # Errors
///
/// `CoreError::Deserialization` if a non-empty body is not valid JSON, and
/// `CoreError::InvalidInput` if it is valid JSON but not an array.
pub fn parse_history(body: &str) -> CoreResult<Vec<String>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body).map_err(CoreError::Deserialization)?;
    let Value::Array(elements) = value else {
        return Err(CoreError::InvalidInput(
            "transcript history is not a JSON array".into(),
        ));
    };

    Ok(elements.into_iter().map(history_entry_text).collect())
}

fn history_entry_text(element: Value) -> String {
    match element {
        Value::String(text) => text,
        Value::Object(mut fields) => match fields.remove("text") {
            None | Some(Value::Null) => HISTORY_INVALID_ENTRY.to_string(),
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
        },
        _ => HISTORY_UNKNOWN_FORMAT.to_string(),
    }
}

/// A transcript accepted by the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub received_at: DateTime<Utc>,
}

/// Append-only list of submitted transcripts, oldest first.
#[derive(Debug, Default)]
pub struct TranscriptLog {
    entries: RwLock<Vec<TranscriptEntry>>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transcript; blank text is rejected.
    pub fn record(&self, text: &str) -> CoreResult<TranscriptEntry> {
        let text = NonEmptyText::new(text)?;
        let entry = TranscriptEntry {
            text: text.into_inner(),
            received_at: Utc::now(),
        };
        self.entries.write()?.push(entry.clone());
        tracing::info!("recorded transcript ({} chars)", entry.text.chars().count());
        Ok(entry)
    }

    pub fn entries(&self) -> CoreResult<Vec<TranscriptEntry>> {
        Ok(self.entries.read()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_mixed_elements() {
        let body = r#"["plain note", {"text": "from object"}, {"other": 1}, {"text": null}, 42, {"text": 7}, [1]]"#;
        let entries = parse_history(body).expect("valid array");
        assert_eq!(
            entries,
            vec![
                "plain note",
                "from object",
                HISTORY_INVALID_ENTRY,
                HISTORY_INVALID_ENTRY,
                HISTORY_UNKNOWN_FORMAT,
                "7",
                HISTORY_UNKNOWN_FORMAT,
            ]
        );
    }

    #[test]
    fn test_parse_history_empty_body() {
        assert!(parse_history("").unwrap().is_empty());
        assert!(parse_history("  \n ").unwrap().is_empty());
        assert!(parse_history("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_history_rejects_non_arrays() {
        assert!(matches!(
            parse_history("{\"text\": \"x\"}"),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_history("not json"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn test_log_records_trimmed_text() {
        let log = TranscriptLog::new();
        let entry = log.record("  patient reports mild headache ").expect("record");
        assert_eq!(entry.text, "patient reports mild headache");
        assert!(log.record("   ").is_err());
        assert_eq!(log.entries().unwrap(), vec![entry]);
    }
}
