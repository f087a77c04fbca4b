// src/api/responses.rs
//! Item records returned by the listing endpoints.
//!
//! Each record names the few fields this crate reads and keeps every other
//! field in an order-preserving `extra` map, so exports round-trip the
//! platform's data unchanged.

use crate::types::{CommentId, NoteId, NoteRef, ValidationError};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of a user's posted-notes listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: NoteId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub xsec_token: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl NoteSummary {
    /// Reference for fetching this note's detail or comments.
    pub fn note_ref(&self) -> NoteRef {
        NoteRef::new(self.note_id.clone(), self.xsec_token.clone())
    }
}

/// One hit of a keyword search. Hits are not always notes (e.g. `hot_query`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub xsec_token: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl SearchHit {
    pub fn is_note(&self) -> bool {
        self.model_type == "note"
    }

    pub fn note_ref(&self) -> Result<NoteRef, ValidationError> {
        Ok(NoteRef::new(NoteId::parse(&self.id)?, self.xsec_token.clone()))
    }
}

/// A comment; top-level comments carry the state of their reply thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub note_id: NoteId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_comment_has_more: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sub_comment_cursor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Comment {
    /// Number of replies in this comment's subtree.
    pub fn reply_count(&self) -> usize {
        self.sub_comments
            .iter()
            .map(|reply| 1 + reply.reply_count())
            .sum()
    }
}

/// Accepts strings, numbers and `null` (as empty) for fields the platform types loosely.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_comment_keeps_unknown_fields() {
        let raw = json!({
            "id": "c1",
            "note_id": "n1",
            "content": "好看",
            "like_count": "12",
            "sub_comment_has_more": true,
            "sub_comment_cursor": "cur-1",
            "sub_comments": [{"id": "r1", "note_id": "n1", "content": "同意"}]
        });

        let comment: Comment = serde_json::from_value(raw).unwrap();
        assert_eq!(comment.id.as_str(), "c1");
        assert!(comment.sub_comment_has_more);
        assert_eq!(comment.sub_comment_cursor, "cur-1");
        assert_eq!(comment.reply_count(), 1);
        assert_eq!(comment.extra.get("content"), Some(&json!("好看")));

        let back = serde_json::to_value(&comment).unwrap();
        assert_eq!(back["like_count"], json!("12"));
        assert_eq!(back["sub_comments"][0]["content"], json!("同意"));
    }

    #[test]
    fn test_comment_defaults_and_nulls() {
        let comment: Comment = serde_json::from_value(json!({
            "id": "c2",
            "note_id": "n1",
            "sub_comment_has_more": null,
            "sub_comment_cursor": 1700000000,
            "sub_comments": null
        }))
        .unwrap();
        assert!(!comment.sub_comment_has_more);
        assert_eq!(comment.sub_comment_cursor, "1700000000");
        assert!(comment.sub_comments.is_empty());
    }

    #[test]
    fn test_comment_requires_identity() {
        assert!(serde_json::from_value::<Comment>(json!({"note_id": "n1"})).is_err());
    }

    #[test]
    fn test_search_hit_note_ref() {
        let hit: SearchHit = serde_json::from_value(json!({
            "id": "64f0a1",
            "model_type": "note",
            "xsec_token": "tok",
            "note_card": {"display_title": "榴莲"}
        }))
        .unwrap();
        assert!(hit.is_note());
        let note = hit.note_ref().unwrap();
        assert_eq!(note.id.as_str(), "64f0a1");
        assert_eq!(note.xsec_token, "tok");
    }

    #[test]
    fn test_note_summary_missing_token_defaults_empty() {
        let summary: NoteSummary =
            serde_json::from_value(json!({"note_id": "abc123", "type": "video"})).unwrap();
        assert_eq!(summary.xsec_token, "");
        assert_eq!(summary.note_ref().id.as_str(), "abc123");
    }
}
