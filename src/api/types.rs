// src/api/types.rs
//! Type definitions for the API module.
//!
//! Every single-page call ends in a [`PageResult`], every aggregation run in a
//! [`Collected`]. Both carry the success flag and the message next to the data
//! so partial failures never need to travel as errors.

use crate::error::AppError;
use crate::types::{CommentId, NoteId};
use serde::Serialize;

use super::responses::Comment;

// --- Single-page results ---

/// Normalized outcome of exactly one network round-trip.
///
/// The payload is present if and only if the call succeeded; the private
/// fields keep that invariant out of callers' hands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    ok: bool,
    message: String,
    #[serde(rename = "data")]
    payload: Option<T>,
}

impl<T> PageResult<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            payload: None,
        }
    }

    /// Flattens an internal result into the tri-part form; errors become their message.
    pub fn from_result(result: Result<(String, T), AppError>) -> Self {
        match result {
            Ok((message, payload)) => Self::success(message, payload),
            Err(err) => Self::failure(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// `Ok((message, payload))` on success, `Err(message)` on failure.
    pub fn into_outcome(self) -> Result<(String, T), String> {
        match self.payload {
            Some(payload) if self.ok => Ok((self.message, payload)),
            _ => Err(self.message),
        }
    }

    /// Maps the payload while preserving the flag and message.
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnOnce(T) -> U,
    {
        PageResult {
            ok: self.ok,
            message: self.message,
            payload: self.payload.map(f),
        }
    }
}

// --- Aggregated results ---

/// Outcome of one aggregation run.
///
/// `items` holds everything accumulated before the run stopped, also when it
/// stopped because a page failed; `ok` tells whether that list is complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collected<T> {
    ok: bool,
    message: String,
    items: Vec<T>,
}

impl<T> Collected<T> {
    pub fn complete(message: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            items,
        }
    }

    pub fn failed(message: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn into_parts(self) -> (bool, String, Vec<T>) {
        (self.ok, self.message, self.items)
    }
}

// --- Paged responses ---

/// The validated view of one page of a listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Continuation token; `None` when the response carried no cursor at all.
    pub cursor: Option<String>,
    pub has_more: bool,
}

impl<T> ListPage<T> {
    /// A page that ends pagination without contributing items.
    pub fn exhausted() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            has_more: false,
        }
    }
}

// --- Request context ---

/// Identifies the reply thread under one top-level comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub note_id: NoteId,
    pub root_comment_id: CommentId,
    pub xsec_token: String,
}

impl CommentThread {
    pub fn of(root: &Comment, xsec_token: &str) -> Self {
        Self {
            note_id: root.note_id.clone(),
            root_comment_id: root.id.clone(),
            xsec_token: xsec_token.to_string(),
        }
    }
}
