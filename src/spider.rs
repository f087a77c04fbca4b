// src/spider.rs
//! Harvest runs built on top of [`XhsFetcher`].
//!
//! A run lists notes (from a user or a search), then fetches the detail of
//! each one in turn. Detail failures are recorded and skipped; a failed
//! listing ends the run with whatever it produced.

use crate::api::responses::Comment;
use crate::api::types::{Collected, PageResult};
use crate::api::XhsFetcher;
use crate::types::{NoteRef, SearchQuery, UserRef};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A note whose detail could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedNote {
    pub url: String,
    pub reason: String,
}

/// Outcome of a harvest run.
#[derive(Debug, Clone, Serialize)]
pub struct Harvest {
    /// Whether the listing step completed.
    pub ok: bool,
    pub message: String,
    /// Links of every note selected for detail fetching.
    pub note_urls: Vec<String>,
    /// Detail documents, each with its `url` attached.
    pub notes: Vec<Value>,
    pub failed: Vec<FailedNote>,
    pub harvested_at: DateTime<Utc>,
}

/// Detail documents and per-note failures of one batch.
#[derive(Debug, Clone, Default)]
pub struct NoteBatch {
    pub notes: Vec<Value>,
    pub failed: Vec<FailedNote>,
}

pub struct Spider {
    fetcher: XhsFetcher,
}

impl Spider {
    pub fn new(fetcher: XhsFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &XhsFetcher {
        &self.fetcher
    }

    /// Fetches one note and returns its document with the note link attached.
    pub async fn note(&self, note: &NoteRef) -> PageResult<Value> {
        let url = note.to_url();
        let result = match self.fetcher.fetch_note_detail(note).await.into_outcome() {
            Ok((message, body)) => match first_item(body) {
                Some(mut document) => {
                    if let Value::Object(fields) = &mut document {
                        fields.insert("url".to_string(), Value::String(url.clone()));
                    }
                    PageResult::success(message, document)
                }
                None => PageResult::failure(format!("no note document in response ({message})")),
            },
            Err(reason) => PageResult::failure(reason),
        };

        log::info!("Note {}: ok: {}, msg: {}", url, result.is_ok(), result.message());
        result
    }

    /// Fetches notes one after another, skipping the ones that fail.
    pub async fn notes(&self, notes: &[NoteRef]) -> NoteBatch {
        let mut batch = NoteBatch::default();
        for note in notes {
            let result = self.note(note).await;
            let message = result.message().to_string();
            match result.into_payload() {
                Some(document) => batch.notes.push(document),
                None => batch.failed.push(FailedNote {
                    url: note.to_url(),
                    reason: message,
                }),
            }
        }
        batch
    }

    /// Lists every note of a user, then fetches the first `limit` of them.
    pub async fn user_notes(&self, user: &UserRef, limit: usize) -> Harvest {
        let listing = self.fetcher.fetch_all_user_notes(user).await;
        log::info!("User {}: {} note(s) posted", user.id, listing.len());

        let (ok, message, summaries) = listing.into_parts();
        let selected: Vec<NoteRef> = summaries
            .iter()
            .take(limit)
            .map(|summary| summary.note_ref())
            .collect();

        self.harvest(ok, message, selected).await
    }

    /// Searches for `count` hits, keeps the notes among them and fetches each one.
    pub async fn search_notes(&self, query: &SearchQuery, count: usize) -> Harvest {
        let hits = self.fetcher.fetch_search_results(query, count).await;
        let (ok, message, hits) = hits.into_parts();

        let mut selected = Vec::new();
        for hit in hits.iter().filter(|hit| hit.is_note()) {
            match hit.note_ref() {
                Ok(note) => selected.push(note),
                Err(e) => log::warn!("Skipping search hit '{}': {}", hit.id, e),
            }
        }
        log::info!("Search '{}': {} note(s) found", query.keyword, selected.len());

        self.harvest(ok, message, selected).await
    }

    /// The full comment tree of a note.
    pub async fn comments(&self, note: &NoteRef) -> Collected<Comment> {
        self.fetcher.fetch_all_comments(note).await
    }

    async fn harvest(&self, ok: bool, message: String, selected: Vec<NoteRef>) -> Harvest {
        let batch = self.notes(&selected).await;
        Harvest {
            ok,
            message,
            note_urls: selected.iter().map(NoteRef::to_url).collect(),
            notes: batch.notes,
            failed: batch.failed,
            harvested_at: Utc::now(),
        }
    }
}

/// Takes `data.items[0]` out of a detail response.
fn first_item(mut body: Value) -> Option<Value> {
    match body.pointer_mut("/data/items/0") {
        Some(item) if !item.is_null() => Some(item.take()),
        _ => None,
    }
}
