// src/api/fetcher.rs
//! Caller-facing operations over a repository.
//!
//! Every operation returns its success flag and message next to the data;
//! aggregated operations keep partial data when they stop early.

use super::comments::assemble_comment_tree;
use super::pagination::{collect_cursor_pages, collect_numbered_pages, CursorlessPage};
use super::responses::{Comment, NoteSummary, SearchHit};
use super::types::{Collected, PageResult};
use super::XhsRepository;
use crate::types::{NoteRef, SearchQuery, UserId, UserRef};
use serde_json::Value;
use std::sync::Arc;

/// Runs single-page fetches and aggregation runs against one repository.
#[derive(Clone)]
pub struct XhsFetcher {
    repository: Arc<dyn XhsRepository>,
    cursorless: CursorlessPage,
}

impl XhsFetcher {
    pub fn new(repository: Arc<dyn XhsRepository>) -> Self {
        Self {
            repository,
            cursorless: CursorlessPage::default(),
        }
    }

    /// Sets how pages that arrive without a cursor are treated in every cursor-driven run.
    pub fn with_cursorless_policy(self, cursorless: CursorlessPage) -> Self {
        Self { cursorless, ..self }
    }

    pub async fn fetch_user_info(&self, user: &UserId) -> PageResult<Value> {
        self.repository.user_info(user).await
    }

    /// Every note a user has posted, in listing order.
    pub async fn fetch_all_user_notes(&self, user: &UserRef) -> Collected<NoteSummary> {
        let repo = self.repository.as_ref();
        let notes = collect_cursor_pages(String::new(), self.cursorless, |cursor| async move {
            repo.user_notes_page(user, &cursor).await
        })
        .await;

        log::info!(
            "User {}: {} note(s) listed (ok: {})",
            user.id,
            notes.len(),
            notes.is_ok()
        );
        notes
    }

    /// Note detail; preceded by the client's randomized pause.
    pub async fn fetch_note_detail(&self, note: &NoteRef) -> PageResult<Value> {
        self.repository.note_detail(note).await
    }

    pub async fn fetch_search_suggestions(&self, word: &str) -> PageResult<Value> {
        self.repository.search_suggestions(word).await
    }

    /// The first `required` search hits for a query.
    pub async fn fetch_search_results(&self, query: &SearchQuery, required: usize) -> Collected<SearchHit> {
        let repo = self.repository.as_ref();
        let hits = collect_numbered_pages(required, |page| async move {
            repo.search_notes_page(query, page).await
        })
        .await;

        log::info!(
            "Search '{}': {} of {} requested hit(s) (ok: {})",
            query.keyword,
            hits.len(),
            required,
            hits.is_ok()
        );
        hits
    }

    /// All top-level comments of a note with every reply thread expanded.
    pub async fn fetch_all_comments(&self, note: &NoteRef) -> Collected<Comment> {
        assemble_comment_tree(self.repository.as_ref(), note, self.cursorless).await
    }
}
