// src/api/mod.rs
//! Web API interaction: single-page fetches, pagination and comment trees.
//!
//! The aggregation logic depends only on the [`XhsRepository`] trait;
//! [`XhsHttpClient`] is the production implementation.

pub mod client;
pub mod comments;
pub mod fetcher;
pub mod pacing;
pub mod pagination;
pub mod parser;
pub mod responses;
pub mod signing;
pub mod types;

use crate::types::{NoteRef, SearchQuery, UserId, UserRef};
use serde_json::Value;

use self::responses::{Comment, NoteSummary, SearchHit};
use self::types::{CommentThread, ListPage, PageResult};

/// The ability to fetch single pages from the web API.
///
/// Each method performs at most one round-trip and never fails with an
/// error: failures come back as a `PageResult` with `ok == false`.
#[async_trait::async_trait]
pub trait XhsRepository: Send + Sync {
    /// Profile of one user; the payload is the full response document.
    async fn user_info(&self, user: &UserId) -> PageResult<Value>;

    /// One page of a user's posted notes.
    async fn user_notes_page(&self, user: &UserRef, cursor: &str) -> PageResult<ListPage<NoteSummary>>;

    /// Detail of one note; the payload is the full response document.
    async fn note_detail(&self, note: &NoteRef) -> PageResult<Value>;

    /// Keyword suggestions for a partial query.
    async fn search_suggestions(&self, word: &str) -> PageResult<Value>;

    /// One page (1-based) of keyword search results.
    async fn search_notes_page(&self, query: &SearchQuery, page: u32) -> PageResult<ListPage<SearchHit>>;

    /// One page of a note's top-level comments.
    async fn top_comments_page(&self, note: &NoteRef, cursor: &str) -> PageResult<ListPage<Comment>>;

    /// One page of replies under a top-level comment.
    async fn nested_comments_page(
        &self,
        thread: &CommentThread,
        cursor: &str,
    ) -> PageResult<ListPage<Comment>>;
}

// Re-export the public interface
pub use client::{ClientSettings, XhsHttpClient};
pub use fetcher::XhsFetcher;
pub use pagination::CursorlessPage;
