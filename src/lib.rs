// src/lib.rs
//! xhs-harvest library, for paginated retrieval of notes, search hits and
//! comment trees from the Xiaohongshu web API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `RemoteCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `HarvestConfig`, `HarvestTask`
//! - **Domain types**: `UserId`, `NoteId`, `CommentId`, `UserRef`, `NoteRef`, `SearchQuery`
//! - **API client**: `XhsRepository`, `XhsHttpClient`, `XhsFetcher`, paginators
//! - **Harvesting**: `Spider`, `Harvest`
//! - **Output**: `Export`, `Destination`, `deliver`

pub mod analytics;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod spider;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, RemoteCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, HarvestCommand, HarvestConfig, HarvestTask};

// --- Domain Types ---
pub use crate::types::{
    CommentId, Credentials, NoteId, NoteRef, NoteType, SearchQuery, SearchSort, UserId, UserRef,
};

// --- API Client ---
pub use crate::api::{
    comments::assemble_comment_tree,
    pacing::DelayRange,
    pagination::{collect_cursor_pages, collect_numbered_pages},
    responses::{Comment, NoteSummary, SearchHit},
    types::{Collected, CommentThread, ListPage, PageResult},
    ClientSettings, CursorlessPage, XhsFetcher, XhsHttpClient, XhsRepository,
};

// --- Harvesting ---
pub use crate::spider::{FailedNote, Harvest, NoteBatch, Spider};
