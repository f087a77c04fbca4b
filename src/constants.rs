// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how the client
//! talks to the platform: where it sends requests, how much each page holds,
//! how long it pauses.

// ---------------------------------------------------------------------------
// Platform endpoints
// ---------------------------------------------------------------------------

/// Origin of the web API every request is sent to.
pub const API_BASE_URL: &str = "https://edith.xiaohongshu.com";

/// Origin of the public website; note links are built against it.
pub const WEB_ORIGIN: &str = "https://www.xiaohongshu.com";

/// `xsec_source` assumed when a link does not carry one.
pub const DEFAULT_XSEC_SOURCE: &str = "pc_search";

/// Image formats every listing endpoint is asked for.
pub const IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

// ---------------------------------------------------------------------------
// Page sizes (fixed per endpoint, not caller-tunable)
// ---------------------------------------------------------------------------

/// Notes per page when listing a user's posts.
pub const USER_NOTES_PAGE_SIZE: u32 = 30;

/// Hits per page of keyword search.
pub const SEARCH_PAGE_SIZE: u32 = 20;

/// Replies per page when expanding a comment thread.
pub const NESTED_COMMENTS_PAGE_SIZE: u32 = 10;

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Lower bound of the pause taken before every note-detail request.
///
/// The detail endpoint is the one the platform watches most closely;
/// spacing the calls out keeps long harvests below its rate limits.
pub const DETAIL_DELAY_MIN_SECS: u64 = 5;

/// Upper bound of the pause taken before every note-detail request.
pub const DETAIL_DELAY_MAX_SECS: u64 = 10;

/// Timeout for a single HTTP round-trip.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Request identity
// ---------------------------------------------------------------------------

/// Browser identity presented to the web API.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Length of the random `search_id` attached to every search page request.
pub const SEARCH_ID_LENGTH: usize = 21;

/// Length of the `x-b3-traceid` header value.
pub const TRACE_ID_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
