// src/analytics/mod.rs
//! Measurement of harvested comment trees for user-facing summaries.

use crate::api::responses::Comment;

/// Quick statistics for the completion summary (e.g., "42 comments, 17 replies").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentTreeStats {
    pub top_level: usize,
    pub replies: usize,
    /// Top-level comments carrying at least one reply.
    pub threads_with_replies: usize,
}

impl CommentTreeStats {
    pub fn total(&self) -> usize {
        self.top_level + self.replies
    }
}

/// Measures a comment tree.
pub fn measure_comments(comments: &[Comment]) -> CommentTreeStats {
    comments
        .iter()
        .fold(CommentTreeStats::default(), |mut stats, comment| {
            let replies = comment.reply_count();
            stats.top_level += 1;
            stats.replies += replies;
            if replies > 0 {
                stats.threads_with_replies += 1;
            }
            stats
        })
}
