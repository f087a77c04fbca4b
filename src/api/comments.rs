// src/api/comments.rs
//! Two-level comment tree assembly.
//!
//! Top-level comments are paged first; every comment that announces more
//! replies than it embeds then gets its own reply pagination, whose items are
//! appended to its `sub_comments`.

use super::pagination::{collect_cursor_pages, CursorlessPage};
use super::responses::Comment;
use super::types::{Collected, CommentThread};
use super::XhsRepository;
use crate::types::NoteRef;

/// Fetches all top-level comments of a note and expands every reply thread.
///
/// The first failure ends the assembly. Threads expanded before it keep their
/// replies; the failing thread keeps only the replies it was delivered with.
pub async fn assemble_comment_tree<R>(
    repo: &R,
    note: &NoteRef,
    cursorless: CursorlessPage,
) -> Collected<Comment>
where
    R: XhsRepository + ?Sized,
{
    let top_level = collect_cursor_pages(String::new(), cursorless, |cursor| async move {
        repo.top_comments_page(note, &cursor).await
    })
    .await;

    let (ok, message, mut nodes) = top_level.into_parts();
    if !ok {
        return Collected::failed(message, nodes);
    }

    let mut replies_fetched = 0usize;
    for index in 0..nodes.len() {
        let expanded = expand_replies(repo, note, &mut nodes[index], cursorless).await;
        match expanded {
            Ok(count) => replies_fetched += count,
            Err(reason) => {
                log::warn!(
                    "Reply thread {} of note {} failed: {}",
                    nodes[index].id,
                    note.id,
                    reason
                );
                return Collected::failed(reason, nodes);
            }
        }
    }

    log::info!(
        "Note {}: {} top-level comment(s), {} additional repl(ies) fetched",
        note.id,
        nodes.len(),
        replies_fetched
    );
    Collected::complete(message, nodes)
}

/// Pages the remaining replies of one top-level comment into its `sub_comments`.
///
/// Returns the number of replies appended.
async fn expand_replies<R>(
    repo: &R,
    note: &NoteRef,
    node: &mut Comment,
    cursorless: CursorlessPage,
) -> Result<usize, String>
where
    R: XhsRepository + ?Sized,
{
    if !node.sub_comment_has_more {
        return Ok(0);
    }

    let thread = CommentThread::of(node, &note.xsec_token);
    let thread = &thread;
    let replies = collect_cursor_pages(node.sub_comment_cursor.clone(), cursorless, |cursor| async move {
        repo.nested_comments_page(thread, &cursor).await
    })
    .await;

    let (ok, message, fetched) = replies.into_parts();
    if !ok {
        return Err(message);
    }

    let count = fetched.len();
    node.sub_comments.extend(fetched);
    Ok(count)
}
