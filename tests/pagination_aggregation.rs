//! Aggregation runs over user notes and search results, driven through
//! `XhsFetcher` against a scripted repository.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use xhs_harvest::{CursorlessPage, SearchQuery, XhsFetcher};

fn fetcher(repo: &Arc<ScriptedRepository>) -> XhsFetcher {
    XhsFetcher::new(repo.clone())
}

fn note_ids(notes: &[xhs_harvest::NoteSummary]) -> Vec<String> {
    notes.iter().map(|n| n.note_id.to_string()).collect()
}

#[tokio::test]
async fn test_user_notes_across_three_pages() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), Some("c1"), true))
            .with_user_notes_page(page(note_summaries(30, 30), Some("c2"), true))
            .with_user_notes_page(page(note_summaries(60, 5), Some("c3"), false)),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(notes.is_ok());
    assert_eq!(notes.len(), 65);
    let expected: Vec<String> = (0..65).map(|i| format!("n{}", i)).collect();
    assert_eq!(note_ids(notes.items()), expected);
    assert_eq!(
        repo.calls(),
        vec![
            Call::UserNotes { cursor: String::new() },
            Call::UserNotes { cursor: "c1".to_string() },
            Call::UserNotes { cursor: "c2".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_cursorless_final_page_is_merged_by_default() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), Some("c1"), true))
            .with_user_notes_page(page(note_summaries(30, 30), Some("c2"), true))
            .with_user_notes_page(page(note_summaries(60, 5), None, false)),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(notes.is_ok());
    assert_eq!(notes.len(), 65);
}

#[tokio::test]
async fn test_cursorless_final_page_can_be_discarded() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), Some("c1"), true))
            .with_user_notes_page(page(note_summaries(30, 30), Some("c2"), true))
            .with_user_notes_page(page(note_summaries(60, 5), None, false)),
    );

    let notes = fetcher(&repo)
        .with_cursorless_policy(CursorlessPage::Discard)
        .fetch_all_user_notes(&user_ref())
        .await;

    assert!(notes.is_ok());
    assert_eq!(notes.len(), 60);
    assert_eq!(repo.count_calls(|c| matches!(c, Call::UserNotes { .. })), 3);
}

#[tokio::test]
async fn test_missing_cursor_ends_run_even_if_more_announced() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), None, true))
            .with_user_notes_page(page(note_summaries(30, 30), Some("c2"), false)),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(notes.is_ok());
    assert_eq!(notes.len(), 30);
    assert_eq!(repo.calls().len(), 1);
}

#[tokio::test]
async fn test_failure_keeps_items_of_earlier_pages() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), Some("c1"), true))
            .with_user_notes_page(xhs_harvest::PageResult::failure("登录已过期")),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(!notes.is_ok());
    assert_eq!(notes.message(), "登录已过期");
    assert_eq!(notes.len(), 30);
    assert_eq!(repo.calls().len(), 2);
}

#[tokio::test]
async fn test_empty_page_stops_despite_has_more() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_user_notes_page(page(note_summaries(0, 30), Some("c1"), true))
            .with_user_notes_page(page(Vec::new(), Some("c2"), true)),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(notes.is_ok());
    assert_eq!(notes.len(), 30);
    assert_eq!(repo.calls().len(), 2);
}

#[tokio::test]
async fn test_user_without_notes() {
    let repo = Arc::new(
        ScriptedRepository::new().with_user_notes_page(page(Vec::new(), Some(""), false)),
    );

    let notes = fetcher(&repo).fetch_all_user_notes(&user_ref()).await;

    assert!(notes.is_ok());
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_search_truncates_to_required_count() {
    let repo = Arc::new(
        ScriptedRepository::new().with_search_page(page(search_hits(0, 20), None, true)),
    );
    let query = SearchQuery::new("咖啡").unwrap();

    let hits = fetcher(&repo).fetch_search_results(&query, 10).await;

    assert!(hits.is_ok());
    assert_eq!(hits.len(), 10);
    assert_eq!(hits.items()[9].id, "s9");
    assert_eq!(repo.calls(), vec![Call::Search { page: 1 }]);
}

#[tokio::test]
async fn test_search_walks_numbered_pages() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_search_page(page(search_hits(0, 20), None, true))
            .with_search_page(page(search_hits(20, 20), None, true))
            .with_search_page(page(search_hits(40, 20), None, true)),
    );
    let query = SearchQuery::new("咖啡").unwrap();

    let hits = fetcher(&repo).fetch_search_results(&query, 45).await;

    assert!(hits.is_ok());
    assert_eq!(hits.len(), 45);
    assert_eq!(
        repo.calls(),
        vec![
            Call::Search { page: 1 },
            Call::Search { page: 2 },
            Call::Search { page: 3 },
        ]
    );
}

#[tokio::test]
async fn test_search_returns_fewer_when_results_run_out() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_search_page(page(search_hits(0, 20), None, true))
            .with_search_page(page(search_hits(20, 7), None, false)),
    );
    let query = SearchQuery::new("咖啡").unwrap();

    let hits = fetcher(&repo).fetch_search_results(&query, 100).await;

    assert!(hits.is_ok());
    assert_eq!(hits.len(), 27);
    assert_eq!(repo.calls().len(), 2);
}

#[tokio::test]
async fn test_search_zero_required_makes_no_request() {
    let repo = Arc::new(ScriptedRepository::new());
    let query = SearchQuery::new("咖啡").unwrap();

    let hits = fetcher(&repo).fetch_search_results(&query, 0).await;

    assert!(hits.is_ok());
    assert!(hits.is_empty());
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_search_failure_keeps_truncated_partial_hits() {
    let repo = Arc::new(
        ScriptedRepository::new()
            .with_search_page(page(search_hits(0, 20), None, true))
            .with_search_page(xhs_harvest::PageResult::failure("访问频次异常")),
    );
    let query = SearchQuery::new("咖啡").unwrap();

    let hits = fetcher(&repo).fetch_search_results(&query, 30).await;

    assert!(!hits.is_ok());
    assert_eq!(hits.message(), "访问频次异常");
    assert_eq!(hits.len(), 20);
}
