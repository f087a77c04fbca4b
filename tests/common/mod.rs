// tests/common/mod.rs
//! Shared fixtures: a scripted in-memory repository and record builders.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use xhs_harvest::{
    Comment, CommentThread, ListPage, NoteRef, NoteSummary, PageResult, SearchHit, SearchQuery,
    UserId, UserRef, XhsRepository,
};

type Page<T> = PageResult<ListPage<T>>;

/// One request observed by [`ScriptedRepository`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UserInfo(String),
    UserNotes { cursor: String },
    NoteDetail(String),
    Suggestions(String),
    Search { page: u32 },
    TopComments { cursor: String },
    Replies { root: String, cursor: String },
}

/// Answers each endpoint from a queue of prepared pages and records every call.
///
/// An exhausted queue answers with a failure, so an unexpected extra
/// request shows up as a failed run.
#[derive(Default)]
pub struct ScriptedRepository {
    user_notes: Mutex<VecDeque<Page<NoteSummary>>>,
    search: Mutex<VecDeque<Page<SearchHit>>>,
    top_comments: Mutex<VecDeque<Page<Comment>>>,
    replies: Mutex<HashMap<String, VecDeque<Page<Comment>>>>,
    details: Mutex<HashMap<String, PageResult<Value>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_notes_page(mut self, page: Page<NoteSummary>) -> Self {
        self.user_notes.get_mut().unwrap().push_back(page);
        self
    }

    pub fn with_search_page(mut self, page: Page<SearchHit>) -> Self {
        self.search.get_mut().unwrap().push_back(page);
        self
    }

    pub fn with_top_comments_page(mut self, page: Page<Comment>) -> Self {
        self.top_comments.get_mut().unwrap().push_back(page);
        self
    }

    pub fn with_replies_page(mut self, root: &str, page: Page<Comment>) -> Self {
        self.replies
            .get_mut()
            .unwrap()
            .entry(root.to_string())
            .or_default()
            .push_back(page);
        self
    }

    pub fn with_detail(mut self, note_id: &str, result: PageResult<Value>) -> Self {
        self.details
            .get_mut()
            .unwrap()
            .insert(note_id.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next_page<T>(queue: &Mutex<VecDeque<Page<T>>>) -> Page<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| PageResult::failure("unscripted request"))
}

#[async_trait::async_trait]
impl XhsRepository for ScriptedRepository {
    async fn user_info(&self, user: &UserId) -> PageResult<Value> {
        self.record(Call::UserInfo(user.to_string()));
        PageResult::success("成功", json!({"data": {"basic_info": {"nickname": "tester"}}}))
    }

    async fn user_notes_page(&self, _user: &UserRef, cursor: &str) -> Page<NoteSummary> {
        self.record(Call::UserNotes {
            cursor: cursor.to_string(),
        });
        next_page(&self.user_notes)
    }

    async fn note_detail(&self, note: &NoteRef) -> PageResult<Value> {
        self.record(Call::NoteDetail(note.id.to_string()));
        self.details
            .lock()
            .unwrap()
            .remove(note.id.as_str())
            .unwrap_or_else(|| PageResult::failure("unscripted request"))
    }

    async fn search_suggestions(&self, word: &str) -> PageResult<Value> {
        self.record(Call::Suggestions(word.to_string()));
        PageResult::success("成功", json!({"data": {"sug_items": []}}))
    }

    async fn search_notes_page(&self, _query: &SearchQuery, page: u32) -> Page<SearchHit> {
        self.record(Call::Search { page });
        next_page(&self.search)
    }

    async fn top_comments_page(&self, _note: &NoteRef, cursor: &str) -> Page<Comment> {
        self.record(Call::TopComments {
            cursor: cursor.to_string(),
        });
        next_page(&self.top_comments)
    }

    async fn nested_comments_page(&self, thread: &CommentThread, cursor: &str) -> Page<Comment> {
        let root = thread.root_comment_id.to_string();
        self.record(Call::Replies {
            root: root.clone(),
            cursor: cursor.to_string(),
        });
        let mut replies = self.replies.lock().unwrap();
        replies
            .get_mut(&root)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| PageResult::failure("unscripted request"))
    }
}

// --- Builders ---

pub fn page<T>(items: Vec<T>, cursor: Option<&str>, has_more: bool) -> Page<T> {
    PageResult::success(
        "成功",
        ListPage {
            items,
            cursor: cursor.map(str::to_string),
            has_more,
        },
    )
}

/// Note summaries `n{start}` .. `n{start + count - 1}`.
pub fn note_summaries(start: usize, count: usize) -> Vec<NoteSummary> {
    (start..start + count)
        .map(|i| {
            serde_json::from_value(json!({
                "note_id": format!("n{}", i),
                "xsec_token": format!("tok{}", i),
                "display_title": format!("note {}", i),
            }))
            .unwrap()
        })
        .collect()
}

pub fn search_hit(id: &str, model_type: &str) -> SearchHit {
    serde_json::from_value(json!({
        "id": id,
        "model_type": model_type,
        "xsec_token": format!("tok{}", id),
    }))
    .unwrap()
}

pub fn search_hits(start: usize, count: usize) -> Vec<SearchHit> {
    (start..start + count)
        .map(|i| search_hit(&format!("s{}", i), "note"))
        .collect()
}

pub fn reply(id: &str) -> Comment {
    serde_json::from_value(json!({
        "id": id,
        "note_id": "note1",
        "content": format!("reply {}", id),
    }))
    .unwrap()
}

pub fn comment(id: &str, has_more: bool, cursor: &str, embedded: Vec<Comment>) -> Comment {
    serde_json::from_value(json!({
        "id": id,
        "note_id": "note1",
        "content": format!("comment {}", id),
        "sub_comment_has_more": has_more,
        "sub_comment_cursor": cursor,
        "sub_comments": embedded,
    }))
    .unwrap()
}

pub fn detail(note_id: &str) -> PageResult<Value> {
    PageResult::success(
        "成功",
        json!({
            "code": 0,
            "success": true,
            "msg": "成功",
            "data": {"items": [{"id": note_id, "note_card": {"title": format!("title {}", note_id)}}]},
        }),
    )
}

pub fn note_ref(id: &str) -> NoteRef {
    NoteRef::new(xhs_harvest::NoteId::parse(id).unwrap(), format!("tok{}", id))
}

pub fn user_ref() -> UserRef {
    UserRef::parse("https://www.xiaohongshu.com/user/profile/u1?xsec_token=utok").unwrap()
}
