// src/api/client.rs
//! HTTP client for the web API.
//!
//! This module issues exactly one round-trip per operation: it builds the
//! logical request, has it signed, sends it through reqwest and hands the
//! body to the parser. Whatever goes wrong is converted into a failed
//! `PageResult` here; no error leaves a single-page fetch.

use super::pacing::DelayRange;
use super::parser::{self, MissingItems};
use super::responses::{Comment, NoteSummary, SearchHit};
use super::signing::{cookie_header, random_hex, LogicalRequest, PassthroughSigner, RequestSigner};
use super::types::{CommentThread, ListPage, PageResult};
use crate::constants::{
    API_BASE_URL, IMAGE_FORMATS, NESTED_COMMENTS_PAGE_SIZE, REQUEST_TIMEOUT_SECS,
    SEARCH_ID_LENGTH, SEARCH_PAGE_SIZE, USER_NOTES_PAGE_SIZE,
};
use crate::error::AppError;
use crate::types::{Credentials, NoteRef, SearchQuery, UserId, UserRef};
use reqwest::{header, Client, Proxy, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const USER_INFO_PATH: &str = "/api/sns/web/v1/user/otherinfo";
const USER_POSTED_PATH: &str = "/api/sns/web/v1/user_posted";
const NOTE_FEED_PATH: &str = "/api/sns/web/v1/feed";
const SEARCH_RECOMMEND_PATH: &str = "/api/sns/web/v1/search/recommend";
const SEARCH_NOTES_PATH: &str = "/api/sns/web/v1/search/notes";
const COMMENT_PAGE_PATH: &str = "/api/sns/web/v2/comment/page";
const SUB_COMMENT_PAGE_PATH: &str = "/api/sns/web/v2/comment/sub/page";

/// Read-only transport settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Proxy URL applied to all requests (`http://`, `https://` or `socks5://`).
    pub proxy: Option<String>,
    pub timeout: Duration,
    /// Pause taken before every note-detail request.
    pub detail_delay: DelayRange,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            proxy: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            detail_delay: DelayRange::default(),
        }
    }
}

/// Authenticated client for the web API.
#[derive(Clone)]
pub struct XhsHttpClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    signer: Arc<dyn RequestSigner>,
    detail_delay: DelayRange,
}

impl XhsHttpClient {
    /// Creates a client that signs with [`PassthroughSigner`].
    pub fn new(credentials: Credentials, settings: &ClientSettings) -> Result<Self, AppError> {
        let mut builder = Client::builder().timeout(settings.timeout);

        if let Some(proxy) = &settings.proxy {
            let proxy = Proxy::all(proxy.as_str()).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid proxy '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
            signer: Arc::new(PassthroughSigner),
            detail_delay: settings.detail_delay,
        })
    }

    /// Replaces the signer, e.g. with one that computes the platform's signature headers.
    pub fn with_signer(self, signer: Arc<dyn RequestSigner>) -> Self {
        Self { signer, ..self }
    }

    /// Signs and sends one request, returning the raw body.
    pub async fn send(&self, request: &LogicalRequest) -> Result<ApiResponse<String>, AppError> {
        let signed = self.signer.sign(&self.credentials, request)?;
        let url = format!("{}{}", self.base_url, request.path);
        log::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(signed.headers);
        if !signed.cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookie_header(&signed.cookies));
        }
        if let Some(body) = signed.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        extract_response_text(response).await
    }

    /// Performs one request and normalizes its outcome.
    async fn fetch<T, P>(&self, request: LogicalRequest, parse: P) -> PageResult<T>
    where
        T: Send,
        P: FnOnce(ApiResponse<String>) -> Result<(String, T), AppError> + Send,
    {
        let result = match self.send(&request).await {
            Ok(response) => parse(response),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            match err.remote_code() {
                Some(code) if code.is_session_expired() => {
                    log::warn!("Session cookies rejected on {}: {}", request.path, err)
                }
                Some(code) if code.is_risk_control() => log::warn!(
                    "Request to {} blocked by risk control ({}): {}",
                    request.path,
                    code,
                    err
                ),
                _ => log::warn!("Request to {} failed: {}", request.path, err),
            }
        }

        PageResult::from_result(result)
    }
}

#[async_trait::async_trait]
impl super::XhsRepository for XhsHttpClient {
    async fn user_info(&self, user: &UserId) -> PageResult<Value> {
        let request = LogicalRequest::get(USER_INFO_PATH, &[("target_user_id", user.as_str())]);
        self.fetch(request, parser::parse_document).await
    }

    async fn user_notes_page(&self, user: &UserRef, cursor: &str) -> PageResult<ListPage<NoteSummary>> {
        let page_size = USER_NOTES_PAGE_SIZE.to_string();
        let image_formats = IMAGE_FORMATS.join(",");
        let request = LogicalRequest::get(
            USER_POSTED_PATH,
            &[
                ("num", page_size.as_str()),
                ("cursor", cursor),
                ("user_id", user.id.as_str()),
                ("image_formats", image_formats.as_str()),
                ("xsec_token", user.xsec_token.as_str()),
                ("xsec_source", user.xsec_source.as_str()),
            ],
        );
        self.fetch(request, |response| {
            parser::parse_list_page(response, "notes", MissingItems::Fault)
        })
        .await
    }

    async fn note_detail(&self, note: &NoteRef) -> PageResult<Value> {
        self.detail_delay.pause().await;

        let request = LogicalRequest::post(
            NOTE_FEED_PATH,
            json!({
                "source_note_id": note.id.as_str(),
                "image_formats": IMAGE_FORMATS,
                "extra": { "need_body_topic": "1" },
                "xsec_source": note.xsec_source,
                "xsec_token": note.xsec_token,
            }),
        );
        self.fetch(request, parser::parse_document).await
    }

    async fn search_suggestions(&self, word: &str) -> PageResult<Value> {
        let keyword = quote_keyword(word);
        let request = LogicalRequest::get(SEARCH_RECOMMEND_PATH, &[("keyword", keyword.as_str())]);
        self.fetch(request, parser::parse_document).await
    }

    async fn search_notes_page(&self, query: &SearchQuery, page: u32) -> PageResult<ListPage<SearchHit>> {
        let request = LogicalRequest::post(
            SEARCH_NOTES_PATH,
            json!({
                "keyword": query.keyword,
                "page": page,
                "page_size": SEARCH_PAGE_SIZE,
                "search_id": random_hex(SEARCH_ID_LENGTH),
                "sort": query.sort.as_str(),
                "note_type": query.note_type.code(),
                "ext_flags": [],
                "image_formats": IMAGE_FORMATS,
            }),
        );
        self.fetch(request, |response| {
            parser::parse_list_page(response, "items", MissingItems::EndOfResults)
        })
        .await
    }

    async fn top_comments_page(&self, note: &NoteRef, cursor: &str) -> PageResult<ListPage<Comment>> {
        let image_formats = IMAGE_FORMATS.join(",");
        let request = LogicalRequest::get(
            COMMENT_PAGE_PATH,
            &[
                ("note_id", note.id.as_str()),
                ("cursor", cursor),
                ("top_comment_id", ""),
                ("image_formats", image_formats.as_str()),
                ("xsec_token", note.xsec_token.as_str()),
            ],
        );
        self.fetch(request, |response| {
            parser::parse_list_page(response, "comments", MissingItems::Fault)
        })
        .await
    }

    async fn nested_comments_page(
        &self,
        thread: &CommentThread,
        cursor: &str,
    ) -> PageResult<ListPage<Comment>> {
        let page_size = NESTED_COMMENTS_PAGE_SIZE.to_string();
        let image_formats = IMAGE_FORMATS.join(",");
        let request = LogicalRequest::get(
            SUB_COMMENT_PAGE_PATH,
            &[
                ("note_id", thread.note_id.as_str()),
                ("root_comment_id", thread.root_comment_id.as_str()),
                ("num", page_size.as_str()),
                ("cursor", cursor),
                ("image_formats", image_formats.as_str()),
                ("top_comment_id", ""),
                ("xsec_token", thread.xsec_token.as_str()),
            ],
        );
        self.fetch(request, |response| {
            parser::parse_list_page(response, "comments", MissingItems::Fault)
        })
        .await
    }
}

/// Percent-encodes a keyword the way the web client does: spaces become `%20`
/// and `/` stays literal.
fn quote_keyword(word: &str) -> String {
    urlencoding::encode(word).replace("%2F", "/")
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
///
/// Non-2xx statuses are not errors here: the platform reports most failures
/// as JSON envelopes, which the parser turns into messages.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
