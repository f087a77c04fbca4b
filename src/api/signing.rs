// src/api/signing.rs
//! Request signing seam.
//!
//! The web API expects signed headers derived from the session cookies and
//! the exact request path/body. The signing algorithm is not part of this
//! crate: it is consumed through [`RequestSigner`]. [`PassthroughSigner`]
//! attaches the cookies and a browser-like header set without computing any
//! signature tokens, which is enough for endpoints that only check the session.

use crate::constants::{TRACE_ID_LENGTH, USER_AGENT, WEB_ORIGIN};
use crate::error::AppError;
use crate::types::Credentials;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::Value;

const TRACE_ID_ALPHABET: &[u8] = b"abcdef0123456789";

/// A request as the API layer describes it, before any signing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRequest {
    pub method: Method,
    /// Path relative to the API origin, query string included.
    pub path: String,
    pub body: Option<Value>,
}

impl LogicalRequest {
    /// A GET request whose parameters are spliced into the path in the given order.
    pub fn get(path: &str, params: &[(&str, &str)]) -> Self {
        Self {
            method: Method::GET,
            path: splice_query(path, params),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    pub fn post(path: &str, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            body: Some(body),
        }
    }
}

/// Transport-ready material produced by a signer.
#[derive(Debug, Clone, Default)]
pub struct SignedRequest {
    pub headers: HeaderMap,
    pub cookies: Vec<(String, String)>,
    /// Serialized body; signers may need the exact bytes they signed to be sent.
    pub body: Option<String>,
}

/// The ability to turn credentials and a logical request into signed transport material.
pub trait RequestSigner: Send + Sync {
    fn sign(
        &self,
        credentials: &Credentials,
        request: &LogicalRequest,
    ) -> Result<SignedRequest, AppError>;
}

/// Signs nothing; forwards cookies and presents a desktop browser's headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSigner;

impl RequestSigner for PassthroughSigner {
    fn sign(
        &self,
        credentials: &Credentials,
        request: &LogicalRequest,
    ) -> Result<SignedRequest, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
        headers.insert(header::REFERER, HeaderValue::from_static("https://www.xiaohongshu.com/"));
        headers.insert(
            "x-b3-traceid",
            HeaderValue::from_str(&random_hex(TRACE_ID_LENGTH))
                .map_err(|e| AppError::Signing(format!("Invalid trace id header: {}", e)))?,
        );

        let body = match &request.body {
            Some(body) => {
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json;charset=UTF-8"),
                );
                Some(serde_json::to_string(body).map_err(|e| {
                    AppError::Signing(format!("Failed to serialize request body: {}", e))
                })?)
            }
            None => None,
        };

        Ok(SignedRequest {
            headers,
            cookies: credentials.cookies().to_vec(),
            body,
        })
    }
}

/// Appends `?k=v&k2=v2` to a path without re-encoding the values.
///
/// The signed path must match the requested path byte for byte, so callers
/// encode values themselves where the endpoint requires it.
pub fn splice_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

/// Renders cookie pairs as a `Cookie` header value.
pub fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Random lowercase hex string, used for trace ids and search ids.
pub fn random_hex(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TRACE_ID_ALPHABET[rng.random_range(0..TRACE_ID_ALPHABET.len())] as char)
        .collect()
}
