// src/api/parser.rs
//! Response parsing for the web API.
//!
//! Every endpoint answers with the same envelope:
//! `{"success": bool, "code": int, "msg": string, "data": {...}}`.
//! These functions validate that envelope and the fields the pagination
//! layer depends on, turning anything unexpected into an `AppError`.

use super::client::ApiResponse;
use super::types::ListPage;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, RemoteCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What a page without its items key means for the endpoint being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingItems {
    /// The response is malformed.
    Fault,
    /// The endpoint has run out of results.
    EndOfResults,
}

/// Validates the envelope and returns the remote message with the full body.
pub fn parse_envelope(result: ApiResponse<String>) -> Result<(String, Value), AppError> {
    let body: Value = serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!(
            "HTTP {} from {} is not JSON ({}): {}",
            result.status,
            result.url,
            e,
            preview(&result.data)
        ))
    })?;

    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| missing_field("success"))?;
    let message = body
        .get("msg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing_field("msg"))?;

    if !success {
        let code = RemoteCode::from_api_response(body.get("code").and_then(Value::as_i64));
        return Err(AppError::Remote { code, message });
    }

    Ok((message, body))
}

/// Parses endpoints whose whole response is handed to the caller (user info, note detail, suggestions).
pub fn parse_document(result: ApiResponse<String>) -> Result<(String, Value), AppError> {
    parse_envelope(result)
}

/// Parses one page of a listing endpoint, reading its items from `data.<items_key>`.
pub fn parse_list_page<T>(
    result: ApiResponse<String>,
    items_key: &str,
    missing_items: MissingItems,
) -> Result<(String, ListPage<T>), AppError>
where
    T: DeserializeOwned,
{
    let (message, mut body) = parse_envelope(result)?;

    let Some(Value::Object(mut data)) = body.get_mut("data").map(Value::take) else {
        return Err(missing_field("data"));
    };

    let Some(raw_items) = data.remove(items_key) else {
        return match missing_items {
            MissingItems::Fault => Err(missing_field(&format!("data.{}", items_key))),
            MissingItems::EndOfResults => Ok((message, ListPage::exhausted())),
        };
    };

    let items: Vec<T> = serde_json::from_value(raw_items).map_err(|e| {
        AppError::MalformedResponse(format!("Invalid 'data.{}': {}", items_key, e))
    })?;

    Ok((
        message,
        ListPage {
            items,
            cursor: data.get("cursor").and_then(cursor_token),
            has_more: data
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
    ))
}

/// Coerces a cursor field to its string token; `null` counts as no cursor.
fn cursor_token(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn missing_field(name: &str) -> AppError {
    AppError::MalformedResponse(format!("Missing '{}' field in response", name))
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
