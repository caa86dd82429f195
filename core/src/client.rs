//! Stateless HTTP request builder and response parser for the health API.
//!
//! # Design
//! `HealthClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that validates its
//! input and produces an `HttpRequest`, and a `parse_*` method that consumes
//! an `HttpResponse`. `Session` glues the two halves to a `Transport`; tests
//! can drive either half directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Calculation, DeleteOutcome, Fields, HistoryQuery, HistoryRecord, RecordUpdate};

const CALCULATION_FAILED: &str = "Calculation failed";
const LIST_FAILED: &str = "Failed to load history";
const GET_FAILED: &str = "Failed to fetch record";
const UPDATE_FAILED: &str = "Failed to update record";
const DELETE_FAILED: &str = "Failed to delete record";
const HEALTH_FAILED: &str = "Health check failed";

/// Synchronous, stateless client for the health metrics API.
#[derive(Debug, Clone)]
pub struct HealthClient {
    base_url: String,
}

impl HealthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// POST `/calc/{calculator}` with the request as its JSON body. The
    /// username is sent trimmed, the same way history lookups send it.
    pub fn build_calculation<C: Calculation>(&self, input: &C) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let mut body = serde_json::to_value(input).map_err(encoding_failed)?;
        if let (Some(name), Some(slot)) = (input.username(), body.get_mut("username")) {
            *slot = Value::String(name.trim().to_string());
        }
        let path = format!("{}/calc/{}", self.base_url, C::CALCULATOR.slug());
        json_request(HttpMethod::Post, path, &body)
    }

    pub fn build_list_history(&self, query: &HistoryQuery) -> Result<HttpRequest, ApiError> {
        let username = required_username(&query.username)?;
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("username", username);
        if let Some(limit) = query.limit {
            params.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = query.offset {
            params.append_pair("offset", &offset.to_string());
        }
        Ok(bare_request(
            HttpMethod::Get,
            format!("{}/calc/history?{}", self.base_url, params.finish()),
        ))
    }

    pub fn build_get_record(&self, id: i64, username: &str) -> Result<HttpRequest, ApiError> {
        let username = required_username(username)?;
        Ok(bare_request(
            HttpMethod::Get,
            format!("{}?{}", self.record_url(id), owner_query(username)),
        ))
    }

    pub fn build_update_record(&self, id: i64, update: &RecordUpdate) -> Result<HttpRequest, ApiError> {
        let payload = UpdatePayload {
            username: required_username(&update.username)?,
            inputs: update.inputs.as_ref(),
            result: update.result.as_ref(),
        };
        json_request(HttpMethod::Patch, self.record_url(id), &payload)
    }

    pub fn build_delete_record(&self, id: i64, username: &str) -> Result<HttpRequest, ApiError> {
        let username = required_username(username)?;
        Ok(bare_request(
            HttpMethod::Delete,
            format!("{}?{}", self.record_url(id), owner_query(username)),
        ))
    }

    /// GET `/health`, which lives outside the `/calc` prefix.
    pub fn build_health_check(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, format!("{}/health", self.base_url))
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_calculation<C: Calculation>(&self, response: HttpResponse) -> Result<C::Output, ApiError> {
        check_status(&response, CALCULATION_FAILED)?;
        parse_body(&response.body)
    }

    pub fn parse_list_history(&self, response: HttpResponse) -> Result<Vec<HistoryRecord>, ApiError> {
        check_status(&response, LIST_FAILED)?;
        parse_body(&response.body)
    }

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<HistoryRecord, ApiError> {
        check_status(&response, GET_FAILED)?;
        parse_body(&response.body)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<HistoryRecord, ApiError> {
        check_status(&response, UPDATE_FAILED)?;
        parse_body(&response.body)
    }

    /// Any 2xx counts as deleted. A body is optional; its `detail`, when
    /// present, is passed through.
    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<DeleteOutcome, ApiError> {
        check_status(&response, DELETE_FAILED)?;
        let detail = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));
        Ok(DeleteOutcome::Deleted { detail })
    }

    pub fn parse_health_check(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, HEALTH_FAILED)
    }

    fn record_url(&self, id: i64) -> String {
        format!("{}/calc/history/{id}", self.base_url)
    }
}

/// `RecordUpdate` as sent, with the owner name trimmed.
#[derive(Serialize)]
struct UpdatePayload<'a> {
    username: &'a str,
    inputs: Option<&'a Fields>,
    result: Option<&'a Fields>,
}

fn bare_request(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<T: Serialize>(method: HttpMethod, path: String, payload: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(encoding_failed)?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn encoding_failed(e: serde_json::Error) -> ApiError {
    ApiError::Validation(format!("request could not be encoded: {e}"))
}

fn required_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Please enter a username."));
    }
    Ok(trimmed)
}

fn owner_query(username: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("username", username)
        .finish()
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Map a non-2xx status to `RequestFailed`, preferring the server's `detail`.
fn check_status(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        message: error_detail(&response.body).unwrap_or_else(|| fallback.to_string()),
    })
}

/// `detail` is either a plain string or a list of `{"msg": ..}` validation
/// entries.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
