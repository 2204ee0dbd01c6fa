//! HTTP fetch of a [`FetchPlan`].
//!
//! Uses the curl crate (libcurl). Follows redirects, applies the plan's
//! headers and returns the status, the headers the classifier cares about,
//! and the whole body.

mod parse;

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::resolver::{FetchPlan, Method};

/// Response of a planned GET/POST.
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub status: u32,
    /// `Content-Disposition` of the final response (filename hint).
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the request described by `plan`.
///
/// Non-2xx statuses are returned, not turned into errors; transport failures
/// are errors. Runs in the current thread; call from `spawn_blocking` if used
/// from async code.
pub fn fetch(plan: &FetchPlan, http: &HttpConfig) -> Result<FetchResponse> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(&plan.url).context("invalid URL")?;
    match plan.method {
        Method::Get => easy.get(true)?,
        Method::Post => {
            easy.post(true)?;
            easy.post_field_size(0)?;
        }
    }
    easy.follow_location(true)?;
    easy.max_redirections(http.max_redirections)?;
    easy.connect_timeout(Duration::from_secs(http.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(http.timeout_secs))?;

    let mut list = curl::easy::List::new();
    for (k, v) in &plan.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    let sets_content_type = plan
        .headers
        .iter()
        .any(|(k, _)| k.trim().eq_ignore_ascii_case("content-type"));
    if plan.method == Method::Post && !sets_content_type {
        // Empty body: suppress libcurl's form-urlencoded default.
        list.append("Content-Type:")?;
    }
    if !plan.headers.is_empty() || plan.method == Method::Post {
        easy.http_headers(list)?;
    }

    tracing::debug!(method = plan.method.as_str(), url = %plan.url, "fetch start");
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .with_context(|| format!("{} request failed", plan.method.as_str()))?;
    }

    let status = easy.response_code().context("no response code")?;
    let parsed = parse::parse_headers(&headers);
    tracing::debug!(status, bytes = body.len(), "fetch done");

    Ok(FetchResponse {
        status,
        content_disposition: parsed.content_disposition,
        content_type: parsed.content_type,
        body,
    })
}
