// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request data exposed to actions.
//!
//! Actions never see the host's transport types. A host controller collects
//! what an action may read into an [`ActionRequest`] and a [`Params`] map.

use crate::format::Format;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Request parameters (path, query and body parameters merged by the host).
pub type Params = HashMap<String, JsonValue>;

/// A platform-agnostic request as seen by an action.
///
/// # Example
///
/// ```rust
/// use class_action::ActionRequest;
///
/// let request = ActionRequest::new("/posts/1.json", "GET")
///     .with_headers([("Accept".into(), "application/json".into())].into());
/// assert_eq!(request.format().unwrap().as_str(), "json");
/// ```
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// The request path (e.g., "/posts/1")
    pub path: String,

    /// The HTTP method (e.g., "GET", "POST")
    pub method: String,

    /// HTTP headers
    pub headers: HashMap<String, String>,

    /// Format explicitly resolved by the host's router, if any.
    pub format: Option<Format>,
}

impl ActionRequest {
    /// Creates a new request with the given path and method.
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into().to_uppercase(),
            headers: HashMap::new(),
            format: None,
        }
    }

    /// Adds headers to the request.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the format resolved by the router.
    pub fn with_format(mut self, format: impl Into<Format>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Returns a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the requested response format.
    ///
    /// Resolution order:
    /// 1. The format set by the router
    /// 2. The path extension (`/posts/1.json`)
    /// 3. The first recognised media type of the `Accept` header
    pub fn format(&self) -> Option<Format> {
        if let Some(format) = &self.format {
            return Some(format.clone());
        }

        let last_segment = self.path.rsplit('/').next().unwrap_or_default();
        if let Some((_, ext)) = last_segment.rsplit_once('.') {
            if !ext.is_empty() {
                return Some(Format::new(ext));
            }
        }

        self.header("accept").and_then(|accept| {
            accept
                .split(',')
                .map(|media| media.split(';').next().unwrap_or_default().trim())
                .find_map(format_for_media_type)
        })
    }

    /// Returns true for GET and HEAD requests.
    pub fn is_get(&self) -> bool {
        self.method == "GET" || self.method == "HEAD"
    }
}

impl Default for ActionRequest {
    fn default() -> Self {
        Self::new("/", "GET")
    }
}

fn format_for_media_type(media_type: &str) -> Option<Format> {
    let name = match media_type {
        "text/html" | "application/xhtml+xml" => "html",
        "application/json" => "json",
        "application/xml" | "text/xml" => "xml",
        "text/javascript" | "application/javascript" => "js",
        "text/plain" => "text",
        "text/csv" => "csv",
        "*/*" => Format::ANY,
        _ => return None,
    };
    Some(Format::new(name))
}
