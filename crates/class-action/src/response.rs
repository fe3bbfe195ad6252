// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Render instructions and response bodies.
//!
//! Actions ask their controller to render with a [`Render`] instruction. A
//! host controller turns it into whatever it produces; [`ResponseBody`] is a
//! ready-made representation hosts may store to answer
//! [`Controller::response_body`](crate::Controller::response_body).

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// What an action asks its controller to render.
///
/// # Example
///
/// ```rust
/// use class_action::Render;
///
/// let edit = Render::template("posts/edit").with_status(422);
/// let json = Render::json(serde_json::json!({ "id": 1 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    /// Render a named template with the controller's assigns.
    Template {
        /// Template name (e.g., "posts/edit")
        name: String,
        /// HTTP status code
        status: u16,
    },

    /// Render a JSON document.
    Json {
        /// JSON body
        body: JsonValue,
        /// HTTP status code
        status: u16,
    },

    /// Render plain text.
    Text {
        /// Text body
        body: String,
        /// HTTP status code
        status: u16,
    },

    /// Respond with headers only.
    Head {
        /// HTTP status code
        status: u16,
    },
}

impl Render {
    /// Renders a template with status 200.
    pub fn template(name: impl Into<String>) -> Self {
        Self::Template {
            name: name.into(),
            status: 200,
        }
    }

    /// Renders JSON with status 200.
    pub fn json(body: JsonValue) -> Self {
        Self::Json { body, status: 200 }
    }

    /// Renders plain text with status 200.
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            status: 200,
        }
    }

    /// Responds with headers only.
    pub fn head(status: u16) -> Self {
        Self::Head { status }
    }

    /// Overrides the status code.
    pub fn with_status(mut self, new_status: u16) -> Self {
        match &mut self {
            Self::Template { status, .. }
            | Self::Json { status, .. }
            | Self::Text { status, .. }
            | Self::Head { status } => *status = new_status,
        }
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::Template { status, .. }
            | Self::Json { status, .. }
            | Self::Text { status, .. }
            | Self::Head { status } => *status,
        }
    }
}

/// A response body produced by a host controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Rendered output (template, text or JSON serialised by the host)
    Rendered {
        /// HTTP status code
        status: u16,
        /// Format the body was rendered in, if known
        format: Option<String>,
        /// HTTP headers
        headers: HashMap<String, String>,
        /// Response body
        body: String,
    },

    /// Redirect response
    Redirect {
        /// HTTP status code (301, 302, 303, 307, 308)
        status: u16,
        /// Redirect location
        location: String,
    },

    /// Headers-only response
    Head {
        /// HTTP status code
        status: u16,
    },
}

impl ResponseBody {
    /// Creates a rendered body.
    pub fn rendered(status: u16, format: Option<&str>, body: impl Into<String>) -> Self {
        Self::Rendered {
            status,
            format: format.map(str::to_string),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Creates a redirect response (HTTP 302).
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            status: 302,
            location: location.into(),
        }
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::Rendered { status, .. } | Self::Redirect { status, .. } | Self::Head { status } => {
                *status
            }
        }
    }

    /// Returns true if this is a redirect response (3xx).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status())
    }

    /// Adds a header (only for rendered bodies).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Rendered { headers, .. } = &mut self {
            headers.insert(key.into(), value.into());
        }
        self
    }
}
