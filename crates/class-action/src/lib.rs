// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # Class Action
//!
//! Class-based controller actions with guarded response resolution.
//!
//! Instead of writing a controller action as one method, each action gets its
//! own class: a sequence of small steps, named guards, declarative response
//! rules and view helpers. A per-controller-type [`Dispatcher`] binds action
//! names to classes and runs them against request-scoped controller instances.
//!
//! ## Features
//!
//! - Steps run in declaration order and stop as soon as a response exists
//! - Guarded `respond_with` / per-format `respond_to` rules, inherited and overlaid
//! - Action working state mirrored to and from the controller around every
//!   forwarded controller call
//! - Format table injection so each action answers only the formats it declares
//! - View helpers and delegated methods forwarding to the current action
//! - Lazy class loading through an injected [`ActionLoader`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use class_action::{ActionClass, Dispatcher, Respond, Render};
//!
//! let show = ActionClass::<PostsController>::builder("ShowAction")
//!     .step("load_post", |scope| {
//!         scope.set("post", serde_json::json!({ "title": "Hello" }));
//!         Ok(())
//!     })
//!     .respond_with("@post")
//!     .respond_to(Respond::to(["html", "json"]))
//!     .build();
//!
//! let mut dispatcher = Dispatcher::new("PostsController");
//! dispatcher.register(["show"], &show)?;
//!
//! let mut controller = PostsController::new(request);
//! dispatcher.dispatch(&mut controller, "show")?;
//! ```

/// Controller state shared with actions.
pub mod assigns;
/// Action class descriptors and their builder.
pub mod class;
/// Dispatcher configuration.
pub mod config;
/// The host controller trait.
pub mod controller;
/// Action registration and dispatch.
pub mod dispatcher;
/// Error types.
pub mod error;
/// Response format names.
pub mod format;
/// Per-request action instances.
pub mod handler;
/// View helpers and the view context.
pub mod helpers;
/// Lazy class loading.
pub mod loader;
/// Test assertions for controllers and actions.
pub mod matchers;
/// Format-to-action restrictions.
pub mod mime;
/// Request abstraction.
pub mod request;
/// Per-format response blocks.
pub mod responder;
/// Render instructions and response bodies.
pub mod response;
/// Ordered guarded rule lists.
pub mod rules;
/// Capability surface of running actions.
pub mod scope;

pub use assigns::Assigns;
pub use class::{ActionClass, ActionClassBuilder, MethodDef, Respond, Visibility};
pub use config::DispatcherConfig;
pub use controller::Controller;
pub use dispatcher::{ActionCache, Dispatcher, HandlerRef, HandlerSource};
pub use error::{ClassActionError, Result};
pub use format::Format;
pub use handler::{ActionHandler, ActionPhase};
pub use helpers::{HelperModule, ViewContext};
pub use loader::{ActionLoader, MemoryActionLoader};
pub use mime::{MimeRestriction, MimeTable};
pub use request::{ActionRequest, Params};
pub use responder::{FormatCollector, Responder};
pub use response::{Render, ResponseBody};
pub use rules::{Rule, RuleList};
pub use scope::ActionScope;

// Re-export the value type used for working state
pub use serde_json::Value;
