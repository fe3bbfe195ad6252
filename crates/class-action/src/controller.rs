// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The host controller surface.
//!
//! Class actions run inside a controller supplied by the host framework. The
//! [`Controller`] trait lists everything an action needs from it: the
//! template-visible variable store, the response-body flag, request data, and
//! the render/redirect/respond entry points.

use crate::assigns::Assigns;
use crate::dispatcher::ActionCache;
use crate::error::Result;
use crate::format::Format;
use crate::request::{ActionRequest, Params};
use crate::responder::FormatCollector;
use crate::response::{Render, ResponseBody};
use serde_json::Value as JsonValue;

/// A request-scoped controller instance hosting class actions.
///
/// One controller instance serves one request. It owns an [`ActionCache`] in
/// which the dispatcher memoizes the handlers it creates for it.
///
/// # Responding per format
///
/// [`respond_with`](Controller::respond_with) and
/// [`respond_to`](Controller::respond_to) receive a [`FormatCollector`]. The
/// controller negotiates one of [`FormatCollector::formats`] and then calls
/// [`FormatCollector::respond`] with itself, which runs the action's block
/// for that format against this controller.
pub trait Controller: Sized + 'static {
    /// The action name the host resolved for the current request.
    fn action_name(&self) -> Option<&str>;

    /// Snapshot of the template-visible variables.
    fn view_assigns(&self) -> Assigns;

    /// Sets one template-visible variable.
    fn set_assign(&mut self, name: &str, value: JsonValue);

    /// The response body, once something has been rendered or redirected.
    fn response_body(&self) -> Option<&ResponseBody>;

    /// Request parameters.
    fn params(&self) -> &Params;

    /// The current request.
    fn request(&self) -> &ActionRequest;

    /// The requested response format.
    fn format(&self) -> Option<Format> {
        self.request().format()
    }

    /// Renders a response.
    fn render(&mut self, render: Render) -> Result<()>;

    /// Redirects to the given location.
    fn redirect_to(&mut self, location: &str) -> Result<()>;

    /// Responds with an object, optionally refined per format.
    fn respond_with(
        &mut self,
        object: JsonValue,
        collector: Option<&mut FormatCollector<'_, Self>>,
    ) -> Result<()>;

    /// Responds using per-format blocks only.
    fn respond_to(&mut self, collector: &mut FormatCollector<'_, Self>) -> Result<()>;

    /// The per-instance handler cache.
    fn action_cache(&self) -> &ActionCache<Self>;

    /// The per-instance handler cache, mutably.
    fn action_cache_mut(&mut self) -> &mut ActionCache<Self>;

    /// Returns true once a response body has been produced.
    fn has_response_body(&self) -> bool {
        self.response_body().is_some()
    }
}
