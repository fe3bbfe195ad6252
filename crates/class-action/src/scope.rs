// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The capability surface handed to action methods.
//!
//! Every method, guard and response block of an action runs with an
//! [`ActionScope`]. It gives access to the action's working state and to a
//! fixed set of controller capabilities:
//!
//! - read-only: [`params`](ActionScope::params), [`request`](ActionScope::request),
//!   [`format`](ActionScope::format)
//! - synchronised: [`render`](ActionScope::render),
//!   [`redirect_to`](ActionScope::redirect_to), [`respond_to`](ActionScope::respond_to),
//!   [`respond_with`](ActionScope::respond_with),
//!   [`with_controller`](ActionScope::with_controller)
//!
//! Synchronised capabilities copy working state onto the controller before
//! forwarding, and copy the controller's state back afterwards, also when the
//! forwarded call fails.

use crate::assigns::{self, Assigns};
use crate::class::ActionClass;
use crate::controller::Controller;
use crate::error::{ClassActionError, Result};
use crate::format::Format;
use crate::request::{ActionRequest, Params};
use crate::responder::{FormatCollector, Responder};
use crate::response::Render;
use serde_json::Value as JsonValue;

/// Working state and controller capabilities of a running action.
pub struct ActionScope<'a, C> {
    controller: &'a mut C,
    assigns: &'a mut Assigns,
    class: &'a ActionClass<C>,
}

impl<'a, C: Controller> ActionScope<'a, C> {
    pub(crate) fn new(controller: &'a mut C, assigns: &'a mut Assigns, class: &'a ActionClass<C>) -> Self {
        Self {
            controller,
            assigns,
            class,
        }
    }

    /// The class of the running action.
    pub fn class(&self) -> &ActionClass<C> {
        self.class
    }

    /// Reads a working-state variable.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.assigns.get(name)
    }

    /// Sets a working-state variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.assigns.insert(name.into(), value.into());
    }

    /// Removes a working-state variable.
    pub fn remove(&mut self, name: &str) -> Option<JsonValue> {
        self.assigns.remove(name)
    }

    /// The whole working state.
    pub fn assigns(&self) -> &Assigns {
        self.assigns
    }

    /// Read access to the controller. State is not synchronised.
    pub fn controller(&self) -> &C {
        self.controller
    }

    /// Request parameters.
    pub fn params(&self) -> &Params {
        self.controller.params()
    }

    /// The current request.
    pub fn request(&self) -> &ActionRequest {
        self.controller.request()
    }

    /// The requested response format.
    pub fn format(&self) -> Option<Format> {
        self.controller.format()
    }

    /// Renders through the controller.
    pub fn render(&mut self, render: Render) -> Result<()> {
        self.with_controller(|controller| controller.render(render))
    }

    /// Redirects through the controller.
    pub fn redirect_to(&mut self, location: &str) -> Result<()> {
        self.with_controller(|controller| controller.redirect_to(location))
    }

    /// Asks the controller to respond per format with the given blocks.
    pub fn respond_to(&mut self, responder: Responder<C>) -> Result<()> {
        assigns::copy_to_controller(self.assigns, self.controller);
        let result = {
            let mut collector = FormatCollector::new(responder, &mut *self.assigns, self.class);
            self.controller.respond_to(&mut collector)
        };
        assigns::copy_from_controller(self.controller, self.assigns);
        result
    }

    /// Asks the controller to respond with an object, optionally refined per format.
    pub fn respond_with(&mut self, object: JsonValue, responder: Option<Responder<C>>) -> Result<()> {
        assigns::copy_to_controller(self.assigns, self.controller);
        let result = {
            let mut collector = match responder {
                Some(responder) => Some(FormatCollector::new(responder, &mut *self.assigns, self.class)),
                None => None,
            };
            self.controller.respond_with(object, collector.as_mut())
        };
        assigns::copy_from_controller(self.controller, self.assigns);
        result
    }

    /// Runs an arbitrary controller operation with working state synchronised
    /// before and after.
    pub fn with_controller<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut C) -> Result<R>,
    {
        assigns::copy_to_controller(self.assigns, self.controller);
        let result = f(&mut *self.controller);
        assigns::copy_from_controller(self.controller, self.assigns);
        result
    }

    /// Calls another method of the action, regardless of its visibility.
    pub fn call(&mut self, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        let class = self.class;
        let method = class.method(name).ok_or_else(|| ClassActionError::UnknownMethod {
            class: class.display_name().to_string(),
            method: name.to_string(),
        })?;

        if method.arity() != args.len() {
            return Err(ClassActionError::WrongArity {
                class: class.display_name().to_string(),
                method: name.to_string(),
                expected: method.arity(),
                given: args.len(),
            });
        }

        (method.body())(self, args)
    }

    /// Evaluates a guard method.
    pub fn guard(&mut self, name: &str) -> Result<bool> {
        self.call(name, &[]).map(|value| assigns::is_truthy(&value))
    }

    /// Resolves a response object: `@name` reads a working-state variable,
    /// anything else calls the method of that name.
    pub fn resolve(&mut self, resolver: &str) -> Result<JsonValue> {
        match resolver.strip_prefix('@') {
            Some(variable) => Ok(self.assigns.get(variable).cloned().unwrap_or(JsonValue::Null)),
            None => self.call(resolver, &[]),
        }
    }
}
