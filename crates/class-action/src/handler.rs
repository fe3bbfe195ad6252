// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Per-request action instances.
//!
//! An [`ActionHandler`] is one instance of an [`ActionClass`] serving one
//! controller instance. It holds the action's working state and runs the
//! execution protocol:
//!
//! 1. Check availability; fail with
//!    [`ActionNotAvailable`](ClassActionError::ActionNotAvailable) if unavailable.
//! 2. Run the class's action methods in order, stopping as soon as the
//!    controller has a response body (e.g. after a redirect).
//! 3. If nothing produced a response body, resolve one: copy working state to
//!    the controller, pick the response object from the response rules, build
//!    the per-format responder, and ask the controller to `respond_with` the
//!    object or, without one, to `respond_to` the formats.

use crate::assigns::{self, Assigns};
use crate::class::{ActionClass, Visibility};
use crate::controller::Controller;
use crate::error::{ClassActionError, Result};
use crate::format::Format;
use crate::responder::{FormatCollector, Responder};
use crate::scope::ActionScope;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Execution phase of an action instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    /// Created, not yet executed.
    Idle,
    /// Running its action methods.
    Running,
    /// Response resolution finished.
    Responded,
    /// Execution finished.
    Done,
}

/// An action instance bound to one controller instance.
pub struct ActionHandler<C> {
    action: String,
    class: Arc<ActionClass<C>>,
    assigns: Assigns,
    phase: ActionPhase,
}

impl<C: Controller> ActionHandler<C> {
    /// Creates an instance, snapshotting the controller's view assigns.
    pub fn new(action: impl Into<String>, class: Arc<ActionClass<C>>, controller: &C) -> Self {
        let mut assigns = Assigns::new();
        assigns::copy_from_controller(controller, &mut assigns);
        Self {
            action: action.into(),
            class,
            assigns,
            phase: ActionPhase::Idle,
        }
    }

    /// The action name this instance serves.
    pub fn action_name(&self) -> &str {
        &self.action
    }

    /// The class of this instance.
    pub fn class(&self) -> &Arc<ActionClass<C>> {
        &self.class
    }

    /// The working state.
    pub fn assigns(&self) -> &Assigns {
        &self.assigns
    }

    /// Reads a working-state variable.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.assigns.get(name)
    }

    /// Sets a working-state variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.assigns.insert(name.into(), value.into());
    }

    /// The current execution phase.
    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    fn scope<'s>(&'s mut self, controller: &'s mut C) -> ActionScope<'s, C> {
        ActionScope::new(controller, &mut self.assigns, &self.class)
    }

    /// Evaluates the availability predicate (default: available).
    pub fn available(&mut self, controller: &mut C) -> Result<bool> {
        let class = Arc::clone(&self.class);
        match class.available_fn() {
            Some(predicate) => predicate(&mut self.scope(controller)),
            None => Ok(true),
        }
    }

    /// Runs the action.
    ///
    /// The first run refreshes the working state from the controller, so
    /// assigns set after the instance was created are seen. Executing a
    /// memoized instance again restarts at [`ActionPhase::Running`] with its
    /// current working state.
    pub fn execute(&mut self, controller: &mut C) -> Result<()> {
        if self.phase == ActionPhase::Idle {
            self.copy_from_controller(controller);
        }

        if !self.available(controller)? {
            return Err(ClassActionError::ActionNotAvailable {
                action: self.action.clone(),
            });
        }

        self.phase = ActionPhase::Running;
        let class = Arc::clone(&self.class);

        for method in class.action_methods() {
            tracing::debug!("Running {}#{}", class.display_name(), method);
            self.scope(controller).call(method, &[])?;

            if controller.has_response_body() {
                tracing::debug!(
                    "{}#{} produced a response body; skipping remaining steps",
                    class.display_name(),
                    method
                );
                break;
            }
        }

        if !controller.has_response_body() {
            self.respond(controller)?;
            self.phase = ActionPhase::Responded;
        }

        self.phase = ActionPhase::Done;
        Ok(())
    }

    fn respond(&mut self, controller: &mut C) -> Result<()> {
        self.copy_to_controller(controller);

        let class = Arc::clone(&self.class);
        let (object, responder) = {
            let mut scope = self.scope(controller);

            let resolver = class
                .responses()
                .resolve(|guard| scope.guard(guard))?
                .map(|rule| rule.value.clone());
            let object = match resolver {
                Some(resolver) => Some(scope.resolve(&resolver)?),
                None => None,
            };

            let responder = if class.has_format_blocks() {
                Some(Responder::from_rules(class.formats(), |guard| scope.guard(guard))?)
            } else {
                None
            };
            (object, responder)
        };

        let result = match (object, responder) {
            (Some(object), responder) => {
                tracing::debug!("{} responds with an object", class.display_name());
                let mut collector = match responder {
                    Some(responder) => Some(FormatCollector::new(responder, &mut self.assigns, &class)),
                    None => None,
                };
                controller.respond_with(object, collector.as_mut())
            }
            (None, Some(responder)) => {
                tracing::debug!(
                    "{} responds to formats {:?}",
                    class.display_name(),
                    responder.formats()
                );
                let mut collector = FormatCollector::new(responder, &mut self.assigns, &class);
                controller.respond_to(&mut collector)
            }
            (None, None) => {
                tracing::debug!(
                    "{} declares no response; controller default applies",
                    class.display_name()
                );
                Ok(())
            }
        };

        self.copy_from_controller(controller);
        result
    }

    /// Calls a method of this instance, regardless of its visibility.
    pub fn call(&mut self, controller: &mut C, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        self.scope(controller).call(name, args)
    }

    /// Calls a public method of this instance.
    pub fn call_public(&mut self, controller: &mut C, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        self.ensure_visible(name, |v| v == Visibility::Public)?;
        self.call(controller, name, args)
    }

    /// Calls a public or protected method of this instance.
    pub fn call_restricted(&mut self, controller: &mut C, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        self.ensure_visible(name, |v| v != Visibility::Private)?;
        self.call(controller, name, args)
    }

    fn ensure_visible(&self, name: &str, allowed: impl Fn(Visibility) -> bool) -> Result<()> {
        let method = self.class.method(name).ok_or_else(|| ClassActionError::UnknownMethod {
            class: self.class.display_name().to_string(),
            method: name.to_string(),
        })?;
        if allowed(method.visibility()) {
            Ok(())
        } else {
            Err(ClassActionError::MethodNotPublic {
                class: self.class.display_name().to_string(),
                method: name.to_string(),
            })
        }
    }

    /// Runs the block declared for exactly `format` and `guard`, then copies
    /// working state onto the controller.
    ///
    /// Returns `Ok(false)` if no such declaration exists.
    pub fn run_format_block(&mut self, controller: &mut C, format: &Format, guard: Option<&str>) -> Result<bool> {
        let class = Arc::clone(&self.class);
        let Some(rule) = class.formats().get(Some(format), guard) else {
            return Ok(false);
        };

        let result = match &rule.value {
            Some(block) => block(&mut self.scope(controller)),
            None => Ok(()),
        };
        self.copy_to_controller(controller);
        result.map(|_| true)
    }

    /// Copies working state onto the controller.
    pub fn copy_to_controller(&self, controller: &mut C) {
        assigns::copy_to_controller(&self.assigns, controller);
    }

    /// Copies the controller's view assigns into working state.
    pub fn copy_from_controller(&mut self, controller: &C) {
        assigns::copy_from_controller(controller, &mut self.assigns);
    }
}

impl<C> fmt::Debug for ActionHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandler")
            .field("action", &self.action)
            .field("assigns", &self.assigns)
            .field("phase", &self.phase)
            .finish()
    }
}
