// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Assertions for testing controllers and actions.
//!
//! Each matcher reads the registries of a dispatcher or action class and
//! returns `Err` with a readable failure message when the expectation does
//! not hold, so it fits directly into `assert!`-style tests:
//!
//! ```rust,ignore
//! use class_action::matchers::{have_class_action, respond_to_format, respond_with};
//!
//! have_class_action("show").using_class("ShowAction").matches(&dispatcher)?;
//! respond_with("@post").on("ok").matches(&class)?;
//! respond_to_format("html").on("invalid").matches(&handler)?;
//! ```

use crate::class::ActionClass;
use crate::controller::Controller;
use crate::dispatcher::Dispatcher;
use crate::format::Format;
use crate::handler::ActionHandler;

/// Expects a dispatcher to have a class action, optionally using a given class.
pub fn have_class_action(action: impl Into<String>) -> HaveClassAction {
    HaveClassAction {
        action: action.into(),
        class: None,
    }
}

/// Expects an action to respond to a format, optionally under a guard.
pub fn respond_to_format(format: impl Into<Format>) -> RespondToFormat {
    RespondToFormat {
        format: format.into(),
        guard: None,
    }
}

/// Expects an action to respond with a resolver, optionally under a guard.
pub fn respond_with(resolver: impl Into<String>) -> RespondWith {
    RespondWith {
        resolver: resolver.into(),
        guard: None,
    }
}

fn on_suffix(guard: Option<&str>) -> String {
    guard.map(|g| format!(" on :{}", g)).unwrap_or_default()
}

/// See [`have_class_action`].
#[derive(Debug, Clone)]
pub struct HaveClassAction {
    action: String,
    class: Option<String>,
}

impl HaveClassAction {
    /// Also expects the action to use the named class.
    pub fn using_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Describes the expectation.
    pub fn description(&self) -> String {
        match &self.class {
            Some(class) => format!("have class action :{} using class {}", self.action, class),
            None => format!("have class action :{}", self.action),
        }
    }

    /// Checks the expectation against a dispatcher.
    pub fn matches<C: Controller>(&self, dispatcher: &Dispatcher<C>) -> Result<(), String> {
        let controller = dispatcher.controller_name();
        let Some(found) = dispatcher.action_class(&self.action) else {
            return Err(format!(
                "expected controller of class {} to have class action :{}",
                controller, self.action
            ));
        };

        if let Some(expected) = &self.class {
            if found.display_name() != expected {
                return Err(format!(
                    "expected action {}#{} to use class {}, but it used {}",
                    controller,
                    self.action,
                    expected,
                    found.display_name()
                ));
            }
        }
        Ok(())
    }

    /// Checks the negated expectation against a dispatcher.
    pub fn does_not_match<C: Controller>(&self, dispatcher: &Dispatcher<C>) -> Result<(), String> {
        if self.matches(dispatcher).is_err() {
            return Ok(());
        }
        let controller = dispatcher.controller_name();
        Err(match &self.class {
            Some(class) => format!(
                "expected {}#{} not to be a class action using class {}",
                controller, self.action, class
            ),
            None => format!("expected {}#{} not to be a class action", controller, self.action),
        })
    }
}

/// See [`respond_to_format`].
#[derive(Debug, Clone)]
pub struct RespondToFormat {
    format: Format,
    guard: Option<String>,
}

impl RespondToFormat {
    /// Only considers declarations made under this guard.
    pub fn on(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Describes the expectation.
    pub fn description(&self) -> String {
        format!("respond to format :{}{}", self.format, on_suffix(self.guard.as_deref()))
    }

    fn failure_message<C: Controller>(&self, class: &ActionClass<C>, negated: bool) -> String {
        format!(
            "expected action of class {} {}to respond to format :{}{}",
            class.display_name(),
            if negated { "not " } else { "" },
            self.format,
            on_suffix(self.guard.as_deref())
        )
    }

    /// Checks the expectation against an action instance.
    pub fn matches<C: Controller>(&self, handler: &ActionHandler<C>) -> Result<(), String> {
        let class = handler.class();
        if class.responds_to_format(&self.format, self.guard.as_deref()) {
            Ok(())
        } else {
            Err(self.failure_message(class, false))
        }
    }

    /// Checks the expectation, then runs the declared block for the format
    /// against `controller` and finally `check`.
    ///
    /// Working state is copied onto the controller before `check` runs.
    pub fn matches_then<C, F>(&self, handler: &mut ActionHandler<C>, controller: &mut C, check: F) -> Result<(), String>
    where
        C: Controller,
        F: FnOnce(&C),
    {
        self.matches(handler)?;
        handler
            .run_format_block(controller, &self.format, self.guard.as_deref())
            .map_err(|e| format!("response block for format :{} failed: {}", self.format, e))?;
        check(controller);
        Ok(())
    }

    /// Checks the negated expectation against an action instance.
    pub fn does_not_match<C: Controller>(&self, handler: &ActionHandler<C>) -> Result<(), String> {
        match self.matches(handler) {
            Ok(()) => Err(self.failure_message(handler.class(), true)),
            Err(_) => Ok(()),
        }
    }
}

/// See [`respond_with`].
#[derive(Debug, Clone)]
pub struct RespondWith {
    resolver: String,
    guard: Option<String>,
}

impl RespondWith {
    /// Only considers the declaration made under this guard.
    pub fn on(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Describes the expectation.
    pub fn description(&self) -> String {
        format!("respond with method :{}{}", self.resolver, on_suffix(self.guard.as_deref()))
    }

    /// Checks the expectation against an action class.
    pub fn matches<C: Controller>(&self, class: &ActionClass<C>) -> Result<(), String> {
        let actual = class.response_for(self.guard.as_deref());
        if actual == Some(self.resolver.as_str()) {
            return Ok(());
        }

        let suffix = match actual {
            Some(actual) => format!(", but it responds with :{}", actual),
            None => ", but it has no response method".to_string(),
        };
        Err(format!(
            "expected action of class {} to respond with :{}{}{}",
            class.display_name(),
            self.resolver,
            on_suffix(self.guard.as_deref()),
            suffix
        ))
    }

    /// Checks the negated expectation against an action class.
    pub fn does_not_match<C: Controller>(&self, class: &ActionClass<C>) -> Result<(), String> {
        if self.matches(class).is_err() {
            return Ok(());
        }
        Err(format!(
            "expected action of class {} not to respond with :{}{}",
            class.display_name(),
            self.resolver,
            on_suffix(self.guard.as_deref())
        ))
    }
}
