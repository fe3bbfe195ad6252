// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! View helpers exposed by actions.
//!
//! An action class declares some of its methods as helpers. Those names are
//! collected in the class's [`HelperModule`], which chains to the helper
//! module of the class it extends. When a controller builds a
//! [`ViewContext`] while an action is active, that action's helper module is
//! mixed in: calling a helper on the view context forwards to the active
//! action instance of the controller.

use crate::assigns::Assigns;
use crate::controller::Controller;
use crate::dispatcher::Dispatcher;
use crate::error::{ClassActionError, Result};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Helper names declared by one action class.
#[derive(Debug)]
pub struct HelperModule {
    owner: String,
    names: Vec<String>,
    parent: Option<Arc<HelperModule>>,
}

impl HelperModule {
    /// Creates a helper module.
    pub fn new(owner: impl Into<String>, names: Vec<String>, parent: Option<Arc<HelperModule>>) -> Self {
        Self {
            owner: owner.into(),
            names,
            parent,
        }
    }

    /// The class that declared this module.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The module of the parent class, if any.
    pub fn parent(&self) -> Option<&Arc<HelperModule>> {
        self.parent.as_ref()
    }

    /// Returns true if this module or one of its ancestors declares `name`.
    pub fn responds_to(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
            || self.parent.as_ref().is_some_and(|parent| parent.responds_to(name))
    }

    /// All helper names, own names first, without duplicates.
    pub fn method_names(&self) -> Vec<String> {
        let mut names = self.names.clone();
        let mut ancestor = self.parent.as_ref();
        while let Some(module) = ancestor {
            for name in &module.names {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            ancestor = module.parent.as_ref();
        }
        names
    }
}

/// The rendering context a controller hands to its templates.
///
/// Carries a snapshot of the controller's view assigns and, if an action is
/// active, that action's helper module.
pub struct ViewContext<'d, C> {
    dispatcher: &'d Dispatcher<C>,
    assigns: Assigns,
    helpers: Option<Arc<HelperModule>>,
}

impl<'d, C: Controller> ViewContext<'d, C> {
    pub(crate) fn new(dispatcher: &'d Dispatcher<C>, assigns: Assigns, helpers: Option<Arc<HelperModule>>) -> Self {
        Self {
            dispatcher,
            assigns,
            helpers,
        }
    }

    /// Reads a template variable.
    pub fn assign(&self, name: &str) -> Option<&JsonValue> {
        self.assigns.get(name)
    }

    /// All template variables.
    pub fn assigns(&self) -> &Assigns {
        &self.assigns
    }

    /// The helper module mixed into this context, if any.
    pub fn helpers(&self) -> Option<&Arc<HelperModule>> {
        self.helpers.as_ref()
    }

    /// Returns true if `name` is a helper available in this context.
    pub fn responds_to(&self, name: &str) -> bool {
        self.helpers.as_ref().is_some_and(|helpers| helpers.responds_to(name))
    }

    /// Calls a helper, forwarding to the controller's active action.
    ///
    /// Helpers can be called while the action is rendering: they then see
    /// the working state mirrored on the controller, and their changes are
    /// mirrored back.
    pub fn call_helper(&self, controller: &mut C, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        if !self.responds_to(name) {
            return Err(ClassActionError::UnknownMethod {
                class: "view context".to_string(),
                method: name.to_string(),
            });
        }

        self.dispatcher
            .with_current_action(controller, |handler, controller| handler.call(controller, name, args))
    }
}
