// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action classes.
//!
//! An [`ActionClass`] describes one kind of controller action: the methods it
//! runs, the guards it checks, how it responds, and which helpers it exposes
//! to views. Classes are built once with [`ActionClassBuilder`] and shared
//! behind an `Arc`; every request gets its own
//! [`ActionHandler`](crate::ActionHandler) instance of the class.
//!
//! # Example
//!
//! ```rust,ignore
//! use class_action::{ActionClass, Respond, Render};
//!
//! let update = ActionClass::<PostsController>::builder("UpdateAction")
//!     .step("load_post", |scope| {
//!         let id = scope.params().get("id").cloned().unwrap_or_default();
//!         scope.set("post", serde_json::json!({ "id": id }));
//!         Ok(())
//!     })
//!     .guard("invalid", |scope| Ok(scope.get("errors").is_some()))
//!     .respond_with("@post")
//!     .respond_to(Respond::to(["html"]).on("invalid").with(|scope| {
//!         scope.render(Render::template("posts/edit").with_status(422))
//!     }))
//!     .respond_to(Respond::to(["html", "json"]))
//!     .build();
//! ```

use crate::controller::Controller;
use crate::error::Result;
use crate::format::Format;
use crate::helpers::HelperModule;
use crate::rules::{Rule, RuleList};
use crate::scope::ActionScope;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Body of an action method.
pub type MethodFn<C> =
    Arc<dyn Fn(&mut ActionScope<'_, C>, &[JsonValue]) -> Result<JsonValue> + Send + Sync>;

/// Body of a per-format response block.
pub type BlockFn<C> = Arc<dyn Fn(&mut ActionScope<'_, C>) -> Result<()> + Send + Sync>;

/// Availability predicate.
pub type AvailableFn<C> = Arc<dyn Fn(&mut ActionScope<'_, C>) -> Result<bool> + Send + Sync>;

/// Method visibility.
///
/// Only public zero-argument methods are run as action steps. Protected and
/// private methods can still be called from other methods, guards, helpers
/// and restricted delegations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Runs as a step when it takes no arguments.
    Public,
    /// Callable from the action and restricted delegations.
    Protected,
    /// Callable from the action only.
    Private,
}

/// A named method of an action class.
pub struct MethodDef<C> {
    name: String,
    visibility: Visibility,
    arity: usize,
    body: MethodFn<C>,
}

impl<C> MethodDef<C> {
    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Number of arguments the method takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn body(&self) -> &MethodFn<C> {
        &self.body
    }

    fn is_step(&self) -> bool {
        self.visibility == Visibility::Public && self.arity == 0
    }
}

impl<C> Clone for MethodDef<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            visibility: self.visibility,
            arity: self.arity,
            body: Arc::clone(&self.body),
        }
    }
}

impl<C> fmt::Debug for MethodDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A per-format response declaration.
///
/// ```rust,ignore
/// Respond::to(["html"]).on("invalid").with(|scope| scope.render(Render::template("edit")))
/// Respond::any()
/// ```
pub struct Respond<C> {
    formats: Vec<Format>,
    guard: Option<String>,
    block: Option<BlockFn<C>>,
}

impl<C: Controller> Respond<C> {
    /// Declares a response for the given formats.
    pub fn to<I, F>(formats: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Format>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
            guard: None,
            block: None,
        }
    }

    /// Declares a response for any remaining format.
    pub fn any() -> Self {
        Self::to([Format::any()])
    }

    /// Applies the declaration only while the named guard holds.
    pub fn on(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Runs the block when the controller responds in one of the formats.
    pub fn with<F>(mut self, block: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<()> + Send + Sync + 'static,
    {
        self.block = Some(Arc::new(block));
        self
    }
}

/// An immutable action class descriptor.
pub struct ActionClass<C> {
    name: Option<String>,
    ancestors: Vec<String>,
    methods: Vec<MethodDef<C>>,
    available: Option<AvailableFn<C>>,
    responses: RuleList<String>,
    formats: RuleList<Option<BlockFn<C>>>,
    helpers: Arc<HelperModule>,
}

impl<C: Controller> ActionClass<C> {
    /// Starts building a named class.
    pub fn builder(name: impl Into<String>) -> ActionClassBuilder<C> {
        ActionClassBuilder::new(Some(name.into()))
    }

    /// Starts building a class without a name. Anonymous classes can be
    /// instantiated directly but are rejected by dispatcher registration.
    pub fn anonymous() -> ActionClassBuilder<C> {
        ActionClassBuilder::new(None)
    }

    /// The class name, unless anonymous.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The class name for messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(anonymous)")
    }

    /// Returns true if the class has no name.
    pub fn is_anonymous(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
    }

    /// Returns true if this class is, or extends, the named class.
    pub fn is_a(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.ancestors.iter().any(|a| a == name)
    }

    /// Names of the classes this one extends, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Looks up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodDef<C>> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Every method, inherited ones first.
    pub fn methods(&self) -> &[MethodDef<C>] {
        &self.methods
    }

    /// The methods run when the action executes: public methods without
    /// arguments, in declaration order.
    pub fn action_methods(&self) -> impl Iterator<Item = &str> + '_ {
        self.methods.iter().filter(|m| m.is_step()).map(|m| m.name.as_str())
    }

    pub(crate) fn available_fn(&self) -> Option<&AvailableFn<C>> {
        self.available.as_ref()
    }

    /// Response declarations in matching order.
    pub fn responses(&self) -> &RuleList<String> {
        &self.responses
    }

    /// Per-format declarations in matching order.
    pub fn formats(&self) -> &RuleList<Option<BlockFn<C>>> {
        &self.formats
    }

    /// Declared formats, excluding the wildcard.
    pub fn declared_formats(&self) -> Vec<Format> {
        self.formats.formats().into_iter().filter(|f| !f.is_any()).collect()
    }

    /// Returns true if a wildcard (`any`) format is declared.
    pub fn responds_to_any_format(&self) -> bool {
        self.formats.iter().any(|r| r.format.as_ref().is_some_and(Format::is_any))
    }

    /// Returns true if any per-format declaration carries a block.
    pub fn has_format_blocks(&self) -> bool {
        self.formats.iter().any(|r| r.value.is_some())
    }

    /// Returns true if a per-format declaration exists for exactly this format and guard.
    pub fn responds_to_format(&self, format: &Format, guard: Option<&str>) -> bool {
        self.formats.get(Some(format), guard).is_some()
    }

    /// The resolver declared for exactly this guard.
    pub fn response_for(&self, guard: Option<&str>) -> Option<&str> {
        self.responses.get(None, guard).map(|r| r.value.as_str())
    }

    /// Helper methods exposed to views.
    pub fn helpers(&self) -> &Arc<HelperModule> {
        &self.helpers
    }
}

impl<C: Controller> fmt::Debug for ActionClass<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionClass")
            .field("name", &self.name)
            .field("ancestors", &self.ancestors)
            .field("methods", &self.methods)
            .field("responses", &self.responses)
            .field("formats", &self.formats.formats())
            .field("helpers", &self.helpers)
            .finish()
    }
}

/// Builder for [`ActionClass`].
pub struct ActionClassBuilder<C> {
    name: Option<String>,
    parent: Option<Arc<ActionClass<C>>>,
    methods: Vec<MethodDef<C>>,
    available: Option<AvailableFn<C>>,
    responses: Vec<Rule<String>>,
    formats: Vec<Rule<Option<BlockFn<C>>>>,
    helper_methods: Vec<String>,
}

impl<C: Controller> ActionClassBuilder<C> {
    fn new(name: Option<String>) -> Self {
        Self {
            name,
            parent: None,
            methods: Vec::new(),
            available: None,
            responses: Vec::new(),
            formats: Vec::new(),
            helper_methods: Vec::new(),
        }
    }

    /// Inherits methods, declarations and helpers from `parent`.
    pub fn extends(mut self, parent: &Arc<ActionClass<C>>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Defines a method.
    ///
    /// Redefining a method (including an inherited one) replaces its body and
    /// keeps its position.
    pub fn method<F>(mut self, name: impl Into<String>, visibility: Visibility, arity: usize, body: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>, &[JsonValue]) -> Result<JsonValue> + Send + Sync + 'static,
    {
        let def = MethodDef {
            name: name.into(),
            visibility,
            arity,
            body: Arc::new(body),
        };
        match self.methods.iter_mut().find(|m| m.name == def.name) {
            Some(existing) => *existing = def,
            None => self.methods.push(def),
        }
        self
    }

    /// Defines a step: a public method without arguments, run in order when
    /// the action executes.
    pub fn step<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<()> + Send + Sync + 'static,
    {
        self.method(name, Visibility::Public, 0, move |scope, _| {
            body(scope)?;
            Ok(JsonValue::Null)
        })
    }

    /// Defines a protected method without arguments, typically a response
    /// resolver.
    pub fn protected<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<JsonValue> + Send + Sync + 'static,
    {
        self.method(name, Visibility::Protected, 0, move |scope, _| body(scope))
    }

    /// Defines a guard: a protected predicate referenced by response rules.
    pub fn guard<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<bool> + Send + Sync + 'static,
    {
        self.method(name, Visibility::Protected, 0, move |scope, _| {
            predicate(scope).map(JsonValue::Bool)
        })
    }

    /// Overrides the availability predicate (default: always available).
    pub fn available<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<bool> + Send + Sync + 'static,
    {
        self.available = Some(Arc::new(predicate));
        self
    }

    /// Responds with the given resolver unconditionally.
    ///
    /// A resolver starting with `@` reads that working-state variable;
    /// anything else calls the method of that name.
    pub fn respond_with(mut self, resolver: impl Into<String>) -> Self {
        self.responses.push(Rule::new(None, None, resolver.into()));
        self
    }

    /// Responds with the given resolver while the guard holds.
    pub fn respond_with_on(mut self, resolver: impl Into<String>, guard: impl Into<String>) -> Self {
        self.responses
            .push(Rule::new(None, Some(guard.into()), resolver.into()));
        self
    }

    /// Adds a per-format declaration.
    pub fn respond_to(mut self, respond: Respond<C>) -> Self {
        for format in respond.formats {
            self.formats.push(Rule::new(
                Some(format),
                respond.guard.clone(),
                respond.block.clone(),
            ));
        }
        self
    }

    /// Exposes methods of this action to views.
    pub fn helper_method<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.helper_methods.contains(&name) {
                self.helper_methods.push(name);
            }
        }
        self
    }

    /// Finishes the class.
    pub fn build(self) -> Arc<ActionClass<C>> {
        let Self {
            name,
            parent,
            methods: own_methods,
            available,
            responses,
            formats,
            helper_methods,
        } = self;

        let (mut methods, ancestors, parent_available, parent_responses, parent_formats, parent_helpers) =
            match &parent {
                Some(parent) => {
                    let mut ancestors = Vec::with_capacity(parent.ancestors.len() + 1);
                    ancestors.push(parent.display_name().to_string());
                    ancestors.extend(parent.ancestors.iter().cloned());
                    (
                        parent.methods.clone(),
                        ancestors,
                        parent.available.clone(),
                        parent.responses.clone(),
                        parent.formats.clone(),
                        Some(Arc::clone(&parent.helpers)),
                    )
                }
                None => (
                    Vec::new(),
                    Vec::new(),
                    None,
                    RuleList::new(),
                    RuleList::new(),
                    None,
                ),
            };

        for def in own_methods {
            match methods.iter_mut().find(|m| m.name == def.name) {
                Some(existing) => *existing = def,
                None => methods.push(def),
            }
        }

        let helpers = Arc::new(HelperModule::new(
            name.clone().unwrap_or_default(),
            helper_methods,
            parent_helpers,
        ));

        Arc::new(ActionClass {
            name,
            ancestors,
            methods,
            available: available.or(parent_available),
            responses: parent_responses.extended(responses),
            formats: parent_formats.extended(formats),
            helpers,
        })
    }
}
