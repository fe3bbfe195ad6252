// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Action registration and dispatch.
//!
//! A [`Dispatcher`] belongs to one controller type. It binds action names to
//! action classes, keeps the controller type's [`MimeTable`] in line with the
//! formats each class declares, and runs actions against controller
//! instances. Each controller instance owns an [`ActionCache`] in which the
//! dispatcher memoizes one [`ActionHandler`] per action.
//!
//! # Class lookup
//!
//! [`Dispatcher::register`] resolves the class for every action name:
//!
//! 1. an explicit class, if given;
//! 2. otherwise a class defined on the dispatcher under the requested name,
//!    or the conventional name (`new_post` → `NewPostAction`);
//! 3. otherwise each file of the configured search path is offered to the
//!    [`ActionLoader`], and the first file found must define that class.

use crate::assigns;
use crate::class::ActionClass;
use crate::config::DispatcherConfig;
use crate::controller::Controller;
use crate::error::{ClassActionError, Result};
use crate::handler::ActionHandler;
use crate::helpers::ViewContext;
use crate::loader::ActionLoader;
use crate::mime::MimeTable;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to a memoized action instance.
pub type HandlerRef<C> = Rc<RefCell<ActionHandler<C>>>;

/// Per-controller-instance handler cache.
pub struct ActionCache<C> {
    handlers: HashMap<String, HandlerRef<C>>,
}

impl<C: Controller> ActionCache<C> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The memoized handler for an action.
    pub fn get(&self, action: &str) -> Option<HandlerRef<C>> {
        self.handlers.get(action).map(Rc::clone)
    }

    /// Returns true if a handler was created for the action.
    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Number of memoized handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler was created yet.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn insert(&mut self, action: &str, handler: HandlerRef<C>) {
        self.handlers.insert(action.to_string(), handler);
    }
}

impl<C: Controller> Default for ActionCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&String> = self.handlers.keys().collect();
        actions.sort();
        f.debug_struct("ActionCache").field("actions", &actions).finish()
    }
}

/// Where registration finds the class for an action.
pub enum HandlerSource<C> {
    /// The conventional class name: camelized action name plus the configured suffix.
    Convention,
    /// A class looked up by name.
    Named(String),
    /// An explicit class.
    Class(Arc<ActionClass<C>>),
}

impl<C> From<Arc<ActionClass<C>>> for HandlerSource<C> {
    fn from(class: Arc<ActionClass<C>>) -> Self {
        HandlerSource::Class(class)
    }
}

impl<C> From<&Arc<ActionClass<C>>> for HandlerSource<C> {
    fn from(class: &Arc<ActionClass<C>>) -> Self {
        HandlerSource::Class(Arc::clone(class))
    }
}

impl<C> From<&str> for HandlerSource<C> {
    fn from(name: &str) -> Self {
        HandlerSource::Named(name.to_string())
    }
}

struct Registration<C> {
    action: String,
    class: Arc<ActionClass<C>>,
}

/// Class-action registry of one controller type.
pub struct Dispatcher<C> {
    controller: String,
    config: DispatcherConfig,
    classes: HashMap<String, Arc<ActionClass<C>>>,
    loader: Option<Box<dyn ActionLoader<C>>>,
    actions: Vec<Registration<C>>,
    delegated: Vec<String>,
    mime_table: MimeTable,
}

impl<C: Controller> Dispatcher<C> {
    /// Creates a dispatcher with the default configuration.
    pub fn new(controller: impl Into<String>) -> Self {
        Self::with_config(controller, DispatcherConfig::default())
    }

    /// Creates a dispatcher with the given configuration.
    pub fn with_config(controller: impl Into<String>, config: DispatcherConfig) -> Self {
        Self {
            controller: controller.into(),
            config,
            classes: HashMap::new(),
            loader: None,
            actions: Vec::new(),
            delegated: Vec::new(),
            mime_table: MimeTable::new(),
        }
    }

    /// Sets the loader consulted for classes that are not defined yet.
    pub fn with_loader(mut self, loader: impl ActionLoader<C> + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Sets the controller type's format table.
    pub fn with_mime_table(mut self, table: MimeTable) -> Self {
        self.mime_table = table;
        self
    }

    /// Makes a class available to name-based lookup.
    pub fn define_class(&mut self, class: Arc<ActionClass<C>>) {
        match class.name() {
            Some(name) if !name.is_empty() => {
                self.classes.insert(name.to_string(), class);
            }
            _ => tracing::warn!("Ignoring anonymous action class defined on {}", self.controller),
        }
    }

    /// The controller type name.
    pub fn controller_name(&self) -> &str {
        &self.controller
    }

    /// The dispatcher configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The controller type's format table.
    pub fn mime_table(&self) -> &MimeTable {
        &self.mime_table
    }

    /// The controller type's format table, mutably.
    pub fn mime_table_mut(&mut self) -> &mut MimeTable {
        &mut self.mime_table
    }

    /// Registers class actions.
    ///
    /// Registering an action again replaces its class. Fails on the first
    /// action whose class cannot be resolved; actions before it stay registered.
    pub fn register<I, S>(&mut self, actions: I, source: impl Into<HandlerSource<C>>) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = source.into();
        for action in actions {
            let action = action.into();
            let class = self.resolve_class(&action, &source)?;

            tracing::debug!(
                "Registering class action {}#{} -> {}",
                self.controller,
                action,
                class.display_name()
            );

            if self.config.inject_mime_types {
                self.mime_table.inject(&action, &class.formats().formats());
            }

            match self.actions.iter_mut().find(|r| r.action == action) {
                Some(existing) => existing.class = class,
                None => self.actions.push(Registration { action, class }),
            }
        }
        Ok(())
    }

    fn resolve_class(&mut self, action: &str, source: &HandlerSource<C>) -> Result<Arc<ActionClass<C>>> {
        let class = match source {
            HandlerSource::Class(class) => Arc::clone(class),
            HandlerSource::Named(name) => self.find_class(action, name)?,
            HandlerSource::Convention => {
                let name = self.config.class_name_for(action);
                self.find_class(action, &name)?
            }
        };

        if class.is_anonymous() {
            return Err(ClassActionError::AnonymousHandler {
                action: action.to_string(),
            });
        }
        Ok(class)
    }

    fn find_class(&mut self, action: &str, class_name: &str) -> Result<Arc<ActionClass<C>>> {
        if let Some(class) = self.classes.get(class_name) {
            return Ok(Arc::clone(class));
        }

        let loader = match &self.loader {
            Some(loader) if !self.config.search_path.is_empty() => loader,
            _ => {
                return Err(ClassActionError::HandlerNotFound {
                    action: action.to_string(),
                    class_name: class_name.to_string(),
                })
            }
        };

        let candidates = self.config.candidate_files(class_name);
        for file in &candidates {
            let Some(class) = loader.load(file)? else {
                continue;
            };

            if class.name() != Some(class_name) {
                return Err(ClassActionError::WrongTypeLoaded {
                    expected: class_name.to_string(),
                    found: class.name().unwrap_or_default().to_string(),
                    file: file.clone(),
                });
            }

            tracing::debug!("Loaded action class {} from {}", class_name, file);
            self.classes.insert(class_name.to_string(), Arc::clone(&class));
            return Ok(class);
        }

        Err(ClassActionError::NoMatchingFile {
            class_name: class_name.to_string(),
            candidates,
        })
    }

    /// Returns true if the action is a registered class action.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|r| r.action == action)
    }

    /// The class registered for an action.
    pub fn action_class(&self, action: &str) -> Option<&Arc<ActionClass<C>>> {
        self.actions.iter().find(|r| r.action == action).map(|r| &r.class)
    }

    /// Registered action names, in registration order.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|r| r.action.as_str()).collect()
    }

    /// The controller instance's handler for an action, created on first access.
    ///
    /// A new handler snapshots the controller's view assigns; its first
    /// [`execute`](ActionHandler::execute) refreshes them.
    pub fn action(&self, controller: &mut C, action: &str) -> Result<HandlerRef<C>> {
        let class = self.action_class(action).ok_or_else(|| ClassActionError::UnknownAction {
            controller: self.controller.clone(),
            action: action.to_string(),
        })?;

        if let Some(handler) = controller.action_cache().get(action) {
            return Ok(handler);
        }

        tracing::debug!("Creating {} for {}#{}", class.display_name(), self.controller, action);
        let handler = Rc::new(RefCell::new(ActionHandler::new(action, Arc::clone(class), controller)));
        controller.action_cache_mut().insert(action, Rc::clone(&handler));
        Ok(handler)
    }

    /// Runs a class action against a controller instance, then copies the
    /// action's working state onto the controller.
    pub fn dispatch(&self, controller: &mut C, action: &str) -> Result<()> {
        let handler = self.action(controller, action)?;
        let mut handler = handler.try_borrow_mut().map_err(|_| ClassActionError::HandlerBusy {
            action: action.to_string(),
        })?;

        handler.execute(controller)?;
        handler.copy_to_controller(controller);
        Ok(())
    }

    /// The handler of the controller's current action, if that action is a
    /// class action.
    pub fn current_action(&self, controller: &mut C) -> Result<Option<HandlerRef<C>>> {
        let Some(action) = controller.action_name().map(str::to_string) else {
            return Ok(None);
        };
        if !self.has_action(&action) {
            return Ok(None);
        }
        self.action(controller, &action).map(Some)
    }

    /// Runs `f` against the controller's current action.
    ///
    /// While that action is executing, its working state is mirrored on the
    /// controller; `f` then runs against a detached instance seeded from the
    /// controller, whose state is copied back onto the controller afterwards.
    pub(crate) fn with_current_action<R, F>(&self, controller: &mut C, f: F) -> Result<R>
    where
        F: FnOnce(&mut ActionHandler<C>, &mut C) -> Result<R>,
    {
        let handler = self
            .current_action(controller)?
            .ok_or(ClassActionError::NoActiveAction)?;

        // Bound so the `RefMut` temporary drops before `handler`.
        let result = match handler.try_borrow_mut() {
            Ok(mut handler) => f(&mut handler, controller),
            Err(_) => {
                let action = controller.action_name().unwrap_or_default().to_string();
                let class = self
                    .action_class(&action)
                    .cloned()
                    .ok_or(ClassActionError::NoActiveAction)?;
                let mut detached = ActionHandler::new(action, class, controller);
                let result = f(&mut detached, controller);
                detached.copy_to_controller(controller);
                result
            }
        };
        result
    }

    /// Forwards the given methods to the current action.
    pub fn delegate<I, S>(&mut self, methods: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for method in methods {
            let method = method.into();
            if !self.delegated.contains(&method) {
                self.delegated.push(method);
            }
        }
    }

    /// Returns true if the method is delegated to the current action.
    pub fn delegates(&self, method: &str) -> bool {
        self.delegated.iter().any(|m| m == method)
    }

    /// Calls a delegated method from outside the controller: only public
    /// methods of the action can be reached.
    pub fn call_delegated(&self, controller: &mut C, method: &str, args: &[JsonValue]) -> Result<JsonValue> {
        self.ensure_delegated(method)?;
        self.with_current_action(controller, |handler, controller| {
            Self::warn_undefined(handler, method);
            handler.call_public(controller, method, args)
        })
    }

    /// Calls a delegated method from inside the controller: public and
    /// protected methods of the action can be reached.
    pub fn call_delegated_restricted(
        &self,
        controller: &mut C,
        method: &str,
        args: &[JsonValue],
    ) -> Result<JsonValue> {
        self.ensure_delegated(method)?;
        self.with_current_action(controller, |handler, controller| {
            Self::warn_undefined(handler, method);
            handler.call_restricted(controller, method, args)
        })
    }

    fn ensure_delegated(&self, method: &str) -> Result<()> {
        if self.delegates(method) {
            Ok(())
        } else {
            Err(ClassActionError::UnknownMethod {
                class: self.controller.clone(),
                method: method.to_string(),
            })
        }
    }

    fn warn_undefined(handler: &ActionHandler<C>, method: &str) {
        if handler.class().method(method).is_none() {
            tracing::warn!(
                "Delegated method '{}' is not defined on {}",
                method,
                handler.class().display_name()
            );
        }
    }

    /// Builds the rendering context for the controller's templates.
    ///
    /// The context carries the controller's view assigns and, once the
    /// current action's handler exists on this controller instance, that
    /// action's helpers.
    pub fn view_context(&self, controller: &C) -> ViewContext<'_, C> {
        let helpers = controller
            .action_name()
            .filter(|action| controller.action_cache().contains(action))
            .and_then(|action| self.action_class(action))
            .map(|class| Arc::clone(class.helpers()));

        let mut view_assigns = controller.view_assigns();
        view_assigns.retain(|name, _| !assigns::is_protected(name));
        ViewContext::new(self, view_assigns, helpers)
    }
}

impl<C: Controller> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("controller", &self.controller)
            .field("config", &self.config)
            .field(
                "actions",
                &self
                    .actions
                    .iter()
                    .map(|r| (r.action.as_str(), r.class.name()))
                    .collect::<Vec<_>>(),
            )
            .field("delegated", &self.delegated)
            .field("mime_table", &self.mime_table)
            .finish()
    }
}
