// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Per-format response blocks.
//!
//! A [`Responder`] lists the formats an action answers and, optionally, a
//! block to run for each. The controller never sees the blocks directly: it
//! receives a [`FormatCollector`], negotiates one of its formats and calls
//! [`FormatCollector::respond`], which runs the block in the action's context
//! and copies the action's working state back onto the controller.

use crate::assigns::{self, Assigns};
use crate::class::{ActionClass, BlockFn};
use crate::controller::Controller;
use crate::error::Result;
use crate::format::Format;
use crate::rules::RuleList;
use crate::scope::ActionScope;
use std::fmt;
use std::sync::Arc;

/// An ordered set of formats with optional blocks.
///
/// Each format appears at most once; the first entry added for a format wins.
pub struct Responder<C> {
    entries: Vec<(Format, Option<BlockFn<C>>)>,
}

impl<C: Controller> Responder<C> {
    /// Creates an empty responder.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Answers the format with the controller's default rendering.
    pub fn format(self, format: impl Into<Format>) -> Self {
        self.entry(format.into(), None)
    }

    /// Answers the format by running `block`.
    pub fn block<F>(self, format: impl Into<Format>, block: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) -> Result<()> + Send + Sync + 'static,
    {
        self.entry(format.into(), Some(Arc::new(block)))
    }

    fn entry(mut self, format: Format, block: Option<BlockFn<C>>) -> Self {
        if !self.entries.iter().any(|(f, _)| *f == format) {
            self.entries.push((format, block));
        }
        self
    }

    /// Builds the responder for a class's per-format declarations.
    ///
    /// For each declared format, in declaration order, the first rule whose
    /// guard holds (or that has none) is selected. Formats without a matching
    /// rule are left out.
    pub fn from_rules<F>(rules: &RuleList<Option<BlockFn<C>>>, mut holds: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        let mut responder = Self::new();
        for format in rules.formats() {
            let selected =
                rules.resolve_matching(|rule| rule.format.as_ref() == Some(&format), &mut holds)?;
            if let Some(rule) = selected {
                responder = responder.entry(format, rule.value.clone());
            }
        }
        Ok(responder)
    }

    /// The formats, in order.
    pub fn formats(&self) -> Vec<Format> {
        self.entries.iter().map(|(format, _)| format.clone()).collect()
    }

    /// Returns true if any entry carries a block.
    pub fn has_blocks(&self) -> bool {
        self.entries.iter().any(|(_, block)| block.is_some())
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry answering `format`: the exact format, else the wildcard.
    fn lookup(&self, format: &Format) -> Option<&(Format, Option<BlockFn<C>>)> {
        self.entries
            .iter()
            .find(|(f, _)| f == format)
            .or_else(|| self.entries.iter().find(|(f, _)| f.is_any()))
    }
}

impl<C: Controller> Default for Responder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Responder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|(format, block)| (format.as_str(), block.is_some())),
            )
            .finish()
    }
}

/// A responder bound to a running action, handed to the controller.
pub struct FormatCollector<'a, C> {
    responder: Responder<C>,
    assigns: &'a mut Assigns,
    class: &'a ActionClass<C>,
    responded: Option<Format>,
}

impl<'a, C: Controller> FormatCollector<'a, C> {
    pub(crate) fn new(responder: Responder<C>, assigns: &'a mut Assigns, class: &'a ActionClass<C>) -> Self {
        Self {
            responder,
            assigns,
            class,
            responded: None,
        }
    }

    /// The formats the action answers, in order. May contain `any`.
    pub fn formats(&self) -> Vec<Format> {
        self.responder.formats()
    }

    /// Returns true if the action answers `format`, directly or through `any`.
    pub fn accepts(&self, format: &Format) -> bool {
        self.responder.lookup(format).is_some()
    }

    /// Runs the action's block for `format` against `controller`.
    ///
    /// Returns `Ok(false)` if the action does not answer the format. Returns
    /// `Ok(true)` otherwise, including when the entry has no block and the
    /// controller should apply its default rendering. After a block runs, the
    /// action's working state is copied onto the controller, whether or not
    /// the block succeeded.
    pub fn respond(&mut self, format: &Format, controller: &mut C) -> Result<bool> {
        let block = match self.responder.lookup(format) {
            Some((_, block)) => block.clone(),
            None => return Ok(false),
        };
        self.responded = Some(format.clone());

        let Some(block) = block else {
            return Ok(true);
        };

        let result = {
            let mut scope = ActionScope::new(&mut *controller, &mut *self.assigns, self.class);
            block(&mut scope)
        };
        assigns::copy_to_controller(self.assigns, controller);
        result.map(|_| true)
    }

    /// The format most recently answered through [`respond`](Self::respond).
    pub fn responded_format(&self) -> Option<&Format> {
        self.responded.as_ref()
    }
}

impl<C> fmt::Debug for FormatCollector<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatCollector")
            .field("responder", &self.responder)
            .field("responded", &self.responded)
            .finish()
    }
}
