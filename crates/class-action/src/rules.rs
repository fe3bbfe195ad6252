// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Ordered, guarded rule registries.
//!
//! Response declarations (`respond_with`) and per-format declarations
//! (`respond_to`) are both stored in a [`RuleList`]. Each rule may carry a
//! guard: the name of a predicate method on the action. Matching walks the
//! list in order and picks the first rule whose guard holds.
//!
//! The list keeps unconditional rules after all guarded ones, so a guarded
//! rule always gets the first chance to match no matter where it was
//! declared. Among guarded rules, declaration order decides. The formats
//! themselves keep the order in which each was first declared.

use crate::error::Result;
use crate::format::Format;

/// A single declaration, keyed by its format and guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<T> {
    /// The format this rule applies to (`None` for response rules).
    pub format: Option<Format>,
    /// The guard that must hold, or `None` for an unconditional rule.
    pub guard: Option<String>,
    /// The declared value.
    pub value: T,
}

impl<T> Rule<T> {
    /// Creates a rule.
    pub fn new(format: Option<Format>, guard: Option<String>, value: T) -> Self {
        Self { format, guard, value }
    }

    /// Returns true if the rule has a guard.
    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    fn same_key(&self, other: &Rule<T>) -> bool {
        self.format == other.format && self.guard == other.guard
    }
}

/// An ordered rule collection with unconditional rules kept last.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleList<T> {
    rules: Vec<Rule<T>>,
    declared: Vec<Format>,
}

impl<T> Default for RuleList<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            declared: Vec::new(),
        }
    }
}

impl<T: Clone> RuleList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule.
    ///
    /// A rule with the same format and guard as an existing one replaces its
    /// value in place. Otherwise guarded rules are inserted before the first
    /// unconditional rule and unconditional rules are appended.
    pub fn insert(&mut self, rule: Rule<T>) {
        if let Some(format) = &rule.format {
            if !self.declared.contains(format) {
                self.declared.push(format.clone());
            }
        }

        if let Some(existing) = self.rules.iter_mut().find(|r| r.same_key(&rule)) {
            existing.value = rule.value;
            return;
        }

        let position = if rule.is_guarded() {
            self.rules
                .iter()
                .position(|r| !r.is_guarded())
                .unwrap_or(self.rules.len())
        } else {
            self.rules.len()
        };
        self.rules.insert(position, rule);
    }

    /// Returns a copy of this list overlaid with `rules`. `self` is left untouched.
    pub fn extended<I>(&self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        let mut merged = self.clone();
        for rule in rules {
            merged.insert(rule);
        }
        merged
    }

    /// Returns the first rule whose guard holds (or that has no guard).
    ///
    /// Guards are evaluated lazily, in order, and evaluation stops at the
    /// first match. Errors from a guard propagate.
    pub fn resolve<F>(&self, holds: F) -> Result<Option<&Rule<T>>>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        self.resolve_matching(|_| true, holds)
    }

    /// Like [`resolve`](Self::resolve), restricted to rules accepted by `filter`.
    pub fn resolve_matching<P, F>(&self, mut filter: P, mut holds: F) -> Result<Option<&Rule<T>>>
    where
        P: FnMut(&Rule<T>) -> bool,
        F: FnMut(&str) -> Result<bool>,
    {
        for rule in self.rules.iter().filter(|r| filter(r)) {
            match &rule.guard {
                None => return Ok(Some(rule)),
                Some(guard) => {
                    if holds(guard)? {
                        return Ok(Some(rule));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Looks up the rule declared for exactly this format and guard.
    pub fn get(&self, format: Option<&Format>, guard: Option<&str>) -> Option<&Rule<T>> {
        self.rules
            .iter()
            .find(|r| r.format.as_ref() == format && r.guard.as_deref() == guard)
    }

    /// Distinct formats in the order they were first declared, regardless
    /// of guards.
    pub fn formats(&self) -> Vec<Format> {
        self.declared.clone()
    }

    /// Iterates the rules in matching order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<T>> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a RuleList<T> {
    type Item = &'a Rule<T>;
    type IntoIter = std::slice::Iter<'a, Rule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
