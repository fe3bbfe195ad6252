// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Lazy loading of action classes.
//!
//! When a dispatcher cannot find an action class by name, it asks an
//! injected [`ActionLoader`] for it. The dispatcher builds the candidate file
//! names from its configured search path (`<dir>/<snake_case class name>`)
//! and offers them to the loader in order; the loader returns the class the
//! file defines, or `None` when no such file exists. The dispatcher then
//! verifies the loaded class has the expected name.
//!
//! This crate never touches the filesystem for this: hosts decide what a
//! "file" is. [`MemoryActionLoader`] keeps classes in memory, and any
//! `Fn(&str) -> Result<Option<Arc<ActionClass<C>>>>` closure is a loader too.

use crate::class::ActionClass;
use crate::controller::Controller;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Loads action classes from candidate files.
pub trait ActionLoader<C>: Send + Sync {
    /// Loads the class defined by `file`, or returns `None` if there is no such file.
    fn load(&self, file: &str) -> Result<Option<Arc<ActionClass<C>>>>;
}

impl<C, F> ActionLoader<C> for F
where
    F: Fn(&str) -> Result<Option<Arc<ActionClass<C>>>> + Send + Sync,
{
    fn load(&self, file: &str) -> Result<Option<Arc<ActionClass<C>>>> {
        self(file)
    }
}

/// In-memory action loader, keyed by file name.
pub struct MemoryActionLoader<C> {
    files: RwLock<HashMap<String, Arc<ActionClass<C>>>>,
}

impl<C: Controller> MemoryActionLoader<C> {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Registers the class a file defines.
    pub fn add_file(&self, file: &str, class: Arc<ActionClass<C>>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.to_string(), class);
    }

    /// Builder-style variant of [`add_file`](Self::add_file).
    pub fn with_file(self, file: &str, class: Arc<ActionClass<C>>) -> Self {
        self.add_file(file, class);
        self
    }

    /// Returns true if the file is known.
    pub fn has_file(&self, file: &str) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(file)
    }
}

impl<C: Controller> Default for MemoryActionLoader<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Controller> ActionLoader<C> for MemoryActionLoader<C> {
    fn load(&self, file: &str) -> Result<Option<Arc<ActionClass<C>>>> {
        let found = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file)
            .cloned();
        tracing::debug!("Loading action file '{}': {}", file, if found.is_some() { "found" } else { "missing" });
        Ok(found)
    }
}

/// Converts a class name to the snake_case file stem (`NewPostAction` → `new_post_action`).
pub fn underscore(class_name: &str) -> String {
    let mut out = String::with_capacity(class_name.len() + 4);
    let chars: Vec<char> = class_name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == ':' {
            if !out.ends_with('/') {
                out.push('/');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('/') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Converts an action name to a class name stem (`new_post` → `NewPost`).
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
