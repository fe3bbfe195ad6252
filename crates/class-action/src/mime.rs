// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Format-to-action routing restrictions.
//!
//! A controller type keeps a [`MimeTable`]: for each format it responds to,
//! an optional `only` list and an optional `except` list of action names.
//! When a class action is registered, [`MimeTable::inject`] adjusts the table
//! so that the action answers exactly the formats its class declares.
//!
//! # Injection
//!
//! Given the formats a class declares (skipped entirely when it declares none
//! or declares the `any` wildcard):
//!
//! - every format already in the table that the class does not declare gets
//!   the action appended to its `except` list;
//! - every declared format gets the action appended to its `only` list,
//!   creating the entry with an empty `only` list when missing. A format that
//!   already excludes the action is left alone and a warning is logged.
//!
//! Appends are idempotent: registering the same action twice changes nothing.

use crate::format::Format;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Restriction of one format to a subset of actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeRestriction {
    /// Actions allowed to answer this format. `None` allows every action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,

    /// Actions never answering this format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<Vec<String>>,
}

impl MimeRestriction {
    /// No restriction: every action answers the format.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only the given actions answer the format.
    pub fn only<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Some(actions.into_iter().map(Into::into).collect()),
            except: None,
        }
    }

    /// Every action except the given ones answers the format.
    pub fn except<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: None,
            except: Some(actions.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns true if the action is on the `except` list.
    pub fn excludes(&self, action: &str) -> bool {
        self.except.as_ref().is_some_and(|list| list.iter().any(|a| a == action))
    }

    /// Returns true if the action is on the `only` list.
    pub fn includes(&self, action: &str) -> bool {
        self.only.as_ref().is_some_and(|list| list.iter().any(|a| a == action))
    }

    /// Returns true if the action may answer the format.
    pub fn allows(&self, action: &str) -> bool {
        !self.excludes(action) && self.only.as_ref().map_or(true, |_| self.includes(action))
    }
}

/// Per-controller format restriction table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeTable(BTreeMap<Format, MimeRestriction>);

impl MimeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the restriction for a format.
    pub fn with(mut self, format: impl Into<Format>, restriction: MimeRestriction) -> Self {
        self.insert(format, restriction);
        self
    }

    /// Adds or replaces the restriction for a format.
    pub fn insert(&mut self, format: impl Into<Format>, restriction: MimeRestriction) {
        self.0.insert(format.into(), restriction);
    }

    /// The restriction for a format.
    pub fn get(&self, format: &Format) -> Option<&MimeRestriction> {
        self.0.get(format)
    }

    /// All formats in the table.
    pub fn formats(&self) -> impl Iterator<Item = &Format> {
        self.0.keys()
    }

    /// Returns true if the action may answer the format.
    pub fn allows(&self, format: &Format, action: &str) -> bool {
        self.0.get(format).is_some_and(|r| r.allows(action))
    }

    /// Number of formats.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no formats are listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Restricts the table so that `action` answers exactly `declared`.
    ///
    /// Does nothing when `declared` is empty or contains the wildcard.
    pub fn inject(&mut self, action: &str, declared: &[Format]) {
        if declared.is_empty() || declared.iter().any(Format::is_any) {
            tracing::debug!("MIME injection skipped for action '{}'", action);
            return;
        }

        for (format, restriction) in self.0.iter_mut() {
            if declared.contains(format) {
                continue;
            }
            let except = restriction.except.get_or_insert_with(Vec::new);
            if !except.iter().any(|a| a == action) {
                except.push(action.to_string());
            }
        }

        for format in declared {
            let restriction = self
                .0
                .entry(format.clone())
                .or_insert_with(|| MimeRestriction::only(Vec::<String>::new()));

            if restriction.excludes(action) {
                tracing::warn!(
                    "Action '{}' is excluded from format '{}' and will not be added to it",
                    action,
                    format
                );
                continue;
            }

            let only = restriction.only.get_or_insert_with(Vec::new);
            if !only.iter().any(|a| a == action) {
                only.push(action.to_string());
            }
        }

        tracing::debug!("MIME table after injecting '{}': {:?}", action, self.0);
    }
}

impl FromIterator<(Format, MimeRestriction)> for MimeTable {
    fn from_iter<I: IntoIterator<Item = (Format, MimeRestriction)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
