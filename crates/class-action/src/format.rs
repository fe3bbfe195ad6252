// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Response formats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A response format name such as `html` or `json`.
///
/// The special format `any` is a wildcard that matches every format the
/// controller negotiates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(String);

impl Format {
    /// Name of the wildcard format.
    pub const ANY: &'static str = "any";

    /// Creates a format. Names are normalised to lowercase without a leading dot.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim_start_matches('.').to_ascii_lowercase())
    }

    /// The wildcard format.
    pub fn any() -> Self {
        Self(Self::ANY.to_string())
    }

    /// Returns true for the wildcard format.
    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }

    /// Returns the format name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&Format> for Format {
    fn from(format: &Format) -> Self {
        format.clone()
    }
}

impl AsRef<str> for Format {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
