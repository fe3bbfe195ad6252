// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Dispatcher configuration.
//!
//! Configuration can be built in code or loaded from TOML.
//!
//! # Example Configuration
//!
//! ```toml
//! inject_mime_types = true
//! class_suffix = "Action"
//! search_path = ["app/actions", "lib/actions"]
//! ```

use crate::error::{ClassActionError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings shared by every action a dispatcher registers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatcherConfig {
    /// Restrict the controller's format table to the formats each action
    /// declares (default: true).
    #[serde(default = "default_inject_mime_types")]
    pub inject_mime_types: bool,

    /// Suffix appended to the camelized action name to form the
    /// conventional class name (default: "Action").
    #[serde(default = "default_class_suffix")]
    pub class_suffix: String,

    /// Directories searched, in order, when a class is not defined yet.
    #[serde(default)]
    pub search_path: Vec<String>,
}

fn default_inject_mime_types() -> bool {
    true
}

fn default_class_suffix() -> String {
    "Action".to_string()
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            inject_mime_types: default_inject_mime_types(),
            class_suffix: default_class_suffix(),
            search_path: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ClassActionError::Config(e.to_string()))
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ClassActionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Adds a directory to the search path.
    pub fn with_search_dir(mut self, dir: impl Into<String>) -> Self {
        self.search_path.push(dir.into());
        self
    }

    /// Enables or disables format table injection.
    pub fn with_mime_injection(mut self, enabled: bool) -> Self {
        self.inject_mime_types = enabled;
        self
    }

    /// The conventional class name for an action (`new_post` → `NewPostAction`).
    pub fn class_name_for(&self, action: &str) -> String {
        format!("{}{}", crate::loader::camelize(action), self.class_suffix)
    }

    /// Candidate files for a class, one per search directory, in order.
    pub fn candidate_files(&self, class_name: &str) -> Vec<String> {
        let stem = crate::loader::underscore(class_name);
        self.search_path
            .iter()
            .map(|dir| {
                let dir = dir.trim_end_matches('/');
                if dir.is_empty() {
                    stem.clone()
                } else {
                    format!("{}/{}", dir, stem)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::default();
        assert!(config.inject_mime_types);
        assert_eq!(config.class_suffix, "Action");
        assert!(config.search_path.is_empty());
        assert_eq!(DispatcherConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_from_toml_str() {
        let config = DispatcherConfig::from_toml_str(
            r#"
            inject_mime_types = false
            class_suffix = "Handler"
            search_path = ["app/actions/", "lib"]
            "#,
        )
        .unwrap();

        assert!(!config.inject_mime_types);
        assert_eq!(config.class_name_for("new_post"), "NewPostHandler");
        assert_eq!(
            config.candidate_files("NewPostHandler"),
            vec!["app/actions/new_post_handler", "lib/new_post_handler"]
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = DispatcherConfig::from_toml_str("inject_mime_types = \"yes\"").unwrap_err();
        assert!(matches!(err, ClassActionError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_path = [\"actions\"]").unwrap();

        let config = DispatcherConfig::load(file.path()).unwrap();
        assert_eq!(config.search_path, vec!["actions"]);
        assert_eq!(config.class_suffix, "Action");
    }

    #[test]
    fn test_load_invalid_file_names_path_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inject_mime_types = \"yes\"").unwrap();

        let err = DispatcherConfig::load(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ClassActionError::Config(_)));
        assert!(message.starts_with(&format!("Configuration error: {}: ", file.path().display())));
        assert_eq!(message.matches("Configuration error").count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DispatcherConfig::load(dir.path().join("class_action.toml")).unwrap();
        assert_eq!(config, DispatcherConfig::default());
    }
}
