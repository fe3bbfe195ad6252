// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for class actions.
//!
//! This module defines [`ClassActionError`], the single error enum used by
//! every fallible operation in the crate.
//!
//! # Error Categories
//!
//! - **Registration errors**: anonymous handler classes, handler classes that
//!   cannot be found or loaded. Raised while a controller declares its actions.
//! - **Availability errors**: the action's availability guard returned false.
//! - **Dispatch errors**: unknown actions or methods, arity and visibility
//!   mismatches, re-entrant handler access.
//! - **Forwarding errors**: failures raised by the host controller or by an
//!   action step. These propagate unchanged once working state has been
//!   synchronised.
//! - **Configuration errors**: invalid or unreadable configuration files.

use thiserror::Error;

/// The main error type for class action operations.
#[derive(Error, Debug)]
pub enum ClassActionError {
    /// A handler class without a name was registered for an action.
    #[error("Cannot register anonymous action class for action '{action}'")]
    AnonymousHandler {
        /// The action being registered.
        action: String,
    },

    /// No handler class could be found and no search path is configured.
    #[error("Action class {class_name} for action '{action}' not found")]
    HandlerNotFound {
        /// The action being registered.
        action: String,
        /// The conventional class name that was looked up.
        class_name: String,
    },

    /// The search path did not yield any file for the expected class.
    #[error("No file found for action class {class_name} (tried: {})", .candidates.join(", "))]
    NoMatchingFile {
        /// The class that was expected.
        class_name: String,
        /// Every candidate file that was offered to the loader.
        candidates: Vec<String>,
    },

    /// A file was loaded from the search path but defined a different class.
    #[error("Expected {file} to define action class {expected}, but it defined {found}")]
    WrongTypeLoaded {
        /// The class that was expected.
        expected: String,
        /// The class that was actually defined (empty when anonymous).
        found: String,
        /// The file that was loaded.
        file: String,
    },

    /// The action's availability guard returned false.
    #[error("Action '{action}' is not available")]
    ActionNotAvailable {
        /// The action that was dispatched.
        action: String,
    },

    /// The controller has no class action with the given name.
    #[error("Controller {controller} has no class action '{action}'")]
    UnknownAction {
        /// The controller type name.
        controller: String,
        /// The requested action.
        action: String,
    },

    /// The action class does not define the given method.
    #[error("Undefined method '{method}' for action class {class}")]
    UnknownMethod {
        /// The action class name.
        class: String,
        /// The requested method.
        method: String,
    },

    /// A method was called with the wrong number of arguments.
    #[error("Wrong number of arguments for {class}#{method} (given {given}, expected {expected})")]
    WrongArity {
        /// The action class name.
        class: String,
        /// The method name.
        method: String,
        /// The declared arity.
        expected: usize,
        /// The number of arguments passed.
        given: usize,
    },

    /// A restricted method was called through a public entry point.
    #[error("Method '{method}' of action class {class} is not public")]
    MethodNotPublic {
        /// The action class name.
        class: String,
        /// The method name.
        method: String,
    },

    /// No class action is active for the controller's current action name.
    #[error("No class action is active for this request")]
    NoActiveAction,

    /// The handler is currently executing and cannot be accessed re-entrantly.
    #[error("Action '{action}' is already executing")]
    HandlerBusy {
        /// The action whose handler is busy.
        action: String,
    },

    /// A forwarded controller capability failed.
    #[error("Controller error: {0}")]
    Controller(String),

    /// An action step failed.
    #[error("Error in action method '{method}': {message}")]
    Step {
        /// The method that failed.
        method: String,
        /// Error message.
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassActionError {
    /// Creates a step failure for the given method.
    pub fn step(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors raised while registering actions.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::AnonymousHandler { .. }
                | Self::HandlerNotFound { .. }
                | Self::NoMatchingFile { .. }
                | Self::WrongTypeLoaded { .. }
        )
    }
}

/// Convenience type alias for Results with [`ClassActionError`].
pub type Result<T> = std::result::Result<T, ClassActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_file_lists_candidates() {
        let err = ClassActionError::NoMatchingFile {
            class_name: "ShowAction".into(),
            candidates: vec!["app/show_action".into(), "lib/show_action".into()],
        };
        assert_eq!(
            err.to_string(),
            "No file found for action class ShowAction (tried: app/show_action, lib/show_action)"
        );
    }

    #[test]
    fn test_registration_classification() {
        assert!(ClassActionError::AnonymousHandler { action: "show".into() }.is_registration_error());
        assert!(!ClassActionError::ActionNotAvailable { action: "show".into() }.is_registration_error());
        assert!(!ClassActionError::step("load", "boom").is_registration_error());
    }
}
