// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Working-state mirroring between an action and its controller.
//!
//! An action keeps a private copy of the controller's template-visible
//! variables ("assigns"). The two functions in this module are the only way
//! state moves between the two sides, and both consult the same fixed list of
//! protected names.

use crate::controller::Controller;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Template-visible variables, keyed by name.
pub type Assigns = BTreeMap<String, JsonValue>;

/// Names that are never mirrored between an action and its controller.
pub const PROTECTED_ASSIGNS: &[&str] = &[
    "_class_action",
    "_controller",
    "_responders",
    "_default_responder",
];

/// Returns true if the name is excluded from mirroring.
pub fn is_protected(name: &str) -> bool {
    PROTECTED_ASSIGNS.contains(&name)
}

/// Returns true unless the value is `null` or `false`.
pub fn is_truthy(value: &JsonValue) -> bool {
    !matches!(value, JsonValue::Null | JsonValue::Bool(false))
}

/// Copies every unprotected entry of `assigns` onto the controller.
pub fn copy_to_controller<C: Controller>(assigns: &Assigns, controller: &mut C) {
    for (name, value) in assigns.iter().filter(|(name, _)| !is_protected(name)) {
        controller.set_assign(name, value.clone());
    }
}

/// Overwrites `assigns` with every unprotected entry of the controller's view assigns.
pub fn copy_from_controller<C: Controller>(controller: &C, assigns: &mut Assigns) {
    for (name, value) in controller.view_assigns() {
        if !is_protected(&name) {
            assigns.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_names() {
        assert!(is_protected("_class_action"));
        assert!(is_protected("_responders"));
        assert!(!is_protected("post"));
        assert!(!is_protected("_post"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&JsonValue::Null));
        assert!(!is_truthy(&JsonValue::Bool(false)));
        assert!(is_truthy(&JsonValue::Bool(true)));
        assert!(is_truthy(&serde_json::json!(0)));
        assert!(is_truthy(&serde_json::json!("")));
        assert!(is_truthy(&serde_json::json!([])));
    }
}
