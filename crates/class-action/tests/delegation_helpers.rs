// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for delegation, view helpers and class inheritance.

mod common;

use std::sync::Arc;

use class_action::{ActionClass, ClassActionError, Dispatcher, Format, Render, Respond, Visibility};
use common::TestController;
use serde_json::{json, Value};

type Class = Arc<ActionClass<TestController>>;

fn greeter_class() -> Class {
    ActionClass::builder("ShowAction")
        .step("load", |scope| {
            scope.set("name", "Ada");
            Ok(())
        })
        .method("greet", Visibility::Public, 1, |scope, args| {
            let name = scope.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            Ok(json!(format!("{} {}", args[0].as_str().unwrap_or_default(), name)))
        })
        .protected("secret", |_| Ok(json!("s3cret")))
        .method("internal", Visibility::Private, 0, |_, _| Ok(json!("internal")))
        .protected("page_title", |scope| {
            let name = scope.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            Ok(json!(format!("Profile of {}", name)))
        })
        .helper_method(["page_title"])
        .build()
}

fn greeter_dispatcher() -> Dispatcher<TestController> {
    common::init_tracing();
    let mut dispatcher = Dispatcher::new("UsersController");
    dispatcher.register(["show"], &greeter_class()).unwrap();
    dispatcher.delegate(["greet", "secret", "internal", "missing"]);
    dispatcher
}

#[test]
fn test_public_delegation() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");
    dispatcher.dispatch(&mut controller, "show").unwrap();

    let greeting = dispatcher
        .call_delegated(&mut controller, "greet", &[json!("Hello")])
        .unwrap();
    assert_eq!(greeting, json!("Hello Ada"));

    let err = dispatcher.call_delegated(&mut controller, "greet", &[]).unwrap_err();
    assert!(matches!(err, ClassActionError::WrongArity { expected: 1, given: 0, .. }));
}

#[test]
fn test_delegation_respects_visibility() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");

    let err = dispatcher.call_delegated(&mut controller, "secret", &[]).unwrap_err();
    assert!(matches!(err, ClassActionError::MethodNotPublic { ref method, .. } if method == "secret"));

    let secret = dispatcher
        .call_delegated_restricted(&mut controller, "secret", &[])
        .unwrap();
    assert_eq!(secret, json!("s3cret"));

    let err = dispatcher
        .call_delegated_restricted(&mut controller, "internal", &[])
        .unwrap_err();
    assert!(matches!(err, ClassActionError::MethodNotPublic { .. }));
}

#[test]
fn test_delegation_errors() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");

    let err = dispatcher.call_delegated(&mut controller, "destroy", &[]).unwrap_err();
    assert!(matches!(err, ClassActionError::UnknownMethod { ref class, .. } if class == "UsersController"));

    let err = dispatcher.call_delegated(&mut controller, "missing", &[]).unwrap_err();
    assert!(matches!(err, ClassActionError::UnknownMethod { ref class, .. } if class == "ShowAction"));

    let mut idle = TestController::new("index");
    let err = dispatcher.call_delegated(&mut idle, "greet", &[json!("Hi")]).unwrap_err();
    assert!(matches!(err, ClassActionError::NoActiveAction));
}

#[test]
fn test_view_context_exposes_helpers() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");
    dispatcher.dispatch(&mut controller, "show").unwrap();

    let view = dispatcher.view_context(&controller);
    assert!(view.responds_to("page_title"));
    assert!(!view.responds_to("secret"));
    assert_eq!(view.assign("name"), Some(&json!("Ada")));

    let title = view.call_helper(&mut controller, "page_title", &[]).unwrap();
    assert_eq!(title, json!("Profile of Ada"));

    let err = view.call_helper(&mut controller, "secret", &[]).unwrap_err();
    assert!(matches!(err, ClassActionError::UnknownMethod { .. }));
}

#[test]
fn test_view_context_without_class_action() {
    let dispatcher = greeter_dispatcher();
    let controller = TestController::new("index");

    let view = dispatcher.view_context(&controller);
    assert!(view.helpers().is_none());
    assert!(!view.responds_to("page_title"));
}

#[test]
fn test_view_context_without_active_handler() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");

    let view = dispatcher.view_context(&controller);
    assert!(view.helpers().is_none());
    assert!(!view.responds_to("page_title"));

    dispatcher.current_action(&mut controller).unwrap();
    let view = dispatcher.view_context(&controller);
    assert!(view.responds_to("page_title"));
}

#[test]
fn test_helper_called_while_action_is_executing() {
    let dispatcher = greeter_dispatcher();
    let mut controller = TestController::new("show");
    dispatcher.dispatch(&mut controller, "show").unwrap();

    let handler = dispatcher.action(&mut controller, "show").unwrap();
    let _running = handler.borrow_mut();
    controller.assigns.insert("name".to_string(), json!("Grace"));

    let view = dispatcher.view_context(&controller);
    let title = view.call_helper(&mut controller, "page_title", &[]).unwrap();
    assert_eq!(title, json!("Profile of Grace"));

    let err = dispatcher.dispatch(&mut controller, "show").unwrap_err();
    assert!(matches!(err, ClassActionError::HandlerBusy { ref action } if action == "show"));
}

fn base_class() -> Class {
    ActionClass::builder("BaseAction")
        .step("load", |scope| {
            scope.set("post", json!({ "id": 1 }));
            Ok(())
        })
        .guard("invalid", |scope| Ok(scope.params().contains_key("invalid")))
        .protected("title", |_| Ok(json!("Base")))
        .helper_method(["title"])
        .respond_with("@post")
        .respond_to(Respond::to(["html"]))
        .build()
}

#[test]
fn test_subclass_extends_parent_declarations() {
    let base = base_class();
    let child: Class = ActionClass::builder("UpdateAction")
        .extends(&base)
        .step("validate", |scope| {
            scope.set("validated", true);
            Ok(())
        })
        .protected("subtitle", |_| Ok(json!("Child")))
        .helper_method(["subtitle"])
        .respond_with_on("@errors", "invalid")
        .respond_to(Respond::to(["json"]))
        .respond_to(Respond::to(["html"]).on("invalid"))
        .build();

    assert!(child.is_a("UpdateAction"));
    assert!(child.is_a("BaseAction"));
    assert!(!base.is_a("UpdateAction"));
    assert_eq!(child.ancestors(), ["BaseAction".to_string()]);

    assert_eq!(child.action_methods().collect::<Vec<_>>(), vec!["load", "validate"]);
    assert_eq!(child.response_for(Some("invalid")), Some("@errors"));
    assert_eq!(child.response_for(None), Some("@post"));
    assert_eq!(child.declared_formats(), vec![Format::new("html"), Format::new("json")]);
    assert!(child.responds_to_format(&Format::new("html"), Some("invalid")));

    assert_eq!(base.responses().len(), 1);
    assert_eq!(base.formats().len(), 1);
    assert_eq!(base.response_for(Some("invalid")), None);

    assert!(child.helpers().responds_to("title"));
    assert!(child.helpers().responds_to("subtitle"));
    assert!(!base.helpers().responds_to("subtitle"));
}

#[test]
fn test_subclass_overlays_same_key() {
    let base = base_class();
    let child: Class = ActionClass::builder("ShowAction")
        .extends(&base)
        .protected("title", |_| Ok(json!("Child")))
        .respond_with("@title_value")
        .build();

    assert_eq!(child.responses().len(), 1);
    assert_eq!(child.response_for(None), Some("@title_value"));
    assert_eq!(base.response_for(None), Some("@post"));
    assert_eq!(child.methods().iter().filter(|m| m.name() == "title").count(), 1);

    let mut dispatcher = Dispatcher::new("PostsController");
    dispatcher.register(["show"], &child).unwrap();
    let mut controller = TestController::new("show");
    let title = dispatcher
        .action(&mut controller, "show")
        .unwrap()
        .borrow_mut()
        .call(&mut controller, "title", &[])
        .unwrap();
    assert_eq!(title, json!("Child"));
}

#[test]
fn test_inherited_availability() {
    let base: Class = ActionClass::builder("SecuredAction")
        .available(|scope| Ok(scope.params().contains_key("token")))
        .build();
    let child: Class = ActionClass::builder("ShowAction")
        .extends(&base)
        .respond_to(Respond::to(["html"]).with(|scope| scope.render(Render::text("ok"))))
        .build();

    let mut dispatcher = Dispatcher::new("PostsController");
    dispatcher.register(["show"], &child).unwrap();

    let mut anonymous = TestController::new("show");
    assert!(matches!(
        dispatcher.dispatch(&mut anonymous, "show"),
        Err(ClassActionError::ActionNotAvailable { .. })
    ));

    let mut signed_in = TestController::new("show").with_param("token", json!("abc"));
    dispatcher.dispatch(&mut signed_in, "show").unwrap();
    assert!(signed_in.body.is_some());
}
