// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Tests for the controller and action assertions.

mod common;

use std::cell::Cell;
use std::sync::Arc;

use class_action::matchers::{have_class_action, respond_to_format, respond_with};
use class_action::{ActionClass, ActionHandler, Dispatcher, Respond};
use common::TestController;
use serde_json::json;

type Class = Arc<ActionClass<TestController>>;

fn handler_for(class: &Class, controller: &TestController) -> ActionHandler<TestController> {
    ActionHandler::new("show", Arc::clone(class), controller)
}

#[test]
fn test_have_class_action() {
    let index: Class = ActionClass::builder("Index").build();
    let index2: Class = ActionClass::builder("Index2").build();

    let mut dispatcher = Dispatcher::new("ClassActionTestController");
    assert_eq!(
        have_class_action("index").matches(&dispatcher),
        Err("expected controller of class ClassActionTestController to have class action :index".to_string())
    );

    dispatcher.register(["index"], &index).unwrap();
    dispatcher.register(["index2"], &index2).unwrap();

    assert_eq!(have_class_action("index").matches(&dispatcher), Ok(()));
    assert_eq!(have_class_action("index").using_class("Index").matches(&dispatcher), Ok(()));
    assert_eq!(
        have_class_action("index2").using_class("Index").matches(&dispatcher),
        Err("expected action ClassActionTestController#index2 to use class Index, but it used Index2".to_string())
    );
    assert_eq!(
        have_class_action("index").does_not_match(&dispatcher),
        Err("expected ClassActionTestController#index not to be a class action".to_string())
    );
    assert_eq!(have_class_action("destroy").does_not_match(&dispatcher), Ok(()));
}

#[test]
fn test_respond_to_format() {
    let controller = TestController::new("show");
    let plain: Class = ActionClass::builder("RespondToTestClassAction1").build();
    let guarded: Class = ActionClass::builder("RespondToTestClassAction3")
        .respond_to(Respond::to(["html"]).on("ok"))
        .build();

    assert_eq!(
        respond_to_format("html").matches(&handler_for(&plain, &controller)),
        Err("expected action of class RespondToTestClassAction1 to respond to format :html".to_string())
    );
    assert_eq!(
        respond_to_format("html").on("invalid").matches(&handler_for(&guarded, &controller)),
        Err("expected action of class RespondToTestClassAction3 to respond to format :html on :invalid".to_string())
    );
    assert_eq!(respond_to_format("html").on("ok").matches(&handler_for(&guarded, &controller)), Ok(()));
    assert_eq!(
        respond_to_format("html").on("ok").does_not_match(&handler_for(&guarded, &controller)),
        Err("expected action of class RespondToTestClassAction3 not to respond to format :html on :ok".to_string())
    );
}

#[test]
fn test_respond_to_format_runs_block_first() {
    let class: Class = ActionClass::builder("RespondToTestClassAction2")
        .respond_to(Respond::to(["json"]))
        .respond_to(Respond::to(["html"]).with(|scope| {
            scope.set("responded_to_html", true);
            Ok(())
        }))
        .build();

    let mut controller = TestController::new("show");
    let mut handler = handler_for(&class, &controller);

    let called = Cell::new(false);
    respond_to_format("json")
        .matches_then(&mut handler, &mut controller, |_| called.set(true))
        .unwrap();
    assert!(called.get());

    let mut seen = None;
    respond_to_format("html")
        .matches_then(&mut handler, &mut controller, |controller| {
            seen = controller.assign("responded_to_html").cloned();
        })
        .unwrap();
    assert_eq!(seen, Some(json!(true)));
}

#[test]
fn test_respond_with() {
    let none: Class = ActionClass::builder("RespondWithTestClassAction1").build();
    let plain: Class = ActionClass::builder("RespondWithTestClassAction2")
        .respond_with("result")
        .build();
    let guarded: Class = ActionClass::builder("RespondWithTestClassAction3")
        .respond_with_on("result", "ok")
        .build();

    assert_eq!(
        respond_with("object").matches(&none),
        Err("expected action of class RespondWithTestClassAction1 to respond with :object, but it has no response method".to_string())
    );
    assert_eq!(
        respond_with("object").matches(&plain),
        Err("expected action of class RespondWithTestClassAction2 to respond with :object, but it responds with :result".to_string())
    );
    assert_eq!(respond_with("result").matches(&plain), Ok(()));
    assert_eq!(
        respond_with("object").matches(&guarded),
        Err("expected action of class RespondWithTestClassAction3 to respond with :object, but it has no response method".to_string())
    );

    assert_eq!(
        respond_with("object").on("ok").matches(&guarded),
        Err("expected action of class RespondWithTestClassAction3 to respond with :object on :ok, but it responds with :result".to_string())
    );
    assert_eq!(
        respond_with("object").on("ok").matches(&none),
        Err("expected action of class RespondWithTestClassAction1 to respond with :object on :ok, but it has no response method".to_string())
    );
    assert_eq!(respond_with("result").on("ok").matches(&guarded), Ok(()));
    assert_eq!(
        respond_with("result").on("ok").does_not_match(&guarded),
        Err("expected action of class RespondWithTestClassAction3 not to respond with :result on :ok".to_string())
    );
}
