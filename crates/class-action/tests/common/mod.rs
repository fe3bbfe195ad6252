// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Shared test controller.

#![allow(dead_code)]

use class_action::{
    ActionCache, ActionRequest, Assigns, ClassActionError, Controller, Format, FormatCollector,
    Params, Render, ResponseBody, Result,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Routes crate logs to the test output; `RUST_LOG=class_action=debug` shows them.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A controller that records what actions ask of it.
pub struct TestController {
    pub action: Option<String>,
    pub request: ActionRequest,
    pub params: Params,
    pub assigns: Assigns,
    pub body: Option<ResponseBody>,
    pub calls: Vec<String>,
    pub fail_render: bool,
    cache: ActionCache<TestController>,
}

impl TestController {
    pub fn new(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            request: ActionRequest::new("/posts/1", "GET"),
            params: Params::new(),
            assigns: Assigns::new(),
            body: None,
            calls: Vec::new(),
            fail_render: false,
            cache: ActionCache::new(),
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.request = self.request.with_format(format);
        self
    }

    pub fn with_param(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    pub fn assign(&self, name: &str) -> Option<&Value> {
        self.assigns.get(name)
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.iter().any(|call| call.starts_with(prefix))
    }

    fn negotiated_format(&self) -> Format {
        self.format().unwrap_or_else(|| Format::new("html"))
    }

    fn render_default(&mut self, object: Option<Value>) -> Result<()> {
        if self.has_response_body() {
            return Ok(());
        }
        let render = match (self.negotiated_format().as_str(), object) {
            ("json", Some(object)) => Render::json(object),
            _ => Render::template(self.action.clone().unwrap_or_default()),
        };
        self.render(render)
    }
}

impl Controller for TestController {
    fn action_name(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn view_assigns(&self) -> Assigns {
        self.assigns.clone()
    }

    fn set_assign(&mut self, name: &str, value: Value) {
        self.assigns.insert(name.to_string(), value);
    }

    fn response_body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn request(&self) -> &ActionRequest {
        &self.request
    }

    fn render(&mut self, render: Render) -> Result<()> {
        let body = match &render {
            Render::Template { name, .. } => name.clone(),
            Render::Json { body, .. } => body.to_string(),
            Render::Text { body, .. } => body.clone(),
            Render::Head { .. } => String::new(),
        };
        self.calls.push(format!("render:{}", body));
        self.assigns.insert("rendered".to_string(), Value::Bool(true));

        if self.fail_render {
            return Err(ClassActionError::Controller("render failed".to_string()));
        }

        let format = self.negotiated_format();
        self.body = Some(ResponseBody::rendered(render.status(), Some(format.as_str()), body));
        Ok(())
    }

    fn redirect_to(&mut self, location: &str) -> Result<()> {
        self.calls.push(format!("redirect:{}", location));
        self.body = Some(ResponseBody::redirect(location));
        Ok(())
    }

    fn respond_with(&mut self, object: Value, collector: Option<&mut FormatCollector<'_, Self>>) -> Result<()> {
        self.calls.push(format!("respond_with:{}", object));
        let format = self.negotiated_format();

        if let Some(collector) = collector {
            if !collector.respond(&format, self)? {
                self.body = Some(ResponseBody::Head { status: 406 });
                return Ok(());
            }
        }
        self.render_default(Some(object))
    }

    fn respond_to(&mut self, collector: &mut FormatCollector<'_, Self>) -> Result<()> {
        let formats: Vec<String> = collector.formats().iter().map(|f| f.to_string()).collect();
        self.calls.push(format!("respond_to:{}", formats.join(",")));
        let format = self.negotiated_format();

        if collector.respond(&format, self)? {
            self.render_default(None)
        } else {
            self.body = Some(ResponseBody::Head { status: 406 });
            Ok(())
        }
    }

    fn action_cache(&self) -> &ActionCache<Self> {
        &self.cache
    }

    fn action_cache_mut(&mut self) -> &mut ActionCache<Self> {
        &mut self.cache
    }
}
