// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test host: records every callback in order and can be told to fail
//! or to re-enter the document from inside a handler.

use alloc::string::String;
use alloc::vec::Vec;

use trellis_dispatch::types::Handler;
use trellis_events::{Event, EventName};

use crate::document::Document;
use crate::error::DocumentError;
use crate::host::{ActionInterpreter, Host};
use crate::registry::ComponentId;

/// One recorded host callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Trace {
    Handler {
        container: ComponentId,
        action: &'static str,
        event: EventName,
    },
    Default {
        target: ComponentId,
        event: EventName,
    },
    ControlsInit,
    Context(ComponentId),
    Write(String),
    Action {
        target: String,
        instance: usize,
    },
}

pub(crate) struct TestHost {
    pub(crate) trace: Vec<Trace>,
    /// Returned by `current_model`.
    pub(crate) model: ComponentId,
    pub(crate) interpreters_built: usize,
    /// When a handler with this action runs, dispatch the event from inside
    /// the handler. Consumed on first use.
    pub(crate) reenter_on: Option<(&'static str, Event<ComponentId>)>,
    /// When a handler with this action runs, fail.
    pub(crate) fail_on: Option<&'static str>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self {
            trace: Vec::new(),
            model: ComponentId::ROOT,
            interpreters_built: 0,
            reenter_on: None,
            fail_on: None,
        }
    }

    /// The error injected by `fail_on`.
    pub(crate) fn failure() -> DocumentError {
        DocumentError::UnsupportedEvent {
            name: String::from("boom"),
        }
    }
}

impl Host for TestHost {
    type ActionSpec = &'static str;
    type Node = ();
    type Submission = &'static str;
    type Actions = TestInterpreter;
    type Error = DocumentError;

    fn run_handler(
        &mut self,
        doc: &mut Document<Self>,
        container: ComponentId,
        handler: &Handler<&'static str>,
        event: &Event<ComponentId>,
    ) -> Result<(), DocumentError> {
        self.trace.push(Trace::Handler {
            container,
            action: handler.action,
            event: event.name,
        });
        if self.fail_on == Some(handler.action) {
            return Err(Self::failure());
        }
        if let Some((trigger, nested)) = self.reenter_on.take() {
            if handler.action == trigger {
                doc.dispatch(self, nested)?;
            } else {
                self.reenter_on = Some((trigger, nested));
            }
        }
        Ok(())
    }

    fn default_action(
        &mut self,
        _doc: &mut Document<Self>,
        event: &Event<ComponentId>,
    ) -> Result<(), DocumentError> {
        self.trace.push(Trace::Default {
            target: event.target,
            event: event.name,
        });
        Ok(())
    }

    fn initialize_controls(&mut self, _doc: &mut Document<Self>) -> Result<(), DocumentError> {
        self.trace.push(Trace::ControlsInit);
        Ok(())
    }

    fn set_addressing_context(&mut self, control: ComponentId) {
        self.trace.push(Trace::Context(control));
    }

    fn current_bound_node(&self) {}

    fn current_model(&self) -> ComponentId {
        self.model
    }

    fn write_value(&mut self, _node: &(), value: &str) {
        self.trace.push(Trace::Write(String::from(value)));
    }

    fn make_interpreter(&mut self) -> TestInterpreter {
        self.interpreters_built += 1;
        TestInterpreter {
            instance: self.interpreters_built,
        }
    }
}

/// Interpreter that logs which instance ran. The action `"nested"` runs a
/// second action from inside the first, exercising the take/restore
/// discipline of the interpreter slot.
pub(crate) struct TestInterpreter {
    instance: usize,
}

impl ActionInterpreter<TestHost> for TestInterpreter {
    fn run(
        &mut self,
        doc: &mut Document<TestHost>,
        host: &mut TestHost,
        target_id: &str,
        container: ComponentId,
        action: &&'static str,
        event: Option<&Event<ComponentId>>,
    ) -> Result<(), DocumentError> {
        if *action == "nested" {
            doc.run_action(host, "inner", container, &"plain", event)?;
        }
        host.trace.push(Trace::Action {
            target: String::from(target_id),
            instance: self.instance,
        });
        Ok(())
    }
}
