// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end form session: lifecycle, value change, activation, submission.
//!
//! This example shows how to combine:
//! - `trellis_document` for the containing document, registry, and
//!   interpretation of client events,
//! - a small [`Host`] holding instance values and an action interpreter,
//! - the submission guard rejecting a second submission in one cycle.
//!
//! Run:
//! - `cargo run -p trellis_demos --example form_walkthrough`

use std::collections::HashMap;

use trellis_document::{
    ActionInterpreter, ComponentId, ComponentSpec, Document, DocumentError, Handler, Host,
};
use trellis_events::{Event, EventName, LifecycleEvent};

/// Handler action payloads this host understands.
#[derive(Clone, Copy, Debug)]
enum Action {
    /// Print a message when the handler runs.
    Announce(&'static str),
    /// Start the submission registered under the action's target identifier.
    Submit,
}

/// An in-flight submission.
#[derive(Debug)]
struct Submission {
    source: ComponentId,
}

/// Host state: per-control instance values plus the addressing context.
struct FormHost {
    values: HashMap<ComponentId, String>,
    model: ComponentId,
    addressed: Option<ComponentId>,
}

impl Host for FormHost {
    type ActionSpec = Action;
    type Node = ComponentId;
    type Submission = Submission;
    type Actions = Runner;
    type Error = DocumentError;

    fn run_handler(
        &mut self,
        doc: &mut Document<Self>,
        container: ComponentId,
        handler: &Handler<Action>,
        event: &Event<ComponentId>,
    ) -> Result<(), DocumentError> {
        match handler.action {
            Action::Announce(msg) => {
                println!("handler on {container:?} for {}: {msg}", event.name);
                Ok(())
            }
            Action::Submit => {
                doc.run_action(self, "order-submission", container, &handler.action, Some(event))
            }
        }
    }

    fn default_action(
        &mut self,
        doc: &mut Document<Self>,
        event: &Event<ComponentId>,
    ) -> Result<(), DocumentError> {
        match event.name {
            EventName::Submit => {
                doc.set_active_submission(Submission {
                    source: event.target,
                })?;
                println!("submission started from {:?}", event.target);
                Ok(())
            }
            name => {
                println!("default action: {name} on {:?}", event.target);
                Ok(())
            }
        }
    }

    fn initialize_controls(&mut self, _doc: &mut Document<Self>) -> Result<(), DocumentError> {
        println!("control tree initialized");
        Ok(())
    }

    fn set_addressing_context(&mut self, control: ComponentId) {
        self.addressed = Some(control);
    }

    fn current_bound_node(&self) -> ComponentId {
        self.addressed.unwrap_or(ComponentId::ROOT)
    }

    fn current_model(&self) -> ComponentId {
        self.model
    }

    fn write_value(&mut self, node: &ComponentId, value: &str) {
        self.values.insert(*node, value.to_string());
    }

    fn make_interpreter(&mut self) -> Runner {
        Runner
    }
}

/// Interpreter for [`Action`] payloads.
struct Runner;

impl ActionInterpreter<FormHost> for Runner {
    fn run(
        &mut self,
        doc: &mut Document<FormHost>,
        host: &mut FormHost,
        target_id: &str,
        _container: ComponentId,
        action: &Action,
        _event: Option<&Event<ComponentId>>,
    ) -> Result<(), DocumentError> {
        match action {
            Action::Announce(msg) => {
                println!("action: {msg}");
                Ok(())
            }
            Action::Submit => {
                let Some(target) = doc.object_by_id(target_id) else {
                    return Err(DocumentError::InvalidTarget {
                        id: target_id.to_string(),
                    });
                };
                doc.dispatch(host, Event::new(EventName::Submit, target))
            }
        }
    }
}

fn main() -> Result<(), DocumentError> {
    // Wire one model, its submission, and a small control tree.
    let mut b = Document::<FormHost>::builder();
    let model = b.model(Some("order-model"))?;
    b.child(model, ComponentSpec::leaf(Some("order-submission")))?;
    let form = b.control(ComponentSpec::container(Some("order-form")).with_handlers(vec![
        Handler::bubble(EventName::ValueChanged, Action::Announce("value stored")),
        Handler::bubble(EventName::Activate, Action::Submit),
    ]))?;
    let quantity = b.child(form, ComponentSpec::leaf(Some("quantity")))?;
    b.child(form, ComponentSpec::leaf(Some("submit-button")))?;
    let mut doc = b.finish();

    let mut host = FormHost {
        values: HashMap::new(),
        model,
        addressed: None,
    };

    // Bring the document up: construct, initialize controls, ready.
    doc.run_lifecycle(&mut host, LifecycleEvent::Initialize)?;

    // The client edits the quantity field and moves focus to the button.
    doc.handle_client_event(
        &mut host,
        "xxforms-value-change-with-focus-change",
        "quantity",
        Some("submit-button"),
        Some("3"),
    )?;
    println!("quantity = {:?}", host.values.get(&quantity));

    // Activating the button runs the submit action, which starts the
    // submission.
    doc.handle_client_event(&mut host, "DOMActivate", "submit-button", None, None)?;
    println!(
        "active submission: {:?}",
        doc.active_submission().map(|s| s.source)
    );

    // A second activation in the same cycle is rejected and the first
    // submission is kept.
    let err = doc
        .handle_client_event(&mut host, "DOMActivate", "submit-button", None, None)
        .unwrap_err();
    println!("second submission rejected: {err}");

    Ok(())
}
