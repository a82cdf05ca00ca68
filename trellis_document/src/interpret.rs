// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpretation of externally supplied events.
//!
//! ## Overview
//!
//! The client boundary deals in strings: an event name, a target identifier,
//! optionally a secondary identifier and a value payload. Everything is
//! checked here, before any state changes. The event name must parse into the
//! closed enumeration, the target must resolve to an event-target component,
//! and only a fixed subset of names is accepted from outside at all; the
//! model maintenance and lifecycle-stage names are internal.
//!
//! One name is composite: a value change with focus change never dispatches
//! as itself. It expands into the ordered sequence
//!
//! 1. set the addressing context and write the new value (not an event),
//! 2. recalculate, then revalidate the owning model,
//! 3. notify the value change on the control,
//! 4. focus out of the control and into the other target, when one is given,
//! 5. refresh the owning model.
//!
//! An error anywhere in the sequence aborts the remainder.
//!
//! Lifecycle requests use their own enumeration and never propagate; they
//! select an ordered sequence of stage dispatches over the model list.

use alloc::string::ToString;

use trellis_dispatch::types::HandlerTree;
use trellis_events::{Event, EventName, LifecycleEvent};

use crate::document::Document;
use crate::error::DocumentError;
use crate::host::Host;
use crate::registry::ComponentId;

impl<H: Host> Document<H> {
    /// Interpret one client-supplied event given as strings.
    ///
    /// The target identifier is mandatory and must resolve to a component
    /// that can receive events. The secondary identifier is best-effort: an
    /// identifier that does not resolve is dropped, but one that resolves to
    /// a non-event-target component is an error.
    pub fn handle_client_event(
        &mut self,
        host: &mut H,
        name: &str,
        target_id: &str,
        other_target_id: Option<&str>,
        payload: Option<&str>,
    ) -> Result<(), H::Error> {
        let Some(parsed) = EventName::from_external(name) else {
            return Err(DocumentError::UnsupportedEvent {
                name: name.to_string(),
            }
            .into());
        };

        let target = match self.registry.resolve(target_id) {
            Some(id) if self.registry.is_event_target(&id) => id,
            _ => {
                return Err(DocumentError::InvalidTarget {
                    id: target_id.to_string(),
                }
                .into());
            }
        };

        let mut event = Event::new(parsed, target);
        if let Some(other_id) = other_target_id {
            if let Some(other) = self.registry.resolve(other_id) {
                if !self.registry.is_event_target(&other) {
                    return Err(DocumentError::InvalidTarget {
                        id: other_id.to_string(),
                    }
                    .into());
                }
                event = event.with_other_target(other);
            }
        }
        if let Some(payload) = payload {
            event = event.with_payload(payload);
        }

        self.interpret_event(host, event)
    }

    /// Classify an external event: expand the composite name, forward the
    /// plain client names, reject everything else.
    pub fn interpret_event(
        &mut self,
        host: &mut H,
        event: Event<ComponentId>,
    ) -> Result<(), H::Error> {
        match event.name {
            EventName::ValueChangeWithFocusChange => self.expand_value_change(host, event),
            EventName::Activate
            | EventName::FocusIn
            | EventName::FocusOut
            | EventName::ValueChanged
            | EventName::Submit => self.dispatch(host, event),
            internal => Err(DocumentError::UnsupportedEvent {
                name: internal.as_str().to_string(),
            }
            .into()),
        }
    }

    fn expand_value_change(
        &mut self,
        host: &mut H,
        event: Event<ComponentId>,
    ) -> Result<(), H::Error> {
        let control = event.target;
        host.set_addressing_context(control);
        if let Some(value) = &event.payload {
            let node = host.current_bound_node();
            host.write_value(&node, value);
        }
        let model = host.current_model();

        tracing::debug!(
            focus_change = event.other_target.is_some(),
            "expanding value change"
        );

        self.dispatch(host, Event::new(EventName::Recalculate, model))?;
        self.dispatch(host, Event::new(EventName::Revalidate, model))?;

        let mut changed = Event::new(EventName::ValueChanged, control);
        if let Some(value) = &event.payload {
            changed = changed.with_payload(value.clone());
        }
        self.dispatch(host, changed)?;

        // The focus pair fires whenever a secondary target was supplied, even
        // one equal to the control (focus leaving and returning is still a
        // focus change to the client).
        if let Some(other) = event.other_target {
            self.dispatch(host, Event::new(EventName::FocusOut, control))?;
            self.dispatch(host, Event::new(EventName::FocusIn, other))?;
        }

        self.dispatch(host, Event::new(EventName::Refresh, model))
    }

    /// Interpret one client-supplied lifecycle request given as a string.
    pub fn handle_lifecycle_event(&mut self, host: &mut H, name: &str) -> Result<(), H::Error> {
        let Some(request) = LifecycleEvent::from_external(name) else {
            return Err(DocumentError::UnsupportedEvent {
                name: name.to_string(),
            }
            .into());
        };
        self.run_lifecycle(host, request)
    }

    /// Run one lifecycle sequence.
    ///
    /// Full initialization sends each stage to every model in model order,
    /// completing a stage across all models before the next stage starts.
    /// Controls are initialized after construction and before the
    /// construct-done stage reaches any model, so construct-done handlers
    /// observe an existing control tree. State restoration replays saved
    /// state per model and then initializes controls. Controls initialization
    /// itself is a guarded no-op after the first run.
    pub fn run_lifecycle(
        &mut self,
        host: &mut H,
        request: LifecycleEvent,
    ) -> Result<(), H::Error> {
        tracing::info!(request = %request, models = self.registry.model_count(), "lifecycle");
        match request {
            LifecycleEvent::Initialize => {
                for stage in [
                    EventName::ModelConstruct,
                    EventName::ModelConstructDone,
                    EventName::Ready,
                ] {
                    if stage == EventName::ModelConstructDone {
                        self.initialize_controls_once(host)?;
                    }
                    for i in 0..self.registry.model_count() {
                        let model = self.registry.model_at(i);
                        self.dispatch(host, Event::new(stage, model))?;
                    }
                }
                Ok(())
            }
            LifecycleEvent::InitializeState => {
                for i in 0..self.registry.model_count() {
                    let model = self.registry.model_at(i);
                    self.dispatch(host, Event::new(EventName::RestoreState, model))?;
                }
                self.initialize_controls_once(host)
            }
            LifecycleEvent::InitializeControls => self.initialize_controls_once(host),
        }
    }

    fn initialize_controls_once(&mut self, host: &mut H) -> Result<(), H::Error> {
        if self.controls_initialized {
            return Ok(());
        }
        // Latched before the callback so a re-entrant request is a no-op.
        self.controls_initialized = true;
        host.initialize_controls(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentSpec;
    use crate::testing::{TestHost, Trace};
    use alloc::vec;
    use alloc::vec::Vec;
    use trellis_dispatch::types::Handler;

    struct Fixture {
        doc: Document<TestHost>,
        host: TestHost,
        input: ComponentId,
        next: ComponentId,
    }

    fn fixture() -> Fixture {
        let mut b = Document::<TestHost>::builder();
        let model = b.model(Some("m")).unwrap();
        let input = b.control(ComponentSpec::leaf(Some("input-1"))).unwrap();
        let next = b.control(ComponentSpec::leaf(Some("input-2"))).unwrap();
        let mut host = TestHost::new();
        host.model = model;
        Fixture {
            doc: b.finish(),
            host,
            input,
            next,
        }
    }

    fn defaults(host: &TestHost) -> Vec<(ComponentId, EventName)> {
        host.trace
            .iter()
            .filter_map(|t| match t {
                Trace::Default { target, event } => Some((*target, *event)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn unknown_event_name_is_unsupported() {
        let mut f = fixture();
        let err = f
            .doc
            .handle_client_event(&mut f.host, "xforms-insert", "input-1", None, None)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::UnsupportedEvent {
                name: "xforms-insert".into()
            }
        );
    }

    #[test]
    fn internal_names_are_rejected_from_the_client() {
        let mut f = fixture();
        for name in [
            "xforms-recalculate",
            "xforms-refresh",
            "xforms-model-construct",
            "xforms-ready",
            "xxforms-restore-state",
        ] {
            let err = f
                .doc
                .handle_client_event(&mut f.host, name, "input-1", None, None)
                .unwrap_err();
            assert_eq!(
                err,
                DocumentError::UnsupportedEvent { name: name.into() },
                "{name} should not be accepted externally"
            );
        }
        assert!(f.host.trace.is_empty());
    }

    #[test]
    fn unresolved_target_is_invalid() {
        let mut f = fixture();
        let err = f
            .doc
            .handle_client_event(&mut f.host, "DOMActivate", "no-such-id", None, None)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidTarget {
                id: "no-such-id".into()
            }
        );
    }

    #[test]
    fn non_event_target_component_is_invalid() {
        let mut b = Document::<TestHost>::builder();
        let _ = b.model(Some("m")).unwrap();
        b.control(ComponentSpec::leaf(Some("output-1")).without_event_target())
            .unwrap();
        let mut doc: Document<TestHost> = b.finish();
        let mut host = TestHost::new();
        let err = doc
            .handle_client_event(&mut host, "DOMActivate", "output-1", None, None)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidTarget {
                id: "output-1".into()
            }
        );
    }

    #[test]
    fn empty_target_identifier_reaches_the_default_model() {
        let mut f = fixture();
        let model = f.host.model;
        f.doc
            .handle_client_event(&mut f.host, "DOMFocusIn", "", None, None)
            .unwrap();
        assert_eq!(defaults(&f.host), vec![(model, EventName::FocusIn)]);
    }

    #[test]
    fn value_change_with_focus_change_expands_in_order() {
        let mut f = fixture();
        let model = f.host.model;
        f.doc
            .handle_client_event(
                &mut f.host,
                "xxforms-value-change-with-focus-change",
                "input-1",
                Some("input-2"),
                Some("42"),
            )
            .unwrap();
        assert_eq!(
            f.host.trace,
            vec![
                Trace::Context(f.input),
                Trace::Write("42".into()),
                Trace::Default {
                    target: model,
                    event: EventName::Recalculate,
                },
                Trace::Default {
                    target: model,
                    event: EventName::Revalidate,
                },
                Trace::Default {
                    target: f.input,
                    event: EventName::ValueChanged,
                },
                Trace::Default {
                    target: f.input,
                    event: EventName::FocusOut,
                },
                Trace::Default {
                    target: f.next,
                    event: EventName::FocusIn,
                },
                Trace::Default {
                    target: model,
                    event: EventName::Refresh,
                },
            ]
        );
    }

    #[test]
    fn value_change_without_focus_change_skips_focus_events() {
        let mut f = fixture();
        let model = f.host.model;
        // No secondary target at all: focus is assumed unchanged.
        f.doc
            .handle_client_event(
                &mut f.host,
                "xxforms-value-change-with-focus-change",
                "input-1",
                None,
                Some("7"),
            )
            .unwrap();
        assert_eq!(
            defaults(&f.host),
            vec![
                (model, EventName::Recalculate),
                (model, EventName::Revalidate),
                (f.input, EventName::ValueChanged),
                (model, EventName::Refresh),
            ]
        );
    }

    #[test]
    fn secondary_target_equal_to_the_control_still_moves_focus() {
        let mut f = fixture();
        let model = f.host.model;
        // Focus left the control and came back to it: the pair still fires,
        // targeting the control on both sides.
        f.doc
            .handle_client_event(
                &mut f.host,
                "xxforms-value-change-with-focus-change",
                "input-1",
                Some("input-1"),
                Some("7"),
            )
            .unwrap();
        assert_eq!(
            defaults(&f.host),
            vec![
                (model, EventName::Recalculate),
                (model, EventName::Revalidate),
                (f.input, EventName::ValueChanged),
                (f.input, EventName::FocusOut),
                (f.input, EventName::FocusIn),
                (model, EventName::Refresh),
            ]
        );
    }

    #[test]
    fn expansion_error_aborts_the_remaining_steps() {
        let mut b = Document::<TestHost>::builder();
        let model = b.model(Some("m")).unwrap();
        b.set_handlers(model, vec![Handler::bubble(EventName::Recalculate, "boom")]);
        let input = b.control(ComponentSpec::leaf(Some("input-1"))).unwrap();
        b.control(ComponentSpec::leaf(Some("input-2"))).unwrap();
        let mut doc: Document<TestHost> = b.finish();
        let mut host = TestHost::new();
        host.model = model;
        host.fail_on = Some("boom");

        let err = doc
            .handle_client_event(
                &mut host,
                "xxforms-value-change-with-focus-change",
                "input-1",
                Some("input-2"),
                Some("42"),
            )
            .unwrap_err();
        assert_eq!(err, TestHost::failure());
        // The value write and the failing recalculate handler happened;
        // nothing after the failure was dispatched.
        assert_eq!(
            host.trace,
            vec![
                Trace::Context(input),
                Trace::Write("42".into()),
                Trace::Handler {
                    container: model,
                    action: "boom",
                    event: EventName::Recalculate,
                },
            ]
        );
    }

    #[test]
    fn unresolved_secondary_identifier_is_dropped() {
        let mut f = fixture();
        f.doc
            .handle_client_event(
                &mut f.host,
                "xxforms-value-change-with-focus-change",
                "input-1",
                Some("gone"),
                Some("7"),
            )
            .unwrap();
        // Same shape as no secondary target at all.
        assert!(
            !f.host
                .trace
                .iter()
                .any(|t| matches!(
                    t,
                    Trace::Default {
                        event: EventName::FocusOut | EventName::FocusIn,
                        ..
                    }
                ))
        );
    }

    #[test]
    fn initialize_orders_stages_across_models() {
        let mut b = Document::<TestHost>::builder();
        let m1 = b.model(Some("m1")).unwrap();
        let m2 = b.model(Some("m2")).unwrap();
        let mut doc: Document<TestHost> = b.finish();
        let mut host = TestHost::new();
        host.model = m1;

        doc.run_lifecycle(&mut host, LifecycleEvent::Initialize)
            .unwrap();
        assert_eq!(
            host.trace,
            vec![
                Trace::Default {
                    target: m1,
                    event: EventName::ModelConstruct,
                },
                Trace::Default {
                    target: m2,
                    event: EventName::ModelConstruct,
                },
                // Controls exist before any model hears construct-done.
                Trace::ControlsInit,
                Trace::Default {
                    target: m1,
                    event: EventName::ModelConstructDone,
                },
                Trace::Default {
                    target: m2,
                    event: EventName::ModelConstructDone,
                },
                Trace::Default {
                    target: m1,
                    event: EventName::Ready,
                },
                Trace::Default {
                    target: m2,
                    event: EventName::Ready,
                },
            ]
        );
    }

    #[test]
    fn initialize_state_restores_then_initializes_controls() {
        let mut b = Document::<TestHost>::builder();
        let m1 = b.model(Some("m1")).unwrap();
        let m2 = b.model(Some("m2")).unwrap();
        let mut doc: Document<TestHost> = b.finish();
        let mut host = TestHost::new();
        host.model = m1;

        doc.run_lifecycle(&mut host, LifecycleEvent::InitializeState)
            .unwrap();
        assert_eq!(
            host.trace,
            vec![
                Trace::Default {
                    target: m1,
                    event: EventName::RestoreState,
                },
                Trace::Default {
                    target: m2,
                    event: EventName::RestoreState,
                },
                Trace::ControlsInit,
            ]
        );
    }

    #[test]
    fn controls_initialization_is_a_guarded_no_op_afterwards() {
        let mut f = fixture();
        f.doc
            .handle_lifecycle_event(&mut f.host, "xxforms-initialize-controls")
            .unwrap();
        f.doc
            .handle_lifecycle_event(&mut f.host, "xxforms-initialize-controls")
            .unwrap();
        assert_eq!(f.host.trace, vec![Trace::ControlsInit]);
    }

    #[test]
    fn unknown_lifecycle_name_is_unsupported() {
        let mut f = fixture();
        let err = f
            .doc
            .handle_lifecycle_event(&mut f.host, "xxforms-initialize-everything")
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::UnsupportedEvent {
                name: "xxforms-initialize-everything".into()
            }
        );
    }
}
