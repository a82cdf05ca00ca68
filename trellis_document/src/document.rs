// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The containing document: dispatch entry point, submission guard, and the
//! action-runner binding.

use trellis_dispatch::types::DispatchError;
use trellis_dispatch::{dispatcher, plan};
use trellis_events::Event;

use alloc::string::ToString;

use crate::error::DocumentError;
use crate::host::{ActionInterpreter, Host};
use crate::registry::{ComponentId, DocumentBuilder, Registry};

/// The containing document.
///
/// Owns the component registry, the at-most-one active submission, the
/// lazily constructed action interpreter, and the controls-initialized latch.
/// Everything observable happens through [`Document::dispatch`] and the
/// interpretation entry points; the document itself holds no instance data.
pub struct Document<H: Host> {
    pub(crate) registry: Registry<H::ActionSpec>,
    active_submission: Option<H::Submission>,
    actions: Option<H::Actions>,
    pub(crate) controls_initialized: bool,
}

impl<H: Host> core::fmt::Debug for Document<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("registry", &self.registry)
            .field("active_submission", &self.active_submission.is_some())
            .field("controls_initialized", &self.controls_initialized)
            .finish_non_exhaustive()
    }
}

impl<A> DocumentBuilder<A> {
    /// Consume the wiring and produce the containing document.
    pub fn finish<H>(self) -> Document<H>
    where
        H: Host<ActionSpec = A>,
    {
        Document {
            registry: self.registry,
            active_submission: None,
            actions: None,
            controls_initialized: false,
        }
    }
}

impl<H: Host> Document<H> {
    /// Start wiring a new document.
    pub fn builder() -> DocumentBuilder<H::ActionSpec> {
        DocumentBuilder::new()
    }

    /// Construction hook. Deliberately empty: all initialization work is
    /// driven by the lifecycle requests, so a freshly built document has done
    /// nothing yet and restored documents never pay for work they replay.
    pub fn initialize(&mut self) {}

    /// The component registry.
    pub fn registry(&self) -> &Registry<H::ActionSpec> {
        &self.registry
    }

    /// Resolve an identifier through the document's scopes.
    pub fn object_by_id(&self, ident: &str) -> Option<ComponentId> {
        self.registry.resolve(ident)
    }

    /// Dispatch one event through capture and bubble, then run the target's
    /// default action when the accumulated flags permit it.
    ///
    /// Handlers run through [`Host::run_handler`] and may re-enter the
    /// document synchronously. The default action runs iff the accumulated
    /// perform-default flag survived or the event is not cancelable; a
    /// default action on the document root fails with
    /// [`DocumentError::NotAddressable`].
    pub fn dispatch(&mut self, host: &mut H, event: Event<ComponentId>) -> Result<(), H::Error> {
        let plan = plan::build(&self.registry, &event).map_err(|e| match e {
            DispatchError::InvalidTarget => {
                let id = self
                    .registry
                    .ident_of(event.target)
                    .ok()
                    .flatten()
                    .unwrap_or_default()
                    .to_string();
                H::Error::from(DocumentError::InvalidTarget { id })
            }
        })?;

        tracing::debug!(event = %event.name, "dispatching");
        let outcome = dispatcher::run(&plan, &event, |container, handler| {
            host.run_handler(self, *container, handler, &event)
        })?;

        if outcome.perform_default || !event.cancelable() {
            if event.target == ComponentId::ROOT {
                return Err(DocumentError::NotAddressable.into());
            }
            host.default_action(self, &event)?;
        }
        Ok(())
    }

    /// Record the submission that just started.
    ///
    /// At most one submission may be active per request cycle; a second
    /// attempt fails with [`DocumentError::DuplicateSubmission`] and the
    /// first submission is retained untouched.
    pub fn set_active_submission(
        &mut self,
        submission: H::Submission,
    ) -> Result<(), DocumentError> {
        if self.active_submission.is_some() {
            return Err(DocumentError::DuplicateSubmission);
        }
        self.active_submission = Some(submission);
        Ok(())
    }

    /// The active submission, if one was recorded this cycle.
    pub fn active_submission(&self) -> Option<&H::Submission> {
        self.active_submission.as_ref()
    }

    /// Run one handler action through the document's action interpreter.
    ///
    /// The interpreter is constructed on first use and reused afterwards. It
    /// is moved out of its slot while it runs, so a nested `run_action` from
    /// within an action constructs a fresh interpreter; the slot is restored
    /// unconditionally on the way out, which leaves the outermost (first
    /// constructed) instance in place for the next action.
    pub fn run_action(
        &mut self,
        host: &mut H,
        target_id: &str,
        container: ComponentId,
        action: &H::ActionSpec,
        event: Option<&Event<ComponentId>>,
    ) -> Result<(), H::Error> {
        let mut interpreter = match self.actions.take() {
            Some(interpreter) => interpreter,
            None => host.make_interpreter(),
        };
        let result = interpreter.run(self, host, target_id, container, action, event);
        self.actions = Some(interpreter);
        result
    }
}
