// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: everything the document delegates to its embedder.
//!
//! The containing document owns routing, interpretation, and lifecycle
//! ordering, but it does not evaluate handler actions, hold instance data, or
//! render controls. All of that lives behind [`Host`]. The document passes
//! itself back into every host callback, so a handler is free to dispatch
//! further events or run further actions synchronously while the outer
//! dispatch is still on the stack.

use trellis_dispatch::types::Handler;
use trellis_events::Event;

use crate::document::Document;
use crate::error::DocumentError;
use crate::registry::ComponentId;

/// Embedder-side behavior the containing document calls back into.
///
/// The associated types keep the document independent of the host's action
/// language, instance data representation, and submission machinery:
///
/// - `ActionSpec` is the opaque payload carried by handler registrations
///   ([`Handler`]); `Clone` because dispatch plans own their handlers.
/// - `Node` is a handle into the host's instance data.
/// - `Submission` is whatever the host considers an in-flight submission.
/// - `Actions` is the lazily constructed action interpreter.
/// - `Error` must absorb [`DocumentError`] so protocol violations and host
///   failures flow through one channel.
pub trait Host: Sized {
    /// Opaque action payload attached to handler registrations.
    type ActionSpec: Clone;
    /// Handle to a node in the host's instance data.
    type Node;
    /// An in-flight submission, held by the document's submission guard.
    type Submission;
    /// The action interpreter, constructed on first use.
    type Actions: ActionInterpreter<Self>;
    /// Host error type; absorbs document protocol errors.
    type Error: From<DocumentError> + core::fmt::Debug;

    /// Execute one matched handler registration.
    ///
    /// Called once per handler in protocol order. The handler's outcome flags
    /// are applied by the engine after this returns; an error aborts the
    /// remainder of the dispatch.
    fn run_handler(
        &mut self,
        doc: &mut Document<Self>,
        container: ComponentId,
        handler: &Handler<Self::ActionSpec>,
        event: &Event<ComponentId>,
    ) -> Result<(), Self::Error>;

    /// Perform the default action of the event's target.
    ///
    /// Only called when the accumulated flags permit it (or the event is not
    /// cancelable), and never for the document root.
    fn default_action(
        &mut self,
        doc: &mut Document<Self>,
        event: &Event<ComponentId>,
    ) -> Result<(), Self::Error>;

    /// Build the control tree. Invoked at most once per document, from the
    /// lifecycle sequences.
    fn initialize_controls(&mut self, doc: &mut Document<Self>) -> Result<(), Self::Error>;

    /// Make `control` the current addressing context for subsequent
    /// [`Host::current_bound_node`] and [`Host::current_model`] queries.
    fn set_addressing_context(&mut self, control: ComponentId);

    /// The instance node the current addressing context is bound to.
    fn current_bound_node(&self) -> Self::Node;

    /// The model owning the current addressing context.
    fn current_model(&self) -> ComponentId;

    /// Write a control value into an instance node. Not an event: value
    /// writes happen directly, before any notification is dispatched.
    fn write_value(&mut self, node: &Self::Node, value: &str);

    /// Construct the action interpreter. Called the first time an action
    /// runs, and again only when an action is already running.
    fn make_interpreter(&mut self) -> Self::Actions;
}

/// Interpreter for handler action payloads.
///
/// Held by the document and constructed lazily through
/// [`Host::make_interpreter`]; see [`Document::run_action`] for the
/// single-instance discipline.
pub trait ActionInterpreter<H: Host> {
    /// Run one action against `target_id`, observed from `container`.
    ///
    /// `event` is the event that triggered the action, absent when the action
    /// runs outside a dispatch.
    fn run(
        &mut self,
        doc: &mut Document<H>,
        host: &mut H,
        target_id: &str,
        container: ComponentId,
        action: &H::ActionSpec,
        event: Option<&Event<ComponentId>>,
    ) -> Result<(), H::Error>;
}
