// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the dispatch engine: phases, handler registrations, the
//! handler-tree view, and outcomes.

use trellis_events::EventName;

/// The propagation phase a handler is registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target pass, target's own container excluded.
    Capture,
    /// Target → root pass, target's own container included.
    Bubble,
}

bitflags::bitflags! {
    /// Outcome flags a handler contributes after it runs.
    ///
    /// Flags AND-accumulate across a dispatch: once any executed handler
    /// clears a flag, it stays cleared for the remainder of that dispatch.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HandlerFlags: u8 {
        /// Propagation may continue past this handler's container.
        const PROPAGATE       = 0b0000_0001;
        /// The target's default action may still run.
        const PERFORM_DEFAULT = 0b0000_0010;
    }
}

impl Default for HandlerFlags {
    fn default() -> Self {
        Self::PROPAGATE | Self::PERFORM_DEFAULT
    }
}

/// An immutable handler registration.
///
/// A handler is bound to exactly one event name and one phase. Multiple
/// handlers may match the same name within one container; they run in
/// registration order. The `action` payload is opaque to the engine and is
/// handed back to the executing closure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handler<A> {
    /// The one event name this handler matches (exact equality, no wildcards).
    pub event: EventName,
    /// The phase this handler runs in.
    pub phase: Phase,
    /// Outcome flags contributed after the handler runs.
    pub flags: HandlerFlags,
    /// Opaque action payload executed by the host.
    pub action: A,
}

impl<A> Handler<A> {
    /// Create a handler with default flags (propagate, perform default).
    pub fn new(event: EventName, phase: Phase, action: A) -> Self {
        Self {
            event,
            phase,
            flags: HandlerFlags::default(),
            action,
        }
    }

    /// Create a capture-phase handler with default flags.
    pub fn capture(event: EventName, action: A) -> Self {
        Self::new(event, Phase::Capture, action)
    }

    /// Create a bubble-phase handler with default flags.
    pub fn bubble(event: EventName, action: A) -> Self {
        Self::new(event, Phase::Bubble, action)
    }

    /// Replace the outcome flags.
    pub fn with_flags(mut self, flags: HandlerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether propagation may continue after this handler runs.
    pub fn propagates(&self) -> bool {
        self.flags.contains(HandlerFlags::PROPAGATE)
    }

    /// Whether the target's default action may still run afterwards.
    pub fn performs_default(&self) -> bool {
        self.flags.contains(HandlerFlags::PERFORM_DEFAULT)
    }
}

/// Read-only view of the event-handler container hierarchy.
///
/// Implemented by whatever owns the component tree (an arena, a document, a
/// test fixture). Keys are small copyable handles; parent links are non-owning
/// back-references, so the walk terminates at the node whose parent is `None`.
///
/// Container-ness and the handler list are independent: a container may report
/// an *absent* handler list (`handlers_of` returns `None`, the node is skipped
/// without iterating — the document root behaves this way), which is distinct
/// from a container with an empty list (`Some(&[])`, iterated and matching
/// nothing).
pub trait HandlerTree<K> {
    /// Opaque action payload type carried by this tree's handlers.
    type Action;

    /// The parent container of `node`, or `None` at the root.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Whether `node` can hold handlers and participate in propagation.
    fn is_container(&self, node: &K) -> bool;

    /// Whether `node` may be the target of an event.
    fn is_event_target(&self, node: &K) -> bool;

    /// The ordered handler list of `node`; `None` when absent.
    fn handlers_of(&self, node: &K) -> Option<&[Handler<Self::Action>]>;
}

/// Where and why a dispatch run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome<K> {
    /// Final accumulated propagate flag.
    pub propagate: bool,
    /// Final accumulated perform-default flag. The caller runs the target's
    /// default action iff this is set *or* the event is not cancelable.
    pub perform_default: bool,
    /// The phase and container where propagation stopped early, if it did.
    pub stopped: Option<(Phase, K)>,
}

/// Routing failure raised before any handler runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The event's target does not satisfy the event-target capability.
    #[error("event target does not satisfy the event-target capability")]
    InvalidTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_allow_everything() {
        let h = Handler::bubble(EventName::Activate, ());
        assert!(h.propagates());
        assert!(h.performs_default());
    }

    #[test]
    fn cleared_flags_are_observable() {
        let h = Handler::capture(EventName::Activate, ())
            .with_flags(HandlerFlags::PERFORM_DEFAULT);
        assert!(!h.propagates());
        assert!(h.performs_default());

        let h = Handler::bubble(EventName::Refresh, ()).with_flags(HandlerFlags::empty());
        assert!(!h.propagates());
        assert!(!h.performs_default());
    }
}
