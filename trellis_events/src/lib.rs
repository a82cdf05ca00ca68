// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Events: event names and single-use event values for a form runtime.
//!
//! ## Overview
//!
//! Every event the engine can route is identified by an [`EventName`], a closed
//! enumeration known at compile time. Each name fixes two pieces of protocol
//! behavior: whether the event `bubbles` after the capture phase, and whether it
//! is `cancelable` (a handler may stop propagation during capture). Free-form
//! strings exist only at the external boundary: [`EventName::from_external`]
//! parses a client-supplied wire name, and anything outside the enumeration is
//! rejected there rather than silently ignored later.
//!
//! Document-level lifecycle requests use a second, independent enumeration,
//! [`LifecycleEvent`]. Lifecycle names never travel through the propagation
//! machinery; they select an ordered initialization sequence instead.
//!
//! An [`Event`] is an immutable, single-use value: it is created, dispatched
//! once, and discarded. It carries the name, the target key, an optional
//! secondary ("other") target used by focus-change sequences, and an optional
//! string payload (for example, the new value of a changed control).
//!
//! ## Minimal example
//!
//! ```
//! use trellis_events::{Event, EventName};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! struct Key(u32);
//!
//! let ev = Event::new(EventName::ValueChanged, Key(7)).with_payload("42");
//! assert!(ev.bubbles());
//! assert!(!ev.cancelable());
//! assert_eq!(ev.payload.as_deref(), Some("42"));
//!
//! // Unknown wire names are rejected at the boundary.
//! assert!(EventName::from_external("not-an-event").is_none());
//! ```
//!
//! The event value is generic over the target key `K`, so hosts can use any
//! small, copyable handle (an arena id, a slotmap key, or a test integer).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;

/// Name of a primitive event the engine can dispatch.
///
/// The enumeration is closed: every routable event is listed here, and the
/// `bubbles`/`cancelable` flags are fixed per name rather than per event
/// instance. [`EventName::ValueChangeWithFocusChange`] is special: it is never
/// dispatched as a single event but expanded by the interpreter into an
/// ordered sequence of the other names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A control was activated (for example, a button press).
    Activate,
    /// A control received focus.
    FocusIn,
    /// A control lost focus.
    FocusOut,
    /// The value bound to a control changed.
    ValueChanged,
    /// Composite client event: a value change together with an optional focus
    /// change. Expanded by the interpreter, never forwarded as-is.
    ValueChangeWithFocusChange,
    /// Ask a model to recalculate derived values.
    Recalculate,
    /// Ask a model to revalidate its instance data.
    Revalidate,
    /// Ask a model to refresh its controls.
    Refresh,
    /// Internal trigger starting a submission.
    Submit,
    /// Lifecycle stage: model construction.
    ModelConstruct,
    /// Lifecycle stage: model construction finished.
    ModelConstructDone,
    /// Lifecycle stage: model ready.
    Ready,
    /// Restore a model from previously saved state.
    RestoreState,
}

impl EventName {
    /// Whether events with this name participate in the bubble phase.
    ///
    /// Every name in the current enumeration bubbles; the accessor exists so
    /// the dispatch engine never hard-codes that assumption.
    pub const fn bubbles(self) -> bool {
        true
    }

    /// Whether a capture-phase handler may cancel propagation of this event.
    pub const fn cancelable(self) -> bool {
        match self {
            Self::Activate
            | Self::Recalculate
            | Self::Revalidate
            | Self::Refresh
            | Self::Submit => true,
            Self::FocusIn
            | Self::FocusOut
            | Self::ValueChanged
            | Self::ValueChangeWithFocusChange
            | Self::ModelConstruct
            | Self::ModelConstructDone
            | Self::Ready
            | Self::RestoreState => false,
        }
    }

    /// The external wire name for this event.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "DOMActivate",
            Self::FocusIn => "DOMFocusIn",
            Self::FocusOut => "DOMFocusOut",
            Self::ValueChanged => "xforms-value-changed",
            Self::ValueChangeWithFocusChange => "xxforms-value-change-with-focus-change",
            Self::Recalculate => "xforms-recalculate",
            Self::Revalidate => "xforms-revalidate",
            Self::Refresh => "xforms-refresh",
            Self::Submit => "xxforms-submit",
            Self::ModelConstruct => "xforms-model-construct",
            Self::ModelConstructDone => "xforms-model-construct-done",
            Self::Ready => "xforms-ready",
            Self::RestoreState => "xxforms-restore-state",
        }
    }

    /// Parse an externally supplied wire name.
    ///
    /// Returns `None` for any name outside the closed enumeration. This is the
    /// only place a free-form string enters the event machinery; callers map
    /// `None` to their unsupported-event error.
    pub fn from_external(name: &str) -> Option<Self> {
        Some(match name {
            "DOMActivate" => Self::Activate,
            "DOMFocusIn" => Self::FocusIn,
            "DOMFocusOut" => Self::FocusOut,
            "xforms-value-changed" => Self::ValueChanged,
            "xxforms-value-change-with-focus-change" => Self::ValueChangeWithFocusChange,
            "xforms-recalculate" => Self::Recalculate,
            "xforms-revalidate" => Self::Revalidate,
            "xforms-refresh" => Self::Refresh,
            "xxforms-submit" => Self::Submit,
            "xforms-model-construct" => Self::ModelConstruct,
            "xforms-model-construct-done" => Self::ModelConstructDone,
            "xforms-ready" => Self::Ready,
            "xxforms-restore-state" => Self::RestoreState,
            _ => return None,
        })
    }
}

impl core::fmt::Display for EventName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a document-level lifecycle request.
///
/// Lifecycle requests select an ordered initialization sequence on the
/// containing document; they are not routed through capture/bubble
/// propagation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Run the full initialization sequence (construct, construct-done,
    /// ready), interleaving controls initialization.
    Initialize,
    /// Restore every model from saved state, then initialize controls.
    InitializeState,
    /// Initialize the control tree.
    InitializeControls,
}

impl LifecycleEvent {
    /// The external wire name for this lifecycle request.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "xxforms-initialize",
            Self::InitializeState => "xxforms-initialize-state",
            Self::InitializeControls => "xxforms-initialize-controls",
        }
    }

    /// Parse an externally supplied lifecycle name; `None` when outside the
    /// closed enumeration.
    pub fn from_external(name: &str) -> Option<Self> {
        Some(match name {
            "xxforms-initialize" => Self::Initialize,
            "xxforms-initialize-state" => Self::InitializeState,
            "xxforms-initialize-controls" => Self::InitializeControls,
            _ => return None,
        })
    }
}

impl core::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-use event value.
///
/// Created, dispatched once, discarded. `bubbles`/`cancelable` are properties
/// of the name, not of the instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event<K> {
    /// The event name; fixes semantics and the expansion/forwarding rule.
    pub name: EventName,
    /// The target component key.
    pub target: K,
    /// Optional secondary target (the component gaining focus in a
    /// value-change-with-focus-change sequence).
    pub other_target: Option<K>,
    /// Optional string payload (for example, a new control value).
    pub payload: Option<String>,
}

impl<K> Event<K> {
    /// Create an event with no secondary target and no payload.
    pub const fn new(name: EventName, target: K) -> Self {
        Self {
            name,
            target,
            other_target: None,
            payload: None,
        }
    }

    /// Attach a secondary target.
    pub fn with_other_target(mut self, other: K) -> Self {
        self.other_target = Some(other);
        self
    }

    /// Attach a string payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Whether this event participates in the bubble phase.
    pub const fn bubbles(&self) -> bool {
        self.name.bubbles()
    }

    /// Whether a capture-phase handler may cancel propagation.
    pub const fn cancelable(&self) -> bool {
        self.name.cancelable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelable_split_matches_protocol() {
        // UI activation and the model maintenance events may be canceled
        // during capture; focus, value-changed, and lifecycle stages may not.
        for name in [
            EventName::Activate,
            EventName::Recalculate,
            EventName::Revalidate,
            EventName::Refresh,
            EventName::Submit,
        ] {
            assert!(name.cancelable(), "{name} should be cancelable");
        }
        for name in [
            EventName::FocusIn,
            EventName::FocusOut,
            EventName::ValueChanged,
            EventName::ModelConstruct,
            EventName::ModelConstructDone,
            EventName::Ready,
            EventName::RestoreState,
        ] {
            assert!(!name.cancelable(), "{name} should not be cancelable");
        }
    }

    #[test]
    fn external_parse_accepts_known_and_rejects_unknown() {
        assert_eq!(
            EventName::from_external("DOMActivate"),
            Some(EventName::Activate)
        );
        assert_eq!(
            EventName::from_external("xxforms-value-change-with-focus-change"),
            Some(EventName::ValueChangeWithFocusChange)
        );
        assert_eq!(EventName::from_external("xforms-insert"), None);
        assert_eq!(EventName::from_external(""), None);

        assert_eq!(
            LifecycleEvent::from_external("xxforms-initialize"),
            Some(LifecycleEvent::Initialize)
        );
        assert_eq!(LifecycleEvent::from_external("DOMActivate"), None);
    }

    #[test]
    fn builder_attaches_secondary_target_and_payload() {
        let ev = Event::new(EventName::ValueChangeWithFocusChange, 1_u32)
            .with_other_target(2)
            .with_payload("new value");
        assert_eq!(ev.target, 1);
        assert_eq!(ev.other_target, Some(2));
        assert_eq!(ev.payload.as_deref(), Some("new value"));
    }
}
