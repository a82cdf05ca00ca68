// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: execute a plan and accumulate outcome flags.
//!
//! ## Semantics
//!
//! [`run`] walks the steps of a [`Plan`] in order and applies the propagation
//! protocol:
//!
//! - `propagate` and `perform_default` start `true`. Every executed handler
//!   AND-accumulates its [`HandlerFlags`](crate::types::HandlerFlags) into
//!   them; a cleared flag stays cleared for the rest of the dispatch.
//! - After each capture step, a cleared `propagate` aborts the walk *only if
//!   the event is cancelable* — non-cancelable events complete the capture
//!   pass regardless.
//! - The bubble phase runs only if `propagate` is still set and the event
//!   bubbles. After each bubble step, a cleared `propagate` aborts
//!   unconditionally.
//! - The returned [`Outcome`] reports the final flags and where the walk
//!   stopped. The caller runs the target's default action iff
//!   `perform_default` is set or the event is not cancelable.
//!
//! A handler error aborts the remainder of the dispatch immediately — no
//! partial continuation — and propagates to the caller.
//!
//! The executor closure receives the visited container and the handler
//! registration; because the plan owns its data, the closure may re-enter the
//! tree the plan was built from (handlers raising further events is a
//! synchronous nested call, not concurrency).

use trellis_events::Event;

use crate::plan::Plan;
use crate::types::{Handler, Outcome, Phase};

/// Execute `plan` for `event`, running each matched handler through `exec`.
///
/// Returns the accumulated [`Outcome`], or the first handler error.
pub fn run<K, A, E>(
    plan: &Plan<K, A>,
    event: &Event<K>,
    mut exec: impl FnMut(&K, &Handler<A>) -> Result<(), E>,
) -> Result<Outcome<K>, E>
where
    K: Copy + Eq,
{
    let mut propagate = true;
    let mut perform_default = true;
    let mut stopped = None;

    for step in plan.capture_steps() {
        for handler in &step.handlers {
            exec(&step.container, handler)?;
            propagate &= handler.propagates();
            perform_default &= handler.performs_default();
        }
        // Cancel propagation if requested and if authorized by the event.
        if !propagate && event.cancelable() {
            stopped = Some((Phase::Capture, step.container));
            break;
        }
    }

    if propagate && event.bubbles() {
        for step in plan.bubble_steps() {
            for handler in &step.handlers {
                exec(&step.container, handler)?;
                propagate &= handler.propagates();
                perform_default &= handler.performs_default();
            }
            if !propagate {
                stopped = Some((Phase::Bubble, step.container));
                break;
            }
        }
    }

    if let Some((phase, _)) = stopped {
        tracing::debug!(event = %event.name, ?phase, "propagation stopped early");
    }

    Ok(Outcome {
        propagate,
        perform_default,
        stopped,
    })
}
