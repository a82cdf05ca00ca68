// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plan construction: resolve the ancestor chain and emit phase steps.
//!
//! ## Overview
//!
//! [`build`] walks the parent links of a [`HandlerTree`] and produces an owned
//! [`Plan`]: the ordered capture steps (root → innermost container, any chain
//! entry equal to the event target excluded), followed by the ordered bubble
//! steps (innermost container → root, target's container included). Each step
//! carries the container's handlers already filtered by phase and exact event
//! name, in registration order.
//!
//! ## Path rules
//!
//! - If the target is itself a container, it is the innermost container of the
//!   chain; otherwise its parent container is.
//! - Capture excludes a chain entry only when it *is* the target — the parent
//!   of a leaf target still receives capture handlers.
//! - Containers whose handler list is absent are skipped entirely; containers
//!   with an empty or non-matching list still appear as (empty) steps so the
//!   executing walk observes the same stop checkpoints the protocol defines.
//!
//! The plan owns cloned handlers, so executing it does not borrow the tree:
//! handlers are free to mutate or re-enter the structures the plan was built
//! from.

use alloc::vec::Vec;
use smallvec::SmallVec;
use trellis_events::Event;

use crate::types::{DispatchError, Handler, HandlerTree, Phase};

/// One container visit within a plan.
#[derive(Clone, Debug)]
pub struct PlanStep<K, A> {
    /// Phase this visit belongs to.
    pub phase: Phase,
    /// The visited container.
    pub container: K,
    /// Handlers matching (phase, event name), in registration order.
    pub handlers: Vec<Handler<A>>,
}

/// An owned propagation plan for one event.
///
/// Produced by [`build`], executed by [`crate::dispatcher::run`]. Steps are
/// ordered: all capture steps (root first), then all bubble steps (innermost
/// first).
#[derive(Clone, Debug)]
pub struct Plan<K, A> {
    /// Ordered container visits.
    pub steps: Vec<PlanStep<K, A>>,
}

impl<K, A> Plan<K, A> {
    /// Steps belonging to the capture phase, root first.
    pub fn capture_steps(&self) -> impl Iterator<Item = &PlanStep<K, A>> {
        self.steps.iter().filter(|s| s.phase == Phase::Capture)
    }

    /// Steps belonging to the bubble phase, innermost first.
    pub fn bubble_steps(&self) -> impl Iterator<Item = &PlanStep<K, A>> {
        self.steps.iter().filter(|s| s.phase == Phase::Bubble)
    }
}

/// Build the propagation plan for `event` over `tree`.
///
/// Fails fast with [`DispatchError::InvalidTarget`] when the event's target
/// does not satisfy the event-target capability; no handler has run at that
/// point. A target with no containers anywhere (and no parent) yields an
/// empty plan — dispatch then consists of the default action alone.
pub fn build<K, T>(tree: &T, event: &Event<K>) -> Result<Plan<K, T::Action>, DispatchError>
where
    K: Copy + Eq,
    T: HandlerTree<K>,
    T::Action: Clone,
{
    if !tree.is_event_target(&event.target) {
        return Err(DispatchError::InvalidTarget);
    }

    // Innermost container: the target itself when it is a container,
    // otherwise its parent.
    let innermost = if tree.is_container(&event.target) {
        Some(event.target)
    } else {
        tree.parent_of(&event.target)
    };

    // Collect innermost → root. Caller ensures acyclic ancestry.
    let mut chain: SmallVec<[K; 8]> = SmallVec::new();
    let mut cur = innermost;
    while let Some(c) = cur {
        chain.push(c);
        cur = tree.parent_of(&c);
    }

    let mut steps = Vec::new();

    // Capture: root → innermost. Handlers registered on the target itself do
    // not run in capture.
    for &container in chain.iter().rev() {
        if container == event.target {
            continue;
        }
        let Some(handlers) = tree.handlers_of(&container) else {
            continue;
        };
        steps.push(PlanStep {
            phase: Phase::Capture,
            container,
            handlers: matching(handlers, Phase::Capture, event),
        });
    }

    // Bubble: innermost → root, target's container included.
    for &container in chain.iter() {
        let Some(handlers) = tree.handlers_of(&container) else {
            continue;
        };
        steps.push(PlanStep {
            phase: Phase::Bubble,
            container,
            handlers: matching(handlers, Phase::Bubble, event),
        });
    }

    tracing::trace!(
        event = %event.name,
        chain = chain.len(),
        steps = steps.len(),
        "built dispatch plan"
    );

    Ok(Plan { steps })
}

fn matching<K, A: Clone>(handlers: &[Handler<A>], phase: Phase, event: &Event<K>) -> Vec<Handler<A>> {
    handlers
        .iter()
        .filter(|h| h.phase == phase && h.event == event.name)
        .cloned()
        .collect()
}
