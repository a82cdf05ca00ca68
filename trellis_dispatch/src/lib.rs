// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Dispatch: a deterministic two-phase propagation engine for form events.
//!
//! ## Overview
//!
//! This crate routes a single [`Event`](trellis_events::Event) through a
//! hierarchy of event-handler containers using the capture → bubble protocol:
//!
//! 1. The **capture phase** visits containers root → target, excluding the
//!    target itself, running handlers registered for [`Phase::Capture`] whose
//!    event name matches exactly.
//! 2. The **bubble phase** visits containers target → root, *including* the
//!    target's container, running [`Phase::Bubble`] handlers.
//! 3. The target's **default action** runs afterwards unless a handler
//!    suppressed it on a cancelable event.
//!
//! Each executed handler contributes two outcome flags that AND-accumulate
//! across the walk: *propagate* (may later containers still run?) and
//! *perform default* (may the target's built-in response still run?). A
//! capture-phase stop is honored only for cancelable events; a bubble-phase
//! stop is unconditional.
//!
//! ## Layering
//!
//! Routing is split the same way as the traversal it models:
//!
//! - [`plan::build`] is pure: it resolves the ancestor chain through a
//!   [`HandlerTree`](types::HandlerTree) view and emits an owned
//!   [`Plan`](plan::Plan) of phase steps with the matching handlers already
//!   filtered in registration order.
//! - [`dispatcher::run`] executes a plan with a caller-supplied closure and
//!   applies the accumulation and short-circuit rules, reporting the final
//!   [`Outcome`](types::Outcome).
//!
//! Because the plan owns its data, the executing closure is free to re-enter
//! the structures the plan was built from — a handler may synchronously raise
//! further events through the same tree.
//!
//! ## Minimal example
//!
//! ```
//! use trellis_dispatch::types::{Handler, HandlerFlags, HandlerTree, Phase};
//! use trellis_dispatch::{dispatcher, plan};
//! use trellis_events::{Event, EventName};
//!
//! // A two-level tree: container 1 is the parent of leaf target 2.
//! struct Tree {
//!     handlers: Vec<Handler<&'static str>>,
//! }
//!
//! impl HandlerTree<u32> for Tree {
//!     type Action = &'static str;
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node == 2).then_some(1)
//!     }
//!     fn is_container(&self, node: &u32) -> bool {
//!         *node == 1
//!     }
//!     fn is_event_target(&self, _node: &u32) -> bool {
//!         true
//!     }
//!     fn handlers_of(&self, node: &u32) -> Option<&[Handler<&'static str>]> {
//!         (*node == 1).then_some(self.handlers.as_slice())
//!     }
//! }
//!
//! let tree = Tree {
//!     handlers: vec![Handler::bubble(EventName::Activate, "beep")],
//! };
//! let event = Event::new(EventName::Activate, 2_u32);
//!
//! let plan = plan::build(&tree, &event).unwrap();
//! let mut ran = Vec::new();
//! let outcome = dispatcher::run(&plan, &event, |container, handler| {
//!     ran.push((*container, handler.action));
//!     Ok::<_, ()>(())
//! })
//! .unwrap();
//!
//! // The leaf target is not a container; its parent is the innermost
//! // container and receives the bubble-phase handler.
//! assert_eq!(ran, vec![(1, "beep")]);
//! assert!(outcome.perform_default);
//! # let _ = HandlerFlags::default();
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod plan;
pub mod types;
