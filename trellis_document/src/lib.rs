// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Document: the containing document of a server-side form runtime.
//!
//! ## Overview
//!
//! A [`Document`] sits between a string-typed client boundary and a strongly
//! typed [`Host`]. It owns the [component registry](registry) (models,
//! controls, and their identifier scopes), interprets client events
//! (classification, validation, and expansion of the composite
//! value-change-with-focus-change name), routes events through the
//! capture/bubble engine of `trellis_dispatch`, runs lifecycle sequences over
//! the model list, and guards the at-most-one active submission per request
//! cycle.
//!
//! The document holds no instance data and evaluates no actions itself; both
//! live behind the [`Host`] trait. Handlers receive the document back
//! mutably, so they can dispatch further events or run further actions while
//! the outer dispatch is still executing.
//!
//! ## Example
//!
//! A host that logs handler and default-action callbacks, driven entirely
//! through the string boundary:
//!
//! ```
//! use trellis_document::{
//!     ActionInterpreter, ComponentId, ComponentSpec, Document, DocumentError, Handler, Host,
//! };
//! use trellis_events::{Event, EventName};
//!
//! struct App {
//!     log: Vec<String>,
//! }
//!
//! struct NoActions;
//!
//! impl ActionInterpreter<App> for NoActions {
//!     fn run(
//!         &mut self,
//!         _doc: &mut Document<App>,
//!         _host: &mut App,
//!         _target_id: &str,
//!         _container: ComponentId,
//!         _action: &&'static str,
//!         _event: Option<&Event<ComponentId>>,
//!     ) -> Result<(), DocumentError> {
//!         Ok(())
//!     }
//! }
//!
//! impl Host for App {
//!     type ActionSpec = &'static str;
//!     type Node = ();
//!     type Submission = ();
//!     type Actions = NoActions;
//!     type Error = DocumentError;
//!
//!     fn run_handler(
//!         &mut self,
//!         _doc: &mut Document<Self>,
//!         _container: ComponentId,
//!         handler: &Handler<&'static str>,
//!         _event: &Event<ComponentId>,
//!     ) -> Result<(), DocumentError> {
//!         self.log.push(format!("handler: {}", handler.action));
//!         Ok(())
//!     }
//!
//!     fn default_action(
//!         &mut self,
//!         _doc: &mut Document<Self>,
//!         event: &Event<ComponentId>,
//!     ) -> Result<(), DocumentError> {
//!         self.log.push(format!("default: {}", event.name));
//!         Ok(())
//!     }
//!
//!     fn initialize_controls(&mut self, _doc: &mut Document<Self>) -> Result<(), DocumentError> {
//!         Ok(())
//!     }
//!
//!     fn set_addressing_context(&mut self, _control: ComponentId) {}
//!     fn current_bound_node(&self) {}
//!     fn current_model(&self) -> ComponentId {
//!         ComponentId::ROOT
//!     }
//!     fn write_value(&mut self, _node: &(), _value: &str) {}
//!     fn make_interpreter(&mut self) -> NoActions {
//!         NoActions
//!     }
//! }
//!
//! let mut b = Document::<App>::builder();
//! b.model(Some("main-model"))?;
//! let toolbar = b.control(
//!     ComponentSpec::container(Some("toolbar"))
//!         .with_handlers(vec![Handler::bubble(EventName::Activate, "log-activate")]),
//! )?;
//! b.child(toolbar, ComponentSpec::leaf(Some("save-button")))?;
//! let mut doc = b.finish();
//!
//! let mut app = App { log: Vec::new() };
//! doc.handle_client_event(&mut app, "DOMActivate", "save-button", None, None)?;
//! assert_eq!(app.log, ["handler: log-activate", "default: DOMActivate"]);
//! # Ok::<(), DocumentError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod document;
pub mod error;
pub mod host;
pub mod registry;

mod interpret;

#[cfg(test)]
pub(crate) mod testing;

pub use document::Document;
pub use error::DocumentError;
pub use host::{ActionInterpreter, Host};
pub use registry::{ComponentId, ComponentSpec, DocumentBuilder, Registry};

pub use trellis_dispatch::types::{Handler, HandlerFlags, Phase};
