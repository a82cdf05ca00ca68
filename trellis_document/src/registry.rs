// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component registry: an arena of addressable components with per-model
//! resolution scopes.
//!
//! ## Overview
//!
//! Components live in a flat arena indexed by [`ComponentId`]; the parent link
//! is a non-owning back-reference stored as an index, so the hierarchy needs
//! no shared-ownership graph and tears down with the arena. Slot 0 is always
//! the document root: a handler container with an *absent* handler list that
//! is never individually addressable.
//!
//! Identifier resolution follows a fixed search order: the model scopes in
//! model insertion order (each model answers from its own nested scope —
//! itself, its submissions, its instances), then the control scope. The first
//! hit wins. The empty identifier is not "no identifier": it always resolves
//! to the first model, even when some component carries the literal empty
//! string as its identifier.
//!
//! Duplicate identifiers are rejected while the tree is being wired, both
//! across the model list and within a single scope; a registry that built
//! successfully resolves unambiguously.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;

use trellis_dispatch::types::{Handler, HandlerTree};

use crate::error::DocumentError;

/// Identifier for a component in the registry arena.
///
/// Plain index, no generation: components are never removed during a
/// document's lifetime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComponentId(u32);

impl ComponentId {
    /// The document root. A handler container whose handler list is absent;
    /// requesting its identifier or default action fails with
    /// [`DocumentError::NotAddressable`].
    pub const ROOT: Self = Self(0);

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Which resolution scope a component belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scope {
    /// The root itself; owns no identifier map.
    Document,
    /// Nested scope of the model at this index in the model list.
    Model(usize),
    /// The control tree scope.
    Controls,
}

struct Component<A> {
    ident: Option<String>,
    parent: Option<ComponentId>,
    /// `None` is an absent handler list, distinct from `Some(vec![])`.
    handlers: Option<Vec<Handler<A>>>,
    event_target: bool,
    container: bool,
    scope: Scope,
}

/// The component registry: arena, model list, and resolution scopes.
pub struct Registry<A> {
    components: Vec<Component<A>>,
    models: Vec<ComponentId>,
    /// Parallel to `models`; each model's nested identifier scope.
    model_scopes: Vec<HashMap<String, ComponentId>>,
    control_scope: HashMap<String, ComponentId>,
}

impl<A> core::fmt::Debug for Registry<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.components.len())
            .field("models", &self.models.len())
            .field("control_scope", &self.control_scope.len())
            .finish_non_exhaustive()
    }
}

impl<A> Registry<A> {
    fn new() -> Self {
        let root = Component {
            ident: None,
            parent: None,
            handlers: None,
            event_target: true,
            container: true,
            scope: Scope::Document,
        };
        Self {
            components: alloc::vec![root],
            models: Vec::new(),
            model_scopes: Vec::new(),
            control_scope: HashMap::new(),
        }
    }

    /// Resolve an identifier to a component.
    ///
    /// The empty identifier resolves to the first model. Otherwise the model
    /// scopes are searched in model order, then the control scope; the first
    /// non-empty answer wins and no further scope is consulted.
    pub fn resolve(&self, ident: &str) -> Option<ComponentId> {
        if ident.is_empty() {
            return self.models.first().copied();
        }
        for scope in &self.model_scopes {
            if let Some(&id) = scope.get(ident) {
                return Some(id);
            }
        }
        self.control_scope.get(ident).copied()
    }

    /// The default model: the first model in insertion order.
    pub fn default_model(&self) -> Option<ComponentId> {
        self.models.first().copied()
    }

    /// All models, in insertion order.
    pub fn models(&self) -> &[ComponentId] {
        &self.models
    }

    /// Number of registered models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// The model at `index` in insertion order.
    ///
    /// Panics when out of range; pair with [`Registry::model_count`].
    pub fn model_at(&self, index: usize) -> ComponentId {
        self.models[index]
    }

    /// The identifier of a component.
    ///
    /// Fails with [`DocumentError::NotAddressable`] for the document root;
    /// `Ok(None)` for an anonymous component.
    pub fn ident_of(&self, id: ComponentId) -> Result<Option<&str>, DocumentError> {
        if id == ComponentId::ROOT {
            return Err(DocumentError::NotAddressable);
        }
        Ok(self
            .components
            .get(id.idx())
            .and_then(|c| c.ident.as_deref()))
    }

    fn insert(
        &mut self,
        scope: Scope,
        parent: ComponentId,
        spec: ComponentSpec<A>,
    ) -> Result<ComponentId, DocumentError> {
        let id = ComponentId(
            u32::try_from(self.components.len()).expect("component arena exceeds u32::MAX slots"),
        );
        if let Some(ident) = &spec.ident {
            let map = match scope {
                Scope::Document => None,
                Scope::Model(i) => Some(&mut self.model_scopes[i]),
                Scope::Controls => Some(&mut self.control_scope),
            };
            if let Some(map) = map {
                if map.contains_key(ident.as_str()) {
                    return Err(DocumentError::DuplicateId {
                        ident: ident.clone(),
                    });
                }
                map.insert(ident.clone(), id);
            }
        }
        let container = spec.handlers.is_some();
        self.components.push(Component {
            ident: spec.ident,
            parent: Some(parent),
            handlers: spec.handlers,
            event_target: spec.event_target,
            container,
            scope,
        });
        Ok(id)
    }
}

impl<A> HandlerTree<ComponentId> for Registry<A> {
    type Action = A;

    fn parent_of(&self, node: &ComponentId) -> Option<ComponentId> {
        self.components.get(node.idx()).and_then(|c| c.parent)
    }

    fn is_container(&self, node: &ComponentId) -> bool {
        self.components
            .get(node.idx())
            .is_some_and(|c| c.container)
    }

    fn is_event_target(&self, node: &ComponentId) -> bool {
        self.components
            .get(node.idx())
            .is_some_and(|c| c.event_target)
    }

    fn handlers_of(&self, node: &ComponentId) -> Option<&[Handler<A>]> {
        self.components
            .get(node.idx())
            .and_then(|c| c.handlers.as_deref())
    }
}

/// Specification of one component to register.
#[derive(Clone, Debug)]
pub struct ComponentSpec<A> {
    /// Identifier, unique within the owning scope. Optional; the literal
    /// empty string is a valid identifier.
    pub ident: Option<String>,
    /// Handler list; `None` declares it absent (the component is not a
    /// container).
    pub handlers: Option<Vec<Handler<A>>>,
    /// Whether the component may be the target of events.
    pub event_target: bool,
}

impl<A> ComponentSpec<A> {
    /// A handler container with an empty handler list.
    pub fn container(ident: Option<&str>) -> Self {
        Self {
            ident: ident.map(ToString::to_string),
            handlers: Some(Vec::new()),
            event_target: true,
        }
    }

    /// A leaf component: absent handler list, still an event target.
    pub fn leaf(ident: Option<&str>) -> Self {
        Self {
            ident: ident.map(ToString::to_string),
            handlers: None,
            event_target: true,
        }
    }

    /// Attach handlers (implies container-ness).
    pub fn with_handlers(mut self, handlers: Vec<Handler<A>>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Mark the component as unable to receive events.
    pub fn without_event_target(mut self) -> Self {
        self.event_target = false;
        self
    }
}

/// Wires the component tree before the document exists.
///
/// Models and the control tree are constructed first; the containing document
/// is created from the finished wiring via
/// [`DocumentBuilder::finish`](crate::document::Document). All duplicate
/// identifier checks happen here, at construction time.
pub struct DocumentBuilder<A> {
    pub(crate) registry: Registry<A>,
}

impl<A> core::fmt::Debug for DocumentBuilder<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("registry", &self.registry)
            .finish()
    }
}

impl<A> Default for DocumentBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> DocumentBuilder<A> {
    /// Create a builder holding only the document root.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Append a model. Models keep insertion order; the first one is the
    /// default model. A model identifier already used by an earlier model is
    /// rejected.
    pub fn model(&mut self, ident: Option<&str>) -> Result<ComponentId, DocumentError> {
        if let Some(ident) = ident {
            let taken = self.registry.models.iter().any(|m| {
                self.registry.components[m.idx()].ident.as_deref() == Some(ident)
            });
            if taken {
                return Err(DocumentError::DuplicateId {
                    ident: ident.to_string(),
                });
            }
        }
        let index = self.registry.models.len();
        self.registry.model_scopes.push(HashMap::new());
        let id = self.registry.insert(
            Scope::Model(index),
            ComponentId::ROOT,
            ComponentSpec::container(ident),
        )?;
        self.registry.models.push(id);
        Ok(id)
    }

    /// Register a top-level control under the document root, in the control
    /// scope.
    pub fn control(&mut self, spec: ComponentSpec<A>) -> Result<ComponentId, DocumentError> {
        self.registry.insert(Scope::Controls, ComponentId::ROOT, spec)
    }

    /// Register a component under `parent`, inheriting the parent's scope
    /// (a submission under a model, a nested control under a control).
    /// Children of the root belong to the control scope.
    pub fn child(
        &mut self,
        parent: ComponentId,
        spec: ComponentSpec<A>,
    ) -> Result<ComponentId, DocumentError> {
        let scope = match self
            .registry
            .components
            .get(parent.idx())
            .map(|c| c.scope)
        {
            Some(Scope::Model(i)) => Scope::Model(i),
            Some(Scope::Controls) | Some(Scope::Document) | None => Scope::Controls,
        };
        self.registry.insert(scope, parent, spec)
    }

    /// Replace the handler list of an already-registered component.
    ///
    /// Handlers are immutable once the document is constructed; this is the
    /// wiring-time registration point. Panics when `id` was not produced by
    /// this builder.
    pub fn set_handlers(&mut self, id: ComponentId, handlers: Vec<Handler<A>>) {
        self.registry.components[id.idx()].handlers = Some(handlers);
    }
}
