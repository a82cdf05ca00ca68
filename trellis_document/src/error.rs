// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol and invariant errors raised by the containing document.

use alloc::string::String;

/// Errors raised by the containing document.
///
/// All of these indicate a malformed request or a violated internal
/// invariant, not a transient condition: they surface immediately to the
/// caller and there is no retry layer at this level. An error raised while a
/// dispatch or a composite expansion is underway aborts the remainder of that
/// dispatch or sequence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// An identifier did not resolve where a target is mandatory, or the
    /// resolved component cannot receive events.
    #[error("event target `{id}` does not resolve to an event target")]
    InvalidTarget {
        /// The offending identifier.
        id: String,
    },
    /// An event or lifecycle name outside the closed enumeration.
    #[error("unsupported event `{name}` dispatched by client")]
    UnsupportedEvent {
        /// The offending wire name.
        name: String,
    },
    /// A second submission was set on a document that already holds one.
    #[error("there is already an active submission")]
    DuplicateSubmission,
    /// The identifier or default action of the document root was requested;
    /// the root is not individually addressable.
    #[error("the containing document is not individually addressable")]
    NotAddressable,
    /// Two components were registered under the same identifier in one
    /// resolution scope.
    #[error("duplicate component identifier `{ident}`")]
    DuplicateId {
        /// The identifier registered twice.
        ident: String,
    },
}
