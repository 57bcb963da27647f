// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`ConstraintManager`](crate::ConstraintManager).

use core::fmt;

/// Error returned when a constraint cannot be installed.
///
/// `V` is the host's view handle and `E` its constraint error type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintError<V, E> {
    /// The view handle is stale.
    UnknownView(V),
    /// The operation relates the view to its superview, but it has none.
    NoParent(V),
    /// The host rejected the constraint.
    Host(E),
}

impl<V: fmt::Debug, E: fmt::Display> fmt::Display for ConstraintError<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownView(view) => write!(f, "view {view:?} is not alive"),
            Self::NoParent(view) => write!(f, "view {view:?} has no superview"),
            Self::Host(err) => write!(f, "host rejected constraint: {err}"),
        }
    }
}

impl<V, E> core::error::Error for ConstraintError<V, E>
where
    V: fmt::Debug,
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
            Self::UnknownView(_) | Self::NoParent(_) => None,
        }
    }
}
