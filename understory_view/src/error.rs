// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`ViewTree`](crate::ViewTree) mutations.

use core::fmt;

use crate::types::ViewId;

/// Error returned when the tree rejects a structural or constraint mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The handle does not refer to a live view.
    StaleView(ViewId),
    /// A view cannot be added as a child of itself.
    SameView(ViewId),
    /// Adding the child would make a view its own ancestor.
    WouldCycle {
        /// The requested parent.
        parent: ViewId,
        /// The requested child, which is an ancestor of `parent`.
        child: ViewId,
    },
    /// The two endpoints of a constraint are in different hierarchies.
    NoCommonAncestor(ViewId, ViewId),
    /// Constraint constants must be finite.
    NonFiniteConstant,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleView(id) => write!(f, "view {id:?} is not alive"),
            Self::SameView(id) => write!(f, "view {id:?} cannot be added to itself"),
            Self::WouldCycle { parent, child } => write!(
                f,
                "adding {child:?} under {parent:?} would create a cycle"
            ),
            Self::NoCommonAncestor(a, b) => {
                write!(f, "views {a:?} and {b:?} share no common ancestor")
            }
            Self::NonFiniteConstant => f.write_str("constraint constant is not finite"),
        }
    }
}

impl core::error::Error for ViewError {}
