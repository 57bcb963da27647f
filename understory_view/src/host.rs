// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits consumed by the visibility, constraint, and presentation services.
//!
//! Services never reach into a concrete tree type. Hosts implement the subset they support;
//! [`ViewTree`](crate::ViewTree) implements all of them.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Affine;

use crate::types::{LayoutConstraint, ViewNode};

/// Read access to the view hierarchy: parent links and per-view geometry.
pub trait ViewHierarchy {
    /// Handle type for views.
    type View: Copy + Eq + Hash + Debug;

    /// Parent of `view`, or `None` for roots and stale handles.
    fn parent(&self, view: Self::View) -> Option<Self::View>;

    /// Local state of `view`, or `None` for stale handles.
    fn node(&self, view: Self::View) -> Option<ViewNode>;
}

/// A host that can install and remove layout constraints.
pub trait ConstraintHost: ViewHierarchy {
    /// Handle type for installed constraints.
    type Constraint: Copy + Eq + Hash + Debug;
    /// Error reported when the host rejects a constraint.
    type Error;

    /// Install a constraint and return its handle.
    fn add_constraint(
        &mut self,
        constraint: LayoutConstraint<Self::View>,
    ) -> Result<Self::Constraint, Self::Error>;

    /// Remove an installed constraint. Returns `false` if it was already gone.
    fn remove_constraint(&mut self, id: Self::Constraint) -> bool;

    /// Look up an installed constraint. Returns `None` once the host has dropped it.
    fn constraint(&self, id: Self::Constraint) -> Option<LayoutConstraint<Self::View>>;

    /// Replace the constant of an installed constraint. Returns `false` if it is gone.
    fn set_constraint_constant(&mut self, id: Self::Constraint, constant: f64) -> bool;
}

/// A host that can attach and detach children and adjust their appearance for transitions.
pub trait PresentationHost: ViewHierarchy {
    /// Error reported when the host rejects an insertion.
    type Error;

    /// Insert `child` as the top-most child of `parent`, detaching it from any previous parent.
    fn add_child(&mut self, parent: Self::View, child: Self::View) -> Result<(), Self::Error>;

    /// Detach `view` from its parent. Returns `false` if it had none.
    fn remove_from_parent(&mut self, view: Self::View) -> bool;

    /// Set the opacity of `view`.
    fn set_alpha(&mut self, view: Self::View, alpha: f64);

    /// Set the transform of `view`.
    fn set_transform(&mut self, view: Self::View, transform: Affine);
}
