// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of constraints installed by this crate, keyed by `(view, role)`.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use understory_view::{ConstraintHost, LayoutConstraint};

use crate::role::Role;

/// Tracks which constraints were installed for which `(view, role)`.
///
/// Constraints a host owns but this registry did not install are never touched.
/// The host may drop tracked constraints on its own (for example when a view is
/// detached); such entries read as absent and are forgotten by [`prune`](Self::prune)
/// or the next mutation of the same key.
///
/// ```
/// use understory_constraint::{ConstraintRegistry, Role};
/// use understory_view::{Attribute, Axis, LayoutConstraint, ViewNode, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let v = tree.insert(None, ViewNode::default());
/// let mut registry = ConstraintRegistry::new();
///
/// let role = Role::FixedSize(Axis::Horizontal);
/// let first = registry
///     .set(&mut tree, v, role, LayoutConstraint::fixed(v, Attribute::Width, 10.0))
///     .unwrap();
/// let second = registry
///     .set(&mut tree, v, role, LayoutConstraint::fixed(v, Attribute::Width, 20.0))
///     .unwrap();
///
/// // The old constraint was removed from the host.
/// assert!(tree.constraint(first).is_none());
/// assert_eq!(registry.get(&tree, v, role), Some(second));
/// assert_eq!(tree.constraints_on(v), &[second]);
/// ```
#[derive(Debug)]
pub struct ConstraintRegistry<V, C>
where
    V: Copy + Eq + Hash,
    C: Copy,
{
    entries: HashMap<(V, Role), C>,
}

impl<V, C> Default for ConstraintRegistry<V, C>
where
    V: Copy + Eq + Hash + Debug,
    C: Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> ConstraintRegistry<V, C>
where
    V: Copy + Eq + Hash + Debug,
    C: Copy + Debug,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Install `constraint` for `(view, role)`, replacing the tracked one.
    ///
    /// The previously tracked constraint, if any, is removed from the host first. If
    /// the host then rejects `constraint`, the key is left empty.
    pub fn set<H>(
        &mut self,
        host: &mut H,
        view: V,
        role: Role,
        constraint: LayoutConstraint<V>,
    ) -> Result<C, H::Error>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        if let Some(old) = self.entries.remove(&(view, role)) {
            host.remove_constraint(old);
        }
        let id = host.add_constraint(constraint)?;
        self.entries.insert((view, role), id);
        tracing::debug!(?view, ?role, constraint = ?id, "tracked constraint");
        Ok(id)
    }

    /// The constraint tracked for `(view, role)`, if the host still has it.
    #[must_use]
    pub fn get<H>(&self, host: &H, view: V, role: Role) -> Option<C>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.entries
            .get(&(view, role))
            .copied()
            .filter(|id| host.constraint(*id).is_some())
    }

    /// Remove the constraint tracked for `(view, role)` from the host.
    ///
    /// Returns `true` if the host removed a constraint. Clearing an absent key is a no-op.
    pub fn clear<H>(&mut self, host: &mut H, view: V, role: Role) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let Some(id) = self.entries.remove(&(view, role)) else {
            return false;
        };
        let removed = host.remove_constraint(id);
        if removed {
            tracing::debug!(?view, ?role, constraint = ?id, "cleared constraint");
        }
        removed
    }

    /// Clear every role tracked for `view`. Returns the number of constraints removed.
    pub fn clear_view<H>(&mut self, host: &mut H, view: V) -> usize
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        Role::ALL
            .into_iter()
            .filter(|role| self.clear(host, view, *role))
            .count()
    }

    /// Forget entries whose constraint the host has dropped. Returns how many were forgotten.
    pub fn prune<H>(&mut self, host: &H) -> usize
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let before = self.entries.len();
        self.entries.retain(|_, id| host.constraint(*id).is_some());
        let pruned = before - self.entries.len();
        if pruned > 0 {
            tracing::trace!(pruned, "pruned dropped constraints");
        }
        pruned
    }

    /// Number of tracked entries, including any the host has dropped since the last prune.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
