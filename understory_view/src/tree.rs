// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view tree: slot storage for views and installed constraints.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};
use smallvec::SmallVec;

use crate::error::ViewError;
use crate::host::{ConstraintHost, PresentationHost, ViewHierarchy};
use crate::types::{ConstraintId, LayoutConstraint, ViewFlags, ViewId, ViewNode};

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Clone, Debug)]
pub(crate) struct ViewData {
    pub(crate) local: ViewNode,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: SmallVec<[ViewId; 4]>,
    /// Constraints installed on this view (it is the nearest common ancestor of their endpoints).
    pub(crate) constraints: SmallVec<[ConstraintId; 4]>,
}

#[derive(Clone, Debug)]
struct Installed {
    constraint: LayoutConstraint<ViewId>,
    owner: ViewId,
}

/// Allocate a slot, reusing a freed one when available. Returns `(index, generation)`.
fn alloc_slot<T>(slots: &mut Vec<Slot<T>>, free: &mut Vec<u32>, value: T) -> (u32, u32) {
    if let Some(idx) = free.pop() {
        let slot = &mut slots[idx as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.value = Some(value);
        return (idx, slot.generation);
    }
    assert!(slots.len() < u32::MAX as usize, "slot index overflow");
    #[expect(clippy::cast_possible_truncation, reason = "checked above")]
    let idx = slots.len() as u32;
    slots.push(Slot {
        generation: 1,
        value: Some(value),
    });
    (idx, 1)
}

fn slot_get<T>(slots: &[Slot<T>], idx: usize, generation: u32) -> Option<&T> {
    let slot = slots.get(idx)?;
    if slot.generation != generation {
        return None;
    }
    slot.value.as_ref()
}

fn slot_get_mut<T>(slots: &mut [Slot<T>], idx: usize, generation: u32) -> Option<&mut T> {
    let slot = slots.get_mut(idx)?;
    if slot.generation != generation {
        return None;
    }
    slot.value.as_mut()
}

fn references(constraint: &LayoutConstraint<ViewId>, views: &[ViewId]) -> bool {
    views.contains(&constraint.first.view)
        || constraint
            .second
            .is_some_and(|second| views.contains(&second.view))
}

/// A headless view hierarchy.
///
/// Owns per-view [`ViewNode`] state, parent/child links (children in paint order,
/// last is top-most), and the layout constraints installed on each view.
///
/// A constraint is installed on the nearest common ancestor of its endpoints.
/// Detaching a subtree drops every constraint that relates a view inside the
/// subtree to one outside of it.
///
/// ```
/// use kurbo::Rect;
/// use understory_view::{ViewNode, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let root = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
/// let child = tree.insert(Some(root), ViewNode::with_frame(Rect::new(10.0, 10.0, 60.0, 40.0)));
///
/// assert_eq!(tree.parent(child), Some(root));
/// assert_eq!(tree.children(root), &[child]);
///
/// assert!(tree.remove_from_parent(child));
/// assert!(tree.children(root).is_empty());
/// assert!(tree.is_alive(child));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ViewTree {
    views: Vec<Slot<ViewData>>,
    free_views: Vec<u32>,
    constraints: Vec<Slot<Installed>>,
    free_constraints: Vec<u32>,
}

impl ViewTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn data(&self, id: ViewId) -> Option<&ViewData> {
        slot_get(&self.views, id.idx(), id.1)
    }

    fn data_mut(&mut self, id: ViewId) -> Option<&mut ViewData> {
        slot_get_mut(&mut self.views, id.idx(), id.1)
    }

    fn with_local(&mut self, id: ViewId, f: impl FnOnce(&mut ViewNode)) -> bool {
        let Some(data) = self.data_mut(id) else {
            return false;
        };
        f(&mut data.local);
        true
    }

    /// Returns `true` if `id` refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.data(id).is_some()
    }

    /// Number of live views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len() - self.free_views.len()
    }

    /// Returns `true` if the tree holds no live views.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new view, optionally as the top-most child of `parent`.
    ///
    /// A stale `parent` leaves the new view detached.
    pub fn insert(&mut self, parent: Option<ViewId>, node: ViewNode) -> ViewId {
        let data = ViewData {
            local: node,
            parent: None,
            children: SmallVec::new(),
            constraints: SmallVec::new(),
        };
        let (idx, generation) = alloc_slot(&mut self.views, &mut self.free_views, data);
        let id = ViewId::new(idx, generation);
        if let Some(parent) = parent {
            if let Some(p) = self.data_mut(parent) {
                p.children.push(id);
                if let Some(d) = self.data_mut(id) {
                    d.parent = Some(parent);
                }
            } else {
                tracing::warn!(?parent, view = ?id, "insert under stale parent; view left detached");
            }
        }
        id
    }

    /// Remove a view and its whole subtree, along with every constraint that refers to them.
    ///
    /// Returns `false` if `id` was already stale.
    pub fn remove(&mut self, id: ViewId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.remove_from_parent(id);

        let mut stack: Vec<ViewId> = Vec::new();
        stack.push(id);
        while let Some(view) = stack.pop() {
            let Some(slot) = self.views.get_mut(view.idx()) else {
                continue;
            };
            let Some(data) = slot.value.take() else {
                continue;
            };
            self.free_views.push(view.0);
            for constraint in data.constraints {
                self.free_constraint(constraint);
            }
            stack.extend(data.children);
        }
        tracing::trace!(view = ?id, "removed subtree");
        true
    }

    /// Parent of `id`, or `None` for roots and stale handles.
    #[must_use]
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.data(id)?.parent
    }

    /// Children of `id` in paint order (last is top-most). Empty for stale handles.
    #[must_use]
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.data(id)
            .map(|d| d.children.as_slice())
            .unwrap_or(&[])
    }

    /// The root of the hierarchy containing `id`.
    #[must_use]
    pub fn root_of(&self, id: ViewId) -> Option<ViewId> {
        let mut current = id;
        if !self.is_alive(current) {
            return None;
        }
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Returns `true` if `ancestor` is `view` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut current = Some(view);
        while let Some(v) = current {
            if v == ancestor {
                return true;
            }
            current = self.parent(v);
        }
        false
    }

    /// Nearest view that is an ancestor (or self) of both `a` and `b`.
    #[must_use]
    pub fn common_ancestor(&self, a: ViewId, b: ViewId) -> Option<ViewId> {
        if !self.is_alive(a) || !self.is_alive(b) {
            return None;
        }
        let mut chain: SmallVec<[ViewId; 16]> = SmallVec::new();
        let mut current = Some(a);
        while let Some(v) = current {
            chain.push(v);
            current = self.parent(v);
        }
        let mut current = Some(b);
        while let Some(v) = current {
            if chain.contains(&v) {
                return Some(v);
            }
            current = self.parent(v);
        }
        None
    }

    /// Insert `child` as the top-most child of `parent`.
    ///
    /// If `child` already has a different parent it is detached first, which drops
    /// constraints crossing the cut. Re-adding a child to its current parent only
    /// moves it to the top.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<(), ViewError> {
        if !self.is_alive(parent) {
            return Err(ViewError::StaleView(parent));
        }
        if !self.is_alive(child) {
            return Err(ViewError::StaleView(child));
        }
        if parent == child {
            return Err(ViewError::SameView(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(ViewError::WouldCycle { parent, child });
        }

        if self.parent(child) == Some(parent) {
            if let Some(p) = self.data_mut(parent) {
                p.children.retain(|c| *c != child);
                p.children.push(child);
            }
            return Ok(());
        }

        self.remove_from_parent(child);
        if let Some(p) = self.data_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.data_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach `child` from its parent, keeping it (and its subtree) alive as a root.
    ///
    /// Constraints installed above the cut that refer to any view in the detached
    /// subtree are dropped. Returns `false` if `child` had no parent.
    pub fn remove_from_parent(&mut self, child: ViewId) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        if let Some(p) = self.data_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.data_mut(child) {
            c.parent = None;
        }

        let subtree = self.subtree(child);
        let mut dropped = 0_usize;
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            let crossing: SmallVec<[ConstraintId; 4]> = self
                .constraints_on(ancestor)
                .iter()
                .copied()
                .filter(|id| {
                    self.constraint(*id)
                        .is_some_and(|c| references(&c, &subtree))
                })
                .collect();
            for id in crossing {
                self.remove_constraint(id);
                dropped += 1;
            }
            current = self.parent(ancestor);
        }
        if dropped > 0 {
            tracing::debug!(view = ?child, dropped, "dropped constraints crossing detached subtree");
        }
        true
    }

    /// Detach every child of `parent`. Returns how many were detached.
    pub fn remove_children(&mut self, parent: ViewId) -> usize {
        let children: SmallVec<[ViewId; 8]> = self.children(parent).iter().copied().collect();
        for child in &children {
            self.remove_from_parent(*child);
        }
        children.len()
    }

    /// Detach every child of `parent` except `keep`. Returns how many were detached.
    pub fn remove_children_except(&mut self, parent: ViewId, keep: ViewId) -> usize {
        let children: SmallVec<[ViewId; 8]> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|c| *c != keep)
            .collect();
        for child in &children {
            self.remove_from_parent(*child);
        }
        children.len()
    }

    /// `id` and all of its descendants, depth first.
    fn subtree(&self, id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut stack: Vec<ViewId> = Vec::new();
        stack.push(id);
        while let Some(view) = stack.pop() {
            out.push(view);
            stack.extend(self.children(view).iter().copied());
        }
        out
    }

    /// Local state of `id`.
    #[must_use]
    pub fn node(&self, id: ViewId) -> Option<ViewNode> {
        self.data(id).map(|d| d.local)
    }

    /// Replace the local state of `id`. Returns `false` for stale handles.
    pub fn set_node(&mut self, id: ViewId, node: ViewNode) -> bool {
        self.with_local(id, |n| *n = node)
    }

    /// Frame of `id` in its parent's content space.
    #[must_use]
    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.data(id).map(|d| d.local.frame)
    }

    /// Set the frame of `id`. Returns `false` for stale handles.
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> bool {
        self.with_local(id, |n| n.frame = frame)
    }

    /// Transform of `id`.
    #[must_use]
    pub fn transform(&self, id: ViewId) -> Option<Affine> {
        self.data(id).map(|d| d.local.transform)
    }

    /// Set the transform of `id`. Returns `false` for stale handles.
    pub fn set_transform(&mut self, id: ViewId, transform: Affine) -> bool {
        self.with_local(id, |n| n.transform = transform)
    }

    /// Opacity of `id`.
    #[must_use]
    pub fn alpha(&self, id: ViewId) -> Option<f64> {
        self.data(id).map(|d| d.local.alpha)
    }

    /// Set the opacity of `id`, clamped to `[0, 1]`. NaN is treated as `0`.
    pub fn set_alpha(&mut self, id: ViewId, alpha: f64) -> bool {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        self.with_local(id, |n| n.alpha = alpha)
    }

    /// Flags of `id`.
    #[must_use]
    pub fn flags(&self, id: ViewId) -> Option<ViewFlags> {
        self.data(id).map(|d| d.local.flags)
    }

    /// Replace the flags of `id`. Returns `false` for stale handles.
    pub fn set_flags(&mut self, id: ViewId, flags: ViewFlags) -> bool {
        self.with_local(id, |n| n.flags = flags)
    }

    /// Set or clear [`ViewFlags::HIDDEN`] on `id`.
    pub fn set_hidden(&mut self, id: ViewId, hidden: bool) -> bool {
        self.with_local(id, |n| n.flags.set(ViewFlags::HIDDEN, hidden))
    }

    /// Install a constraint on the nearest common ancestor of its endpoints.
    pub fn add_constraint(
        &mut self,
        constraint: LayoutConstraint<ViewId>,
    ) -> Result<ConstraintId, ViewError> {
        if !constraint.constant.is_finite() {
            return Err(ViewError::NonFiniteConstant);
        }
        let first = constraint.first.view;
        if !self.is_alive(first) {
            return Err(ViewError::StaleView(first));
        }
        let owner = match constraint.second {
            None => first,
            Some(second) => {
                if !self.is_alive(second.view) {
                    return Err(ViewError::StaleView(second.view));
                }
                self.common_ancestor(first, second.view)
                    .ok_or(ViewError::NoCommonAncestor(first, second.view))?
            }
        };

        let (idx, generation) = alloc_slot(
            &mut self.constraints,
            &mut self.free_constraints,
            Installed { constraint, owner },
        );
        let id = ConstraintId::new(idx, generation);
        if let Some(d) = self.data_mut(owner) {
            d.constraints.push(id);
        }
        tracing::trace!(constraint = ?id, ?owner, "installed constraint");
        Ok(id)
    }

    /// Remove an installed constraint. Returns `false` if it was already gone.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        let Some(installed) = slot_get(&self.constraints, id.idx(), id.1) else {
            return false;
        };
        let owner = installed.owner;
        if let Some(d) = self.data_mut(owner) {
            d.constraints.retain(|c| *c != id);
        }
        self.free_constraint(id);
        true
    }

    fn free_constraint(&mut self, id: ConstraintId) {
        if let Some(slot) = self.constraints.get_mut(id.idx())
            && slot.generation == id.1
            && slot.value.take().is_some()
        {
            self.free_constraints.push(id.0);
        }
    }

    /// Look up an installed constraint.
    #[must_use]
    pub fn constraint(&self, id: ConstraintId) -> Option<LayoutConstraint<ViewId>> {
        slot_get(&self.constraints, id.idx(), id.1).map(|i| i.constraint)
    }

    /// Replace the constant of an installed constraint.
    ///
    /// Returns `false` if the constraint is gone or `constant` is not finite.
    pub fn set_constraint_constant(&mut self, id: ConstraintId, constant: f64) -> bool {
        if !constant.is_finite() {
            return false;
        }
        let Some(installed) = slot_get_mut(&mut self.constraints, id.idx(), id.1) else {
            return false;
        };
        installed.constraint.constant = constant;
        true
    }

    /// Constraints installed on `id`, in installation order.
    #[must_use]
    pub fn constraints_on(&self, id: ViewId) -> &[ConstraintId] {
        self.data(id)
            .map(|d| d.constraints.as_slice())
            .unwrap_or(&[])
    }
}

impl ViewHierarchy for ViewTree {
    type View = ViewId;

    fn parent(&self, view: ViewId) -> Option<ViewId> {
        Self::parent(self, view)
    }

    fn node(&self, view: ViewId) -> Option<ViewNode> {
        Self::node(self, view)
    }
}

impl ConstraintHost for ViewTree {
    type Constraint = ConstraintId;
    type Error = ViewError;

    fn add_constraint(
        &mut self,
        constraint: LayoutConstraint<ViewId>,
    ) -> Result<ConstraintId, ViewError> {
        Self::add_constraint(self, constraint)
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        Self::remove_constraint(self, id)
    }

    fn constraint(&self, id: ConstraintId) -> Option<LayoutConstraint<ViewId>> {
        Self::constraint(self, id)
    }

    fn set_constraint_constant(&mut self, id: ConstraintId, constant: f64) -> bool {
        Self::set_constraint_constant(self, id, constant)
    }
}

impl PresentationHost for ViewTree {
    type Error = ViewError;

    fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<(), ViewError> {
        Self::add_child(self, parent, child)
    }

    fn remove_from_parent(&mut self, view: ViewId) -> bool {
        Self::remove_from_parent(self, view)
    }

    fn set_alpha(&mut self, view: ViewId, alpha: f64) {
        Self::set_alpha(self, view, alpha);
    }

    fn set_transform(&mut self, view: ViewId, transform: Affine) {
        Self::set_transform(self, view, transform);
    }
}
