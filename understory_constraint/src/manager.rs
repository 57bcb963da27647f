// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Install and remove sizing and alignment constraints by role.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Size, Vec2};
use understory_view::{Anchor, Attribute, Axis, ConstraintHost, LayoutConstraint, ViewHierarchy};

use crate::error::ConstraintError;
use crate::registry::ConstraintRegistry;
use crate::role::{Role, dimension};

/// Result of a manager operation against host `H`.
pub type ConstraintResult<H> =
    Result<(), ConstraintError<<H as ViewHierarchy>::View, <H as ConstraintHost>::Error>>;

/// Installs and removes constraints for the sizing and alignment roles.
///
/// Every constraint the manager installs is tracked in its [`ConstraintRegistry`], so
/// installing a role again replaces the previous constraint and removal never touches
/// constraints added by anyone else. Per `(view, role)` the state is either absent or
/// installed; every operation is synchronous and idempotent.
///
/// Pairs (width and height, x and y) are installed together: when the host rejects
/// either constraint of a pair, both roles are left empty, including any pair that was
/// installed before the call.
#[derive(Debug)]
pub struct ConstraintManager<V, C>
where
    V: Copy + Eq + Hash,
    C: Copy,
{
    registry: ConstraintRegistry<V, C>,
}

impl<V, C> Default for ConstraintManager<V, C>
where
    V: Copy + Eq + Hash + Debug,
    C: Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> ConstraintManager<V, C>
where
    V: Copy + Eq + Hash + Debug,
    C: Copy + Debug,
{
    /// Creates a manager with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ConstraintRegistry::new(),
        }
    }

    /// The registry of constraints installed by this manager.
    #[must_use]
    pub fn registry(&self) -> &ConstraintRegistry<V, C> {
        &self.registry
    }

    /// Fix the width and height of `view` to `size`.
    pub fn constrain_to_size<H>(&mut self, host: &mut H, view: V, size: Size) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        ensure_alive(host, view)?;
        let [w, h] = Role::FIXED_SIZE;
        self.install_pair(
            host,
            view,
            (w, LayoutConstraint::fixed(view, Attribute::Width, size.width)),
            (h, LayoutConstraint::fixed(view, Attribute::Height, size.height)),
        )
    }

    /// Fix the width and height of `view` to the current size of its frame.
    ///
    /// The size is a snapshot; later frame changes do not update the constraints.
    pub fn constrain_to_current_frame_size<H>(&mut self, host: &mut H, view: V) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let node = host.node(view).ok_or(ConstraintError::UnknownView(view))?;
        self.constrain_to_size(host, view, node.frame.abs().size())
    }

    /// Update the fixed width and height of `view` in place.
    ///
    /// Returns `false` unless both fixed-size constraints are installed and were updated.
    pub fn set_size_constants<H>(&mut self, host: &mut H, view: V, size: Size) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let (Some(w), Some(h)) = self.extract_size_constraints(host, view) else {
            return false;
        };
        // Validate both before touching either.
        if !size.width.is_finite() || !size.height.is_finite() {
            return false;
        }
        host.set_constraint_constant(w, size.width) && host.set_constraint_constant(h, size.height)
    }

    /// The fixed `(width, height)` constraints installed for `view`, if any.
    #[must_use]
    pub fn extract_size_constraints<H>(&self, host: &H, view: V) -> (Option<C>, Option<C>)
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let [w, h] = Role::FIXED_SIZE;
        (
            self.registry.get(host, view, w),
            self.registry.get(host, view, h),
        )
    }

    /// Remove the fixed width and height of `view`. Returns `true` if anything was removed.
    pub fn remove_size_constraint<H>(&mut self, host: &mut H, view: V) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.clear_roles(host, view, Role::FIXED_SIZE)
    }

    /// Make `view` as wide and as tall as its superview.
    ///
    /// Fails with [`ConstraintError::NoParent`] when `view` has no superview.
    pub fn constrain_to_size_of_superview<H>(&mut self, host: &mut H, view: V) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let parent = superview(host, view)?;
        let [w, h] = Role::MATCH_SUPERVIEW_SIZE;
        let matching = |axis| {
            let attribute = dimension(axis);
            LayoutConstraint::equal(
                Anchor::new(view, attribute),
                Anchor::new(parent, attribute),
                0.0,
            )
        };
        self.install_pair(
            host,
            view,
            (w, matching(Axis::Horizontal)),
            (h, matching(Axis::Vertical)),
        )
    }

    /// Remove the size-matching constraints of `view`. Returns `true` if anything was removed.
    pub fn remove_size_constraint_to_superview<H>(&mut self, host: &mut H, view: V) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.clear_roles(host, view, Role::MATCH_SUPERVIEW_SIZE)
    }

    /// Align `x` and `y` of `view` with the same attributes of its superview.
    pub fn align_to_superview<H>(
        &mut self,
        host: &mut H,
        view: V,
        x: Attribute,
        y: Attribute,
    ) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.align_to_superview_with_offset(host, view, x, y, Vec2::ZERO)
    }

    /// Align `x` and `y` of `view` with its superview, offset by `offset`.
    ///
    /// Installs `view.x = superview.x + offset.x` and `view.y = superview.y + offset.y`.
    /// The attributes are not checked against their axis: passing a vertical attribute
    /// as `x` installs it under the horizontal alignment role.
    pub fn align_to_superview_with_offset<H>(
        &mut self,
        host: &mut H,
        view: V,
        x: Attribute,
        y: Attribute,
        offset: Vec2,
    ) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let parent = superview(host, view)?;
        let align = |attribute, constant| {
            LayoutConstraint::equal(
                Anchor::new(view, attribute),
                Anchor::new(parent, attribute),
                constant,
            )
        };
        self.install_pair(
            host,
            view,
            (Role::AlignX, align(x, offset.x)),
            (Role::AlignY, align(y, offset.y)),
        )
    }

    /// Remove both alignment constraints of `view`. Returns `true` if anything was removed.
    pub fn remove_alignment_constraints_to_superview<H>(&mut self, host: &mut H, view: V) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.clear_roles(host, view, Role::ALIGNMENT)
    }

    /// Remove every constraint this manager installed for `view`.
    pub fn clear_view<H>(&mut self, host: &mut H, view: V) -> usize
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.registry.clear_view(host, view)
    }

    /// Forget tracked constraints the host has dropped.
    pub fn prune<H>(&mut self, host: &H) -> usize
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        self.registry.prune(host)
    }

    fn install_pair<H>(
        &mut self,
        host: &mut H,
        view: V,
        (first_role, first): (Role, LayoutConstraint<V>),
        (second_role, second): (Role, LayoutConstraint<V>),
    ) -> ConstraintResult<H>
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let installed = match self.registry.set(host, view, first_role, first) {
            Ok(_) => self.registry.set(host, view, second_role, second),
            Err(err) => Err(err),
        };
        if let Err(err) = installed {
            // Neither the old nor the new pair survives a partial replacement.
            self.clear_roles(host, view, [first_role, second_role]);
            return Err(ConstraintError::Host(err));
        }
        Ok(())
    }

    fn clear_roles<H>(&mut self, host: &mut H, view: V, roles: [Role; 2]) -> bool
    where
        H: ConstraintHost<View = V, Constraint = C> + ?Sized,
    {
        let [a, b] = roles;
        let first = self.registry.clear(host, view, a);
        let second = self.registry.clear(host, view, b);
        first || second
    }
}

fn ensure_alive<H>(host: &H, view: H::View) -> ConstraintResult<H>
where
    H: ConstraintHost + ?Sized,
{
    match host.node(view) {
        Some(_) => Ok(()),
        None => Err(ConstraintError::UnknownView(view)),
    }
}

fn superview<H>(
    host: &H,
    view: H::View,
) -> Result<H::View, ConstraintError<H::View, H::Error>>
where
    H: ConstraintHost + ?Sized,
{
    ensure_alive(host, view)?;
    host.parent(view).ok_or_else(|| {
        tracing::debug!(?view, "no superview to constrain against");
        ConstraintError::NoParent(view)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use understory_view::{ConstraintId, ViewError, ViewId, ViewNode, ViewTree};

    fn setup() -> (ViewTree, ViewId, ViewId, ConstraintManager<ViewId, ConstraintId>) {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 200.0, 100.0)));
        let v = tree.insert(Some(root), ViewNode::with_frame(Rect::new(0.0, 0.0, 30.0, 40.0)));
        (tree, root, v, ConstraintManager::new())
    }

    #[test]
    fn current_frame_size_is_a_snapshot() {
        let (mut tree, _, v, mut manager) = setup();
        manager.constrain_to_current_frame_size(&mut tree, v).unwrap();
        tree.set_frame(v, Rect::new(0.0, 0.0, 1.0, 1.0));

        let (w, h) = manager.extract_size_constraints(&tree, v);
        assert_eq!(tree.constraint(w.unwrap()).unwrap().constant, 30.0);
        assert_eq!(tree.constraint(h.unwrap()).unwrap().constant, 40.0);
    }

    #[test]
    fn set_size_constants_updates_in_place() {
        let (mut tree, _, v, mut manager) = setup();
        assert!(!manager.set_size_constants(&mut tree, v, Size::new(1.0, 1.0)));

        manager
            .constrain_to_size(&mut tree, v, Size::new(10.0, 20.0))
            .unwrap();
        let before = manager.extract_size_constraints(&tree, v);
        assert!(manager.set_size_constants(&mut tree, v, Size::new(11.0, 21.0)));
        assert_eq!(manager.extract_size_constraints(&tree, v), before, "same handles");
        assert_eq!(tree.constraint(before.1.unwrap()).unwrap().constant, 21.0);

        assert!(!manager.set_size_constants(&mut tree, v, Size::new(f64::NAN, 1.0)));
        assert_eq!(tree.constraint(before.0.unwrap()).unwrap().constant, 11.0);
    }

    #[test]
    fn stale_view_is_reported_before_anything_is_installed() {
        let (mut tree, _, v, mut manager) = setup();
        tree.remove(v);
        assert_eq!(
            manager.constrain_to_size(&mut tree, v, Size::new(1.0, 1.0)),
            Err(ConstraintError::UnknownView(v))
        );
        assert_eq!(
            manager.align_to_superview(&mut tree, v, Attribute::Leading, Attribute::Top),
            Err(ConstraintError::UnknownView(v))
        );
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn rejected_second_constraint_rolls_back_the_first() {
        let (mut tree, _, v, mut manager) = setup();
        let err = manager
            .constrain_to_size(&mut tree, v, Size::new(10.0, f64::INFINITY))
            .unwrap_err();
        assert_eq!(err, ConstraintError::Host(ViewError::NonFiniteConstant));
        assert_eq!(manager.extract_size_constraints(&tree, v), (None, None));
        assert!(tree.constraints_on(v).is_empty());
    }

    #[test]
    fn rejected_replacement_clears_the_whole_pair() {
        let (mut tree, root, v, mut manager) = setup();
        manager
            .constrain_to_size(&mut tree, v, Size::new(10.0, 20.0))
            .unwrap();
        let err = manager
            .constrain_to_size(&mut tree, v, Size::new(f64::NAN, 30.0))
            .unwrap_err();
        assert_eq!(err, ConstraintError::Host(ViewError::NonFiniteConstant));
        assert_eq!(manager.extract_size_constraints(&tree, v), (None, None));
        assert!(tree.constraints_on(v).is_empty(), "old height was removed too");

        manager
            .align_to_superview(&mut tree, v, Attribute::Leading, Attribute::Top)
            .unwrap();
        assert!(
            manager
                .align_to_superview_with_offset(
                    &mut tree,
                    v,
                    Attribute::Leading,
                    Attribute::Top,
                    Vec2::new(f64::INFINITY, 3.0),
                )
                .is_err()
        );
        assert_eq!(manager.registry().get(&tree, v, Role::AlignX), None);
        assert_eq!(manager.registry().get(&tree, v, Role::AlignY), None);
        assert!(tree.constraints_on(root).is_empty());
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn alignment_uses_offsets_and_installs_on_the_superview() {
        let (mut tree, root, v, mut manager) = setup();
        manager
            .align_to_superview_with_offset(
                &mut tree,
                v,
                Attribute::Trailing,
                Attribute::CenterY,
                Vec2::new(-8.0, 2.0),
            )
            .unwrap();

        let x = manager.registry().get(&tree, v, Role::AlignX).unwrap();
        let c = tree.constraint(x).unwrap();
        assert_eq!(c.first, Anchor::new(v, Attribute::Trailing));
        assert_eq!(c.second, Some(Anchor::new(root, Attribute::Trailing)));
        assert_eq!(c.constant, -8.0);
        assert_eq!(tree.constraints_on(root).len(), 2);

        tree.layout(root);
        assert_eq!(tree.frame(v), Some(Rect::new(162.0, 32.0, 192.0, 72.0)));
    }

    #[test]
    fn roles_are_independent() {
        let (mut tree, _, v, mut manager) = setup();
        manager
            .constrain_to_size(&mut tree, v, Size::new(5.0, 5.0))
            .unwrap();
        manager.constrain_to_size_of_superview(&mut tree, v).unwrap();
        manager
            .align_to_superview(&mut tree, v, Attribute::Leading, Attribute::Top)
            .unwrap();
        assert_eq!(manager.registry().len(), 6);

        assert!(manager.remove_size_constraint_to_superview(&mut tree, v));
        assert!(manager.extract_size_constraints(&tree, v).0.is_some());
        assert_eq!(manager.clear_view(&mut tree, v), 4);
        assert!(manager.registry().is_empty());
    }
}
