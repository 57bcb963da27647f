// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_constraint` crate.
//!
//! These drive `ConstraintManager` against a real `ViewTree` and check the tracked
//! state, the constraints the host ends up with, and the frames a layout pass produces.

use kurbo::{Rect, Size, Vec2};
use understory_constraint::{ConstraintError, ConstraintManager, Role};
use understory_view::{Attribute, Axis, ConstraintId, LayoutConstraint, ViewId, ViewNode, ViewTree};

fn window() -> (ViewTree, ViewId) {
    let mut tree = ViewTree::new();
    let root = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 400.0, 300.0)));
    (tree, root)
}

fn manager() -> ConstraintManager<ViewId, ConstraintId> {
    ConstraintManager::new()
}

#[test]
fn extracted_size_constraints_carry_the_requested_size() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let mut manager = manager();

    manager
        .constrain_to_size(&mut tree, v, Size::new(120.0, 45.0))
        .unwrap();

    let (w, h) = manager.extract_size_constraints(&tree, v);
    let w = tree.constraint(w.expect("width tracked")).unwrap();
    let h = tree.constraint(h.expect("height tracked")).unwrap();
    assert_eq!(w, LayoutConstraint::fixed(v, Attribute::Width, 120.0));
    assert_eq!(h, LayoutConstraint::fixed(v, Attribute::Height, 45.0));
}

#[test]
fn removing_size_constraints_leaves_nothing_to_extract() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let mut manager = manager();

    manager
        .constrain_to_size(&mut tree, v, Size::new(1.0, 2.0))
        .unwrap();
    assert!(manager.remove_size_constraint(&mut tree, v));

    assert_eq!(manager.extract_size_constraints(&tree, v), (None, None));
    assert!(tree.constraints_on(v).is_empty());
    assert!(!manager.remove_size_constraint(&mut tree, v), "second removal is a no-op");
}

#[test]
fn removing_alignment_twice_equals_once() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let mut manager = manager();
    manager
        .align_to_superview(&mut tree, v, Attribute::Leading, Attribute::Top)
        .unwrap();

    assert!(manager.remove_alignment_constraints_to_superview(&mut tree, v));
    let after_once = (manager.registry().len(), tree.constraints_on(root).len());
    assert!(!manager.remove_alignment_constraints_to_superview(&mut tree, v));
    let after_twice = (manager.registry().len(), tree.constraints_on(root).len());

    assert_eq!(after_once, (0, 0));
    assert_eq!(after_once, after_twice);
}

#[test]
fn aligning_a_root_fails_without_installing_anything() {
    let (mut tree, root) = window();
    let mut manager = manager();

    let result = manager.align_to_superview_with_offset(
        &mut tree,
        root,
        Attribute::Leading,
        Attribute::Top,
        Vec2::new(10.0, 5.0),
    );
    assert_eq!(result, Err(ConstraintError::NoParent(root)));
    assert_eq!(
        manager.constrain_to_size_of_superview(&mut tree, root),
        Err(ConstraintError::NoParent(root))
    );
    assert!(manager.registry().is_empty());
    assert!(tree.constraints_on(root).is_empty());
}

#[test]
fn matching_superview_twice_tracks_one_constraint_per_dimension() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let mut manager = manager();

    manager.constrain_to_size_of_superview(&mut tree, v).unwrap();
    manager.constrain_to_size_of_superview(&mut tree, v).unwrap();

    assert_eq!(manager.registry().len(), 2);
    assert_eq!(tree.constraints_on(root).len(), 2, "old pair was removed from the host");
    for axis in [Axis::Horizontal, Axis::Vertical] {
        assert!(
            manager
                .registry()
                .get(&tree, v, Role::MatchSuperviewSize(axis))
                .is_some()
        );
    }

    tree.layout(root);
    assert_eq!(tree.frame(v), Some(Rect::new(0.0, 0.0, 400.0, 300.0)));
    assert!(manager.remove_size_constraint_to_superview(&mut tree, v));
    assert!(tree.constraints_on(root).is_empty());
}

#[test]
fn externally_added_constraints_are_preserved() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let external = tree
        .add_constraint(LayoutConstraint::fixed(v, Attribute::Width, 99.0))
        .unwrap();
    let mut manager = manager();

    manager
        .constrain_to_size(&mut tree, v, Size::new(10.0, 10.0))
        .unwrap();
    manager.remove_size_constraint(&mut tree, v);

    assert_eq!(tree.constraints_on(v), &[external]);
}

#[test]
fn detaching_a_view_drops_its_superview_constraints() {
    let (mut tree, root) = window();
    let v = tree.insert(Some(root), ViewNode::default());
    let mut manager = manager();
    manager
        .align_to_superview(&mut tree, v, Attribute::CenterX, Attribute::CenterY)
        .unwrap();
    manager
        .constrain_to_size(&mut tree, v, Size::new(10.0, 10.0))
        .unwrap();

    tree.remove_from_parent(v);

    assert_eq!(manager.registry().get(&tree, v, Role::AlignX), None);
    assert_eq!(manager.registry().get(&tree, v, Role::AlignY), None);
    let (w, h) = manager.extract_size_constraints(&tree, v);
    assert!(w.is_some() && h.is_some(), "fixed sizes live on the view itself");
    assert_eq!(manager.prune(&tree), 2);
    assert_eq!(manager.registry().len(), 2);

    // Re-attach and align again: nothing stale is left behind.
    tree.add_child(root, v).unwrap();
    manager
        .align_to_superview(&mut tree, v, Attribute::CenterX, Attribute::CenterY)
        .unwrap();
    tree.layout(root);
    assert_eq!(tree.frame(v), Some(Rect::new(195.0, 145.0, 205.0, 155.0)));
}

#[test]
fn size_and_alignment_compose_in_layout() {
    let (mut tree, root) = window();
    let panel = tree.insert(Some(root), ViewNode::default());
    let badge = tree.insert(Some(panel), ViewNode::default());
    let mut manager = manager();

    manager.constrain_to_size_of_superview(&mut tree, panel).unwrap();
    manager
        .constrain_to_size(&mut tree, badge, Size::new(16.0, 16.0))
        .unwrap();
    manager
        .align_to_superview_with_offset(
            &mut tree,
            badge,
            Attribute::Trailing,
            Attribute::Top,
            Vec2::new(-4.0, 4.0),
        )
        .unwrap();

    assert_eq!(tree.layout(root), 2);
    assert_eq!(tree.frame(panel), Some(Rect::new(0.0, 0.0, 400.0, 300.0)));
    assert_eq!(tree.frame(badge), Some(Rect::new(380.0, 4.0, 396.0, 20.0)));

    tree.set_frame(root, Rect::new(0.0, 0.0, 200.0, 100.0));
    tree.layout(root);
    assert_eq!(tree.frame(badge), Some(Rect::new(180.0, 4.0, 196.0, 20.0)));
}
