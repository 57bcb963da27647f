// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_presentation` crate.
//!
//! These run presentations against a real `ViewTree`, sizing the presented view with
//! `understory_constraint` and checking what is on screen with `understory_visibility`.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Affine, Rect, Size, Vec2};
use understory_constraint::ConstraintManager;
use understory_presentation::{PresentationController, TransitionConfig, TransitionStyle};
use understory_view::{Attribute, ConstraintId, ViewId, ViewNode, ViewTree};
use understory_visibility::{is_at_least_half_viewable, is_viewable, projected_frame};

fn screen() -> (ViewTree, ViewId) {
    let mut tree = ViewTree::new();
    let root = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
    (tree, root)
}

#[test]
fn immediate_present_then_dismiss_leaves_no_trace() {
    let (mut tree, root) = screen();
    let sheet = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 100.0, 100.0)));
    let mut presenter = PresentationController::new();

    presenter.present(&mut tree, sheet, root, false).unwrap();
    assert_eq!(tree.parent(sheet), Some(root));
    assert!(presenter.dismiss(&mut tree, sheet, false));

    assert!(!tree.children(root).contains(&sheet));
    assert_eq!(tree.parent(sheet), None);
    assert_eq!(presenter.presenting_view(sheet), None);
    assert!(presenter.is_empty());
}

#[test]
fn presented_view_goes_on_top_of_existing_children() {
    let (mut tree, root) = screen();
    let content = tree.insert(Some(root), ViewNode::default());
    let sheet = tree.insert(None, ViewNode::default());
    let mut presenter = PresentationController::new();

    presenter.present(&mut tree, sheet, root, false).unwrap();
    assert_eq!(tree.children(root), &[content, sheet]);
}

#[test]
fn fade_in_becomes_viewable_once_it_starts_and_completes_once() {
    let (mut tree, root) = screen();
    let toast = tree.insert(None, ViewNode::with_frame(Rect::new(10.0, 400.0, 310.0, 460.0)));
    let mut presenter = PresentationController::with_config(TransitionConfig {
        duration: 300,
        style: TransitionStyle::Fade,
    });
    let calls = Rc::new(Cell::new(0_u32));
    let seen = calls.clone();

    presenter
        .present_with(
            &mut tree,
            toast,
            root,
            true,
            Some(Box::new(move |ok: bool| {
                assert!(ok, "presentation finished");
                seen.set(seen.get() + 1);
            })),
        )
        .unwrap();
    assert!(!is_viewable(&tree, toast), "fully transparent before the first frame");

    presenter.advance(&mut tree, 0);
    presenter.advance(&mut tree, 100);
    assert!(is_viewable(&tree, toast));
    assert!(presenter.is_transitioning(toast));

    presenter.advance(&mut tree, 300);
    presenter.advance(&mut tree, 400);
    assert_eq!(calls.get(), 1);
    assert!(is_at_least_half_viewable(&tree, toast));
}

#[test]
fn animated_dismiss_detaches_when_the_transition_ends() {
    let (mut tree, root) = screen();
    let sheet = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 240.0)));
    let mut presenter = PresentationController::with_config(TransitionConfig {
        duration: 100,
        style: TransitionStyle::Scale { from: 0.5 },
    });
    presenter.present(&mut tree, sheet, root, false).unwrap();

    presenter.dismiss(&mut tree, sheet, true);
    presenter.advance(&mut tree, 1_000);
    presenter.advance(&mut tree, 1_050);
    assert_eq!(tree.parent(sheet), Some(root), "still attached mid-transition");
    assert_eq!(presenter.transition_progress(sheet), Some(0.5));
    assert_eq!(
        projected_frame(&tree, sheet),
        Some(Rect::new(40.0, 30.0, 280.0, 210.0)),
        "scaled to 0.75 about the center"
    );

    presenter.advance(&mut tree, 1_100);
    assert_eq!(tree.parent(sheet), None);
    assert_eq!(tree.transform(sheet), Some(Affine::IDENTITY));
    assert!(!presenter.is_presented(sheet));
}

#[test]
fn presented_view_sized_by_constraints() {
    let (mut tree, root) = screen();
    let overlay = tree.insert(None, ViewNode::default());
    let card = tree.insert(Some(overlay), ViewNode::default());
    let mut presenter = PresentationController::new();
    let mut constraints: ConstraintManager<ViewId, ConstraintId> = ConstraintManager::new();

    presenter.present(&mut tree, overlay, root, false).unwrap();
    constraints
        .constrain_to_size_of_superview(&mut tree, overlay)
        .unwrap();
    constraints
        .constrain_to_size(&mut tree, card, Size::new(200.0, 120.0))
        .unwrap();
    constraints
        .align_to_superview_with_offset(
            &mut tree,
            card,
            Attribute::CenterX,
            Attribute::Bottom,
            Vec2::new(0.0, 60.0),
        )
        .unwrap();
    tree.layout(root);

    assert_eq!(tree.frame(overlay), Some(Rect::new(0.0, 0.0, 320.0, 480.0)));
    assert_eq!(tree.frame(card), Some(Rect::new(60.0, 420.0, 260.0, 540.0)));
    assert!(is_viewable(&tree, card));
    assert!(is_at_least_half_viewable(&tree, card), "exactly half below the edge");

    // Dismissing detaches the overlay; the host drops the constraints that matched it
    // to the screen, while the card's own constraints stay.
    presenter.dismiss(&mut tree, overlay, false);
    assert_eq!(constraints.prune(&tree), 2);
    assert_eq!(constraints.registry().len(), 4);
    assert_eq!(tree.root_of(card), Some(overlay));
}

#[test]
fn presenting_over_a_descendant_is_rejected() {
    let (mut tree, root) = screen();
    let sheet = tree.insert(None, ViewNode::default());
    let inner = tree.insert(Some(sheet), ViewNode::default());
    let mut presenter = PresentationController::new();

    assert!(presenter.present(&mut tree, sheet, inner, false).is_err());
    assert!(!presenter.is_presented(sheet));
    assert_eq!(tree.parent(sheet), None);
    presenter.present(&mut tree, sheet, root, false).unwrap();
    assert_eq!(presenter.presented_views(root).collect::<Vec<_>>(), [sheet]);
}
