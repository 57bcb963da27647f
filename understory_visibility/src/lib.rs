// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_visibility --heading-base-level=0

//! Understory Visibility: is a view on screen, and how much of it?
//!
//! The functions here walk a view's ancestor chain (child → parent → … → root) through
//! any [`ViewHierarchy`] host and project the view's frame into the root's content space.
//!
//! - [`is_viewable`]: the projected frame overlaps the root bounds, and neither the view
//!   nor any ancestor is hidden, fully transparent, or (for ancestors) zero-sized.
//! - [`is_at_least_half_viewable`]: the visible area is at least half of the view's own
//!   frame area. A zero-area frame is never half-viewable.
//! - [`projected_frame`], [`visible_rect`], [`visible_fraction`]: the underlying geometry.
//!
//! The root is the top of the ancestor chain; its frame is its screen rectangle and
//! defines the visible bounds. Ancestors with [`ViewFlags::CLIPS_TO_BOUNDS`] also clip.
//! Sibling occlusion is not considered.
//!
//! Everything is pure and allocation-free; nothing is cached, so callers decide how often
//! to poll.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_view::{ViewNode, ViewTree};
//! use understory_visibility::{is_at_least_half_viewable, is_viewable, visible_rect};
//!
//! let mut tree = ViewTree::new();
//! let screen = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! let ad = tree.insert(Some(screen), ViewNode::with_frame(Rect::new(50.0, 0.0, 150.0, 100.0)));
//!
//! assert!(is_viewable(&tree, ad));
//! // Exactly half of the frame is on screen.
//! assert!(is_at_least_half_viewable(&tree, ad));
//! assert_eq!(visible_rect(&tree, ad), Some(Rect::new(50.0, 0.0, 100.0, 100.0)));
//!
//! tree.set_hidden(screen, true);
//! assert!(!is_viewable(&tree, ad));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Affine, Rect, Vec2};
use understory_view::{ViewFlags, ViewHierarchy, ViewNode};

/// Result of walking the ancestor chain for a displayable view.
#[derive(Clone, Copy, Debug)]
struct Projection {
    /// Frame in root content space, before any clipping.
    projected: Rect,
    /// Part of `projected` left after ancestor clips and the root bounds.
    visible: Rect,
    /// Area of the view's own (unprojected) frame.
    own_area: f64,
}

fn project<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> Option<Projection> {
    let node = host.node(view)?;
    if !node.is_displayed() {
        return None;
    }
    let frame = node.frame.abs();
    let own_area = frame.area();

    let Some(mut parent) = host.parent(view) else {
        // A root is its own screen rectangle.
        return Some(Projection {
            projected: frame,
            visible: frame,
            own_area,
        });
    };

    // `rect` is expressed in the content space of `parent`; `clip` accumulates
    // ancestor clips in the same space.
    let mut rect = node.transform.transform_rect_bbox(frame);
    let mut clip: Option<Rect> = None;
    loop {
        let ancestor = host.node(parent)?;
        if disqualifies(&ancestor) {
            return None;
        }
        let bounds = ancestor.bounds();
        if ancestor.flags.contains(ViewFlags::CLIPS_TO_BOUNDS) {
            clip = Some(clip.map_or(bounds, |c| c.intersect(bounds)));
        }

        let Some(grandparent) = host.parent(parent) else {
            let visible = clip.map_or(rect, |c| rect.intersect(c)).intersect(bounds);
            return Some(Projection {
                projected: rect,
                visible,
                own_area,
            });
        };

        let to_grandparent = ancestor.transform * Affine::translate(frame_offset(&ancestor));
        rect = to_grandparent.transform_rect_bbox(rect);
        clip = clip.map(|c| to_grandparent.transform_rect_bbox(c));
        parent = grandparent;
    }
}

fn frame_offset(node: &ViewNode) -> Vec2 {
    node.frame.abs().origin().to_vec2()
}

/// An ancestor hides its subtree when hidden, fully transparent, or zero-sized.
fn disqualifies(ancestor: &ViewNode) -> bool {
    !ancestor.is_displayed() || ancestor.frame.is_zero_area()
}

/// Returns `true` if any part of `view` is on screen.
///
/// The view must not be hidden and must have positive opacity; every ancestor must be
/// visible, non-transparent, and have a non-zero size; and the projected frame must have
/// a non-empty intersection with the root bounds (after ancestor clips). Stale handles
/// are not viewable.
pub fn is_viewable<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> bool {
    project(host, view).is_some_and(|p| !p.visible.is_zero_area())
}

/// Returns `true` if at least half of `view`'s frame area is on screen.
///
/// The visible area is compared (`>=`) against half of the view's own frame area.
/// A zero-area frame is never half-viewable. Implies [`is_viewable`].
pub fn is_at_least_half_viewable<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> bool {
    let Some(p) = project(host, view) else {
        return false;
    };
    if p.own_area <= 0.0 {
        return false;
    }
    let visible_area = p.visible.area();
    visible_area > 0.0 && visible_area >= 0.5 * p.own_area
}

/// Frame of `view` projected into its root's content space, ignoring clipping.
///
/// Returns `None` if the view or an ancestor disqualifies it from display.
pub fn projected_frame<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> Option<Rect> {
    project(host, view).map(|p| p.projected)
}

/// The on-screen part of `view` in root content space.
///
/// Returns `None` if the view or an ancestor disqualifies it from display. The rect may
/// have zero area when the view is displayable but entirely off screen.
pub fn visible_rect<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> Option<Rect> {
    project(host, view).map(|p| p.visible)
}

/// Visible area divided by the view's own frame area, clamped to `[0, 1]`.
///
/// Zero for disqualified views and zero-area frames.
pub fn visible_fraction<H: ViewHierarchy + ?Sized>(host: &H, view: H::View) -> f64 {
    match project(host, view) {
        Some(p) if p.own_area > 0.0 => (p.visible.area() / p.own_area).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
