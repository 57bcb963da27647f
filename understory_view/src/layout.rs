// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pass application of installed constraints to frames.
//!
//! This is not a solver. Each view is visited once, parents before children, and
//! only relations a view can satisfy on its own are applied:
//!
//! - `width`/`height` equal to a constant, or to the parent's width/height plus a constant;
//! - edges and center lines equal to a constant, or to a parent attribute plus a constant.
//!
//! Sizes are resolved before positions so that `trailing`/`bottom`/center alignments see
//! the final size. Constant sizes take precedence over parent-relative sizes. Any other
//! relation (between siblings, to grandparents, ...) is ignored.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::tree::ViewTree;
use crate::types::{Attribute, LayoutConstraint, ViewId};

impl ViewTree {
    /// Apply installed constraints to the frames of `root` and its descendants.
    ///
    /// Returns the number of views whose frame changed.
    ///
    /// ```
    /// use kurbo::Rect;
    /// use understory_view::{Anchor, Attribute, LayoutConstraint, ViewNode, ViewTree};
    ///
    /// let mut tree = ViewTree::new();
    /// let root = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 200.0, 100.0)));
    /// let badge = tree.insert(Some(root), ViewNode::default());
    ///
    /// tree.add_constraint(LayoutConstraint::fixed(badge, Attribute::Width, 20.0)).unwrap();
    /// tree.add_constraint(LayoutConstraint::fixed(badge, Attribute::Height, 10.0)).unwrap();
    /// tree.add_constraint(LayoutConstraint::equal(
    ///     Anchor::new(badge, Attribute::Trailing),
    ///     Anchor::new(root, Attribute::Trailing),
    ///     -5.0,
    /// ))
    /// .unwrap();
    ///
    /// assert_eq!(tree.layout(root), 1);
    /// assert_eq!(tree.frame(badge), Some(Rect::new(175.0, 0.0, 195.0, 10.0)));
    /// ```
    pub fn layout(&mut self, root: ViewId) -> usize {
        let mut changed = 0;
        let mut stack: Vec<ViewId> = Vec::new();
        stack.push(root);
        while let Some(view) = stack.pop() {
            if self.layout_view(view) {
                changed += 1;
            }
            stack.extend(self.children(view).iter().rev().copied());
        }
        if changed > 0 {
            tracing::trace!(?root, changed, "layout pass updated frames");
        }
        changed
    }

    fn layout_view(&mut self, view: ViewId) -> bool {
        let Some(node) = self.node(view) else {
            return false;
        };
        let parent = self.parent(view);
        let parent_bounds = parent.and_then(|p| self.node(p)).map(|n| n.bounds());

        // Parent-relative relations live on the parent, constant ones on the view itself.
        let relevant: SmallVec<[LayoutConstraint<ViewId>; 8]> = parent
            .map(|p| self.constraints_on(p))
            .unwrap_or(&[])
            .iter()
            .chain(self.constraints_on(view))
            .filter_map(|id| self.constraint(*id))
            .filter(|c| c.first.view == view)
            .collect();
        if relevant.is_empty() {
            return false;
        }

        let reference = |c: &LayoutConstraint<ViewId>| -> Option<f64> {
            match c.second {
                None => Some(c.constant),
                Some(second) if Some(second.view) == parent => {
                    parent_bounds.map(|b| second.attribute.value_in(b) + c.constant)
                }
                Some(_) => None,
            }
        };

        let frame = node.frame.abs();
        let mut size = frame.size();
        let relative_first = relevant.iter().filter(|c| c.second.is_some());
        let constant_last = relevant.iter().filter(|c| c.second.is_none());
        for c in relative_first.chain(constant_last) {
            if !c.first.attribute.is_dimension() {
                continue;
            }
            let Some(value) = reference(c) else {
                continue;
            };
            match c.first.attribute {
                Attribute::Width => size.width = value,
                Attribute::Height => size.height = value,
                _ => {}
            }
        }

        let mut origin = frame.origin();
        for c in &relevant {
            if c.first.attribute.is_dimension() {
                continue;
            }
            let Some(target) = reference(c) else {
                continue;
            };
            match c.first.attribute {
                Attribute::Leading => origin.x = target,
                Attribute::Trailing => origin.x = target - size.width,
                Attribute::CenterX => origin.x = target - size.width / 2.0,
                Attribute::Top => origin.y = target,
                Attribute::Bottom => origin.y = target - size.height,
                Attribute::CenterY => origin.y = target - size.height / 2.0,
                Attribute::Width | Attribute::Height => {}
            }
        }

        let new_frame = Rect::from_origin_size(origin, size);
        if new_frame == node.frame {
            return false;
        }
        self.set_frame(view, new_frame)
    }
}
