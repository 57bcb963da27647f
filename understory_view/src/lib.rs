// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_view --heading-base-level=0

//! Understory View: a headless view hierarchy and the capability traits view services build on.
//!
//! This crate plays the part of a UI toolkit's view layer for the view utility crates:
//!
//! - [`ViewTree`]: generational slot storage for views with frames, transforms, opacity,
//!   display flags, parent/child links, and installed layout constraints.
//! - [`ViewHierarchy`], [`ConstraintHost`], [`PresentationHost`]: the capability set that
//!   `understory_visibility`, `understory_constraint`, and `understory_presentation` consume.
//!   Hosts with their own view storage implement these traits instead of using [`ViewTree`].
//! - [`LayoutConstraint`], [`Anchor`], [`Attribute`]: discrete equalities between view
//!   attributes, optionally offset by a constant.
//!
//! ## Coordinate model
//!
//! A view's `frame` is expressed in its parent's content space, whose origin is the
//! parent's top-left corner. The view's `transform` is applied on top of the frame in
//! parent space. A view without a parent is a root and its frame is in screen space.
//!
//! ## Constraints
//!
//! A constraint reads `first = second + constant` (or `first = constant`). The tree
//! installs it on the nearest common ancestor of its endpoints and drops it when a
//! detach separates them. [`ViewTree::layout`] applies constraints in one top-down pass;
//! it handles fixed sizes and relations to the parent only and is not a solver.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_view::{Anchor, Attribute, LayoutConstraint, ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let window = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let banner = tree.insert(Some(window), ViewNode::default());
//!
//! // Match the window's width and pin 50pt of height to the bottom edge.
//! tree.add_constraint(LayoutConstraint::equal(
//!     Anchor::new(banner, Attribute::Width),
//!     Anchor::new(window, Attribute::Width),
//!     0.0,
//! ))
//! .unwrap();
//! tree.add_constraint(LayoutConstraint::fixed(banner, Attribute::Height, 50.0))
//!     .unwrap();
//! tree.add_constraint(LayoutConstraint::equal(
//!     Anchor::new(banner, Attribute::Bottom),
//!     Anchor::new(window, Attribute::Bottom),
//!     0.0,
//! ))
//! .unwrap();
//!
//! tree.layout(window);
//! assert_eq!(tree.frame(banner), Some(Rect::new(0.0, 430.0, 320.0, 480.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod host;
mod layout;
mod tree;
mod types;

pub use error::ViewError;
pub use host::{ConstraintHost, PresentationHost, ViewHierarchy};
pub use tree::ViewTree;
pub use types::{Anchor, Attribute, Axis, ConstraintId, LayoutConstraint, ViewFlags, ViewId, ViewNode};
