// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_constraint --heading-base-level=0

//! Understory Constraint: named layout constraints for sizing and alignment.
//!
//! This crate manages a small set of discrete constraints per view through any
//! [`ConstraintHost`](understory_view::ConstraintHost). It is not a constraint solver.
//!
//! - [`ConstraintManager`]: fixed size, size-matching to the superview, and alignment to
//!   the superview (with optional offsets), plus their removal.
//! - [`ConstraintRegistry`]: records which constraint was installed for which
//!   `(view, Role)`, so re-installing replaces it and removal only touches constraints
//!   this crate installed.
//! - [`Role`]: the tracked purposes. Sizes are tracked per axis.
//!
//! Constraints the host drops on its own (for example when a detach separates the two
//! endpoints) read as absent.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size, Vec2};
//! use understory_constraint::{ConstraintError, ConstraintManager};
//! use understory_view::{Attribute, ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let screen = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let toast = tree.insert(Some(screen), ViewNode::default());
//! let mut manager = ConstraintManager::new();
//!
//! manager.constrain_to_size(&mut tree, toast, Size::new(200.0, 40.0)).unwrap();
//! manager
//!     .align_to_superview_with_offset(
//!         &mut tree,
//!         toast,
//!         Attribute::CenterX,
//!         Attribute::Bottom,
//!         Vec2::new(0.0, -20.0),
//!     )
//!     .unwrap();
//! tree.layout(screen);
//! assert_eq!(tree.frame(toast), Some(Rect::new(60.0, 420.0, 260.0, 460.0)));
//!
//! // Roots have nothing to align against.
//! assert_eq!(
//!     manager.align_to_superview(&mut tree, screen, Attribute::Leading, Attribute::Top),
//!     Err(ConstraintError::NoParent(screen)),
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc` through `hashbrown`.

#![no_std]

mod error;
mod manager;
mod registry;
mod role;

pub use error::ConstraintError;
pub use manager::{ConstraintManager, ConstraintResult};
pub use registry::ConstraintRegistry;
pub use role::Role;
