// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_presentation --heading-base-level=0

//! Understory Presentation: lightweight modal-style presentation of one view over another.
//!
//! A [`PresentationController`] inserts a view as the top-most child of a host view and
//! remembers the pairing until the view is dismissed. Presents and dismisses can be
//! immediate or animated with a [`Transition`]:
//!
//! - [`TransitionStyle::Fade`], [`TransitionStyle::Scale`], and [`TransitionStyle::FadeScale`]
//!   cover the common cases; any type implementing [`Transition`] can be supplied instead.
//! - Transitions run on the caller's clock. Call [`PresentationController::advance`] once per
//!   frame with the current time; nothing happens between calls.
//! - Each present or dismiss takes an optional [`Completion`] that runs exactly once with a
//!   success flag.
//!
//! The controller works with any [`PresentationHost`](understory_view::PresentationHost).
//! It never touches the presented view's frame; size and position it with
//! `understory_constraint` or directly.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_presentation::{PresentationController, TransitionConfig, TransitionStyle};
//! use understory_view::{ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let screen = tree.insert(None, ViewNode::with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let alert = tree.insert(None, ViewNode::with_frame(Rect::new(60.0, 190.0, 260.0, 290.0)));
//!
//! let mut presenter = PresentationController::with_config(TransitionConfig {
//!     duration: 200,
//!     style: TransitionStyle::FadeScale { from: 0.9 },
//! });
//! presenter.present(&mut tree, alert, screen, true).unwrap();
//! assert_eq!(tree.children(screen), &[alert]);
//! assert_eq!(tree.alpha(alert), Some(0.0));
//!
//! // The transition starts on the first frame and ends 200 ms later.
//! presenter.advance(&mut tree, 16);
//! presenter.advance(&mut tree, 216);
//! assert_eq!(tree.alpha(alert), Some(1.0));
//!
//! presenter.dismiss(&mut tree, alert, false);
//! assert!(tree.children(screen).is_empty());
//! assert!(!presenter.is_presented(alert));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod transition;

pub use controller::{Completion, PresentationController, TransitionPhase};
pub use transition::{Transition, TransitionConfig, TransitionSample, TransitionStyle};
